// file: src/generator/groq.rs
// description: Groq chat completions client for module answers
// reference: https://console.groq.com/docs/api-reference#chat

use crate::config::GenerationConfig;
use crate::error::{GenerationError, PipelineError, Result};
use crate::generator::{AnswerGenerator, AnswerStyle};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub struct GroqAnswerClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl GroqAnswerClient {
    pub fn new(endpoint: String, api_key: Option<String>, model: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
            api_key,
            model,
        }
    }

    pub fn from_config(config: &GenerationConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| PipelineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        if config.api_key.is_none() {
            warn!("No API key configured, generation requests will fail");
        }

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }

    fn credential(&self) -> std::result::Result<&str, GenerationError> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or_else(|| GenerationError::Auth("API key not found".to_string()))
    }
}

#[async_trait]
impl AnswerGenerator for GroqAnswerClient {
    async fn generate(
        &self,
        module_body: &str,
        style: AnswerStyle,
    ) -> std::result::Result<String, GenerationError> {
        let api_key = self.credential()?;

        let request = ChatCompletionRequest {
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: style.directive(),
                },
                ChatMessage {
                    role: "user",
                    content: module_body,
                },
            ],
            model: &self.model,
        };

        debug!(
            "Requesting {} answer from {} for {} chars",
            style,
            self.model,
            module_body.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Transport(format!("Failed to read response: {}", e)))?;

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GenerationError::Auth(format!(
                "credential rejected with status {}",
                status.as_u16()
            )));
        }

        if !status.is_success() {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        parse_completion(&body)
    }
}

/// Joins the `message.content` of every choice, in order.
pub fn parse_completion(body: &str) -> std::result::Result<String, GenerationError> {
    let completion: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

    if completion.choices.is_empty() {
        return Err(GenerationError::MalformedResponse(
            "response contained no choices".to_string(),
        ));
    }

    let contents: Vec<String> = completion
        .choices
        .into_iter()
        .map(|choice| choice.message.content)
        .collect();

    Ok(contents.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    /// Serves one canned HTTP response and hands back the raw request it received.
    async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!(
            "http://{}/openai/v1/chat/completions",
            listener.local_addr().unwrap()
        );

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });

        (endpoint, handle)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];

        loop {
            let read = socket.read(&mut chunk).await.unwrap();
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            if let Some(end) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&buffer[..end]).to_lowercase();
                let length = head
                    .lines()
                    .find_map(|line| line.strip_prefix("content-length:"))
                    .and_then(|value| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buffer.len() >= end + 4 + length {
                    break;
                }
            }
        }

        String::from_utf8(buffer).unwrap()
    }

    fn client_for(endpoint: String) -> GroqAnswerClient {
        GroqAnswerClient::new(endpoint, Some("test-key".to_string()), "llama3-8b-8192".to_string())
    }

    #[test]
    fn test_parse_single_choice() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Ownership is..."}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "Ownership is...");
    }

    #[test]
    fn test_parse_multiple_choices_in_order() {
        let body = r#"{"choices":[{"message":{"content":"first"}},{"message":{"content":"second"}}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "first\n\nsecond");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let cases = [
            r#"{"error":{"message":"rate limited"}}"#,
            r#"{"choices":[{"message":{}}]}"#,
            r#"{"choices":[{"message":{"content":null}}]}"#,
            r#"{"choices":[]}"#,
            "not json",
        ];

        for body in cases {
            assert!(
                matches!(
                    parse_completion(body),
                    Err(GenerationError::MalformedResponse(_))
                ),
                "expected malformed for {}",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_missing_key_is_auth_error() {
        let client = GroqAnswerClient::new(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            None,
            "llama3-8b-8192".to_string(),
        );

        let result = client.generate("Define ownership.", AnswerStyle::Verbose).await;
        assert!(matches!(result, Err(GenerationError::Auth(_))));

        let blank = GroqAnswerClient::new(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            Some("   ".to_string()),
            "llama3-8b-8192".to_string(),
        );
        let result = blank.generate("Define ownership.", AnswerStyle::Concise).await;
        assert!(matches!(result, Err(GenerationError::Auth(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let client = GroqAnswerClient::new(
            "http://127.0.0.1:1/v1/chat/completions".to_string(),
            Some("test-key".to_string()),
            "llama3-8b-8192".to_string(),
        );

        let result = client.generate("Define ownership.", AnswerStyle::Verbose).await;
        assert!(matches!(result, Err(GenerationError::Transport(_))));
    }

    #[test]
    fn test_from_config_keeps_settings() {
        let config = GenerationConfig {
            endpoint: "http://localhost:8080/v1/chat/completions".to_string(),
            model: "test-model".to_string(),
            api_key: Some("secret".to_string()),
            timeout_secs: Some(5),
        };

        let client = GroqAnswerClient::from_config(&config).unwrap();
        assert_eq!(client.model, "test-model");
        assert_eq!(client.credential().unwrap(), "secret");
    }

    #[tokio::test]
    async fn test_success_sends_directive_body_and_credential() {
        let (endpoint, server) = serve_once(
            "200 OK",
            r#"{"choices":[{"message":{"role":"assistant","content":"Ownership moves values."}}]}"#,
        )
        .await;

        let answer = client_for(endpoint)
            .generate("Explain ownership in Rust.", AnswerStyle::Concise)
            .await
            .unwrap();
        assert_eq!(answer, "Ownership moves values.");

        let request = server.await.unwrap();
        let (head, body) = request.split_once("\r\n\r\n").unwrap();
        assert!(head.starts_with("POST /openai/v1/chat/completions "));
        assert!(
            head.lines()
                .any(|line| line.eq_ignore_ascii_case("authorization: Bearer test-key")),
            "missing bearer credential in {}",
            head
        );

        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(payload["model"], "llama3-8b-8192");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(
            payload["messages"][0]["content"],
            AnswerStyle::Concise.directive()
        );
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "Explain ownership in Rust.");
    }

    #[tokio::test]
    async fn test_verbose_style_sends_verbose_directive() {
        let (endpoint, server) =
            serve_once("200 OK", r#"{"choices":[{"message":{"content":"Long answer"}}]}"#).await;

        client_for(endpoint)
            .generate("Define lifetimes.", AnswerStyle::Verbose)
            .await
            .unwrap();

        let request = server.await.unwrap();
        let (_, body) = request.split_once("\r\n\r\n").unwrap();
        let payload: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(
            payload["messages"][0]["content"],
            AnswerStyle::Verbose.directive()
        );
    }

    #[tokio::test]
    async fn test_rejected_credential_is_auth_error() {
        for status_line in ["401 Unauthorized", "403 Forbidden"] {
            let (endpoint, server) =
                serve_once(status_line, r#"{"error":{"message":"invalid api key"}}"#).await;

            let result = client_for(endpoint)
                .generate("Define ownership.", AnswerStyle::Verbose)
                .await;
            assert!(
                matches!(result, Err(GenerationError::Auth(_))),
                "expected auth error for {}",
                status_line
            );
            server.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_server_error_is_upstream_with_status_and_body() {
        let (endpoint, server) =
            serve_once("503 Service Unavailable", r#"{"error":"overloaded"}"#).await;

        let result = client_for(endpoint)
            .generate("Define ownership.", AnswerStyle::Verbose)
            .await;
        match result {
            Err(GenerationError::Upstream { status, body }) => {
                assert_eq!(status, 503);
                assert_eq!(body, r#"{"error":"overloaded"}"#);
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_success_with_garbage_body_is_malformed() {
        let (endpoint, server) = serve_once("200 OK", "<html>gateway</html>").await;

        let result = client_for(endpoint)
            .generate("Define ownership.", AnswerStyle::Verbose)
            .await;
        assert!(matches!(result, Err(GenerationError::MalformedResponse(_))));
        server.await.unwrap();
    }
}
