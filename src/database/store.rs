// file: src/database/store.rs
// description: append-only response cache keyed by subject code and module body
// reference: https://docs.rs/lancedb

use crate::config::DatabaseConfig;
use crate::database::client::LanceDbClient;
use crate::database::insert::ResponseInserter;
use crate::database::schema::SchemaManager;
use crate::error::StorageError;
use crate::models::ResponseRecord;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Persistent key to list-of-answers store.
///
/// Keys are compared with exact string equality. Records are only ever
/// appended; `get` returns them in insertion order.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Creates backing structures if absent. Safe to call repeatedly.
    async fn initialize(&self) -> Result<(), StorageError>;

    async fn put(&self, subject_code: &str, module: &str, content: &str)
    -> Result<(), StorageError>;

    async fn get(&self, subject_code: &str, module: &str) -> Result<Vec<String>, StorageError>;

    async fn count(&self) -> Result<u64, StorageError>;
}

/// Response store backed by an embedded LanceDB table.
pub struct LanceResponseStore {
    client: LanceDbClient,
    // Serializes id assignment and append for writers in this process.
    write_lock: Mutex<()>,
}

impl LanceResponseStore {
    pub fn new(client: LanceDbClient) -> Self {
        Self {
            client,
            write_lock: Mutex::new(()),
        }
    }

    /// Connects and makes sure the responses table exists.
    pub async fn open(config: DatabaseConfig) -> Result<Self, StorageError> {
        let client = LanceDbClient::new(config).await?;
        let store = Self::new(client);
        store.initialize().await?;
        Ok(store)
    }

    pub fn client(&self) -> &LanceDbClient {
        &self.client
    }

    pub async fn records(
        &self,
        subject_code: &str,
        module: &str,
    ) -> Result<Vec<ResponseRecord>, StorageError> {
        self.client.find_responses(subject_code, module).await
    }
}

#[async_trait]
impl ResponseStore for LanceResponseStore {
    async fn initialize(&self) -> Result<(), StorageError> {
        SchemaManager::new(&self.client).initialize().await
    }

    async fn put(
        &self,
        subject_code: &str,
        module: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;

        if !self.client.table_exists(self.client.table_name()).await? {
            info!("Responses table missing at write time, creating it");
            SchemaManager::new(&self.client).initialize().await?;
        }

        let inserter = ResponseInserter::new(&self.client);
        let id = inserter.next_id().await?;
        let record = ResponseRecord::new(id, subject_code, module, content);
        inserter.insert_record(&record).await?;

        debug!("Cached response {} for subject '{}'", id, subject_code);
        Ok(())
    }

    async fn get(&self, subject_code: &str, module: &str) -> Result<Vec<String>, StorageError> {
        let records = self.records(subject_code, module).await?;
        Ok(records.into_iter().map(|record| record.response).collect())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        self.client.get_response_count().await
    }
}
