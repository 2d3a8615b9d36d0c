// file: src/database/schema.rs
// description: LanceDB schema management for the response cache
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::error::StorageError;
use arrow_schema::{DataType, Field, Schema};
use std::sync::Arc;
use tracing::{info, warn};

pub struct SchemaManager<'a> {
    client: &'a LanceDbClient,
}

impl<'a> SchemaManager<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    /// Creates the responses table when missing. Existing data is left untouched.
    pub async fn initialize(&self) -> Result<(), StorageError> {
        let table_name = self.client.table_name();

        if self.client.table_exists(table_name).await? {
            info!("Responses table '{}' already exists", table_name);
            return Ok(());
        }

        info!("Creating responses table '{}'", table_name);
        let created = self
            .client
            .get_connection()
            .create_empty_table(table_name, Self::get_responses_schema())
            .execute()
            .await;

        if let Err(e) = created {
            // Another writer may have created it between the check and the create.
            if self.client.table_exists(table_name).await? {
                warn!("Responses table appeared concurrently: {}", e);
            } else {
                return Err(StorageError::new(format!(
                    "Failed to create table {}: {}",
                    table_name, e
                )));
            }
        }

        Ok(())
    }

    pub async fn verify_schema(&self) -> Result<bool, StorageError> {
        let table_name = self.client.table_name();

        if !self.client.table_exists(table_name).await? {
            warn!("Table '{}' does not exist", table_name);
            return Ok(false);
        }

        info!("Table '{}' exists", table_name);
        Ok(true)
    }

    /// Arrow schema of the responses table
    pub fn get_responses_schema() -> Arc<Schema> {
        Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, false),
            Field::new("subject_code", DataType::Utf8, false),
            Field::new("module", DataType::Utf8, false),
            Field::new("response", DataType::Utf8, false),
        ]))
    }
}
