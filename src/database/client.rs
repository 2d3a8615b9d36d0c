// file: src/database/client.rs
// description: LanceDB client wrapper with connection management
// reference: https://docs.rs/lancedb

use crate::config::DatabaseConfig;
use crate::error::StorageError;
use crate::models::ResponseRecord;
use arrow_array::{Int64Array, RecordBatch, StringArray};
use futures::StreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{Connection, Table, connect};
use tracing::{debug, info};

type StoreResult<T> = std::result::Result<T, StorageError>;

#[derive(Clone)]
pub struct LanceDbClient {
    connection: Connection,
    config: DatabaseConfig,
}

impl LanceDbClient {
    pub async fn new(config: DatabaseConfig) -> StoreResult<Self> {
        info!("Connecting to LanceDB at {}", config.uri);

        let connection = connect(&config.uri)
            .execute()
            .await
            .map_err(|e| StorageError::new(format!("Failed to connect to LanceDB: {}", e)))?;

        Ok(Self { connection, config })
    }

    pub fn get_connection(&self) -> &Connection {
        &self.connection
    }

    pub async fn ping(&self) -> StoreResult<()> {
        debug!("Checking LanceDB connection");

        self.connection
            .table_names()
            .execute()
            .await
            .map(|_| ())
            .map_err(|e| StorageError::new(format!("LanceDB connection failed: {}", e)))
    }

    pub async fn table_exists(&self, table_name: &str) -> StoreResult<bool> {
        let table_names = self
            .connection
            .table_names()
            .execute()
            .await
            .map_err(|e| StorageError::new(format!("Failed to list tables: {}", e)))?;

        Ok(table_names.iter().any(|name| name == table_name))
    }

    pub async fn get_table(&self, table_name: &str) -> StoreResult<Table> {
        self.connection
            .open_table(table_name)
            .execute()
            .await
            .map_err(|e| StorageError::new(format!("Failed to open table {}: {}", table_name, e)))
    }

    pub async fn get_response_count(&self) -> StoreResult<u64> {
        if !self.table_exists(&self.config.table_name).await? {
            return Ok(0);
        }

        let table = self.get_table(&self.config.table_name).await?;
        let count = table
            .count_rows(None)
            .await
            .map_err(|e| StorageError::new(format!("Failed to count rows: {}", e)))?;

        Ok(count as u64)
    }

    pub fn table_name(&self) -> &str {
        &self.config.table_name
    }

    /// All records stored under the exact (subject code, module) key, ordered by id.
    pub async fn find_responses(
        &self,
        subject_code: &str,
        module: &str,
    ) -> StoreResult<Vec<ResponseRecord>> {
        if !self.table_exists(&self.config.table_name).await? {
            return Ok(Vec::new());
        }

        let table = self.get_table(&self.config.table_name).await?;
        let filter = key_predicate(subject_code, module);

        let mut results_stream = table
            .query()
            .only_if(filter)
            .execute()
            .await
            .map_err(|e| StorageError::new(format!("Response lookup failed: {}", e)))?;

        let mut records = Vec::new();
        while let Some(batch_result) = results_stream.next().await {
            let batch = batch_result
                .map_err(|e| StorageError::new(format!("Failed to read result batch: {}", e)))?;
            records.extend(records_from_batch(&batch)?);
        }

        records.sort_by_key(|record| record.id);
        debug!("Lookup returned {} cached responses", records.len());
        Ok(records)
    }
}

/// SQL predicate matching one cache key exactly.
pub(crate) fn key_predicate(subject_code: &str, module: &str) -> String {
    format!(
        "subject_code = {} AND module = {}",
        sql_literal(subject_code),
        sql_literal(module)
    )
}

fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

fn string_column<'b>(batch: &'b RecordBatch, name: &str) -> StoreResult<&'b StringArray> {
    batch
        .column_by_name(name)
        .ok_or_else(|| StorageError::new(format!("Missing '{}' column", name)))?
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| StorageError::new(format!("Invalid '{}' column type", name)))
}

fn records_from_batch(batch: &RecordBatch) -> StoreResult<Vec<ResponseRecord>> {
    let ids = batch
        .column_by_name("id")
        .ok_or_else(|| StorageError::new("Missing 'id' column"))?
        .as_any()
        .downcast_ref::<Int64Array>()
        .ok_or_else(|| StorageError::new("Invalid 'id' column type"))?;
    let subject_codes = string_column(batch, "subject_code")?;
    let modules = string_column(batch, "module")?;
    let responses = string_column(batch, "response")?;

    Ok((0..batch.num_rows())
        .map(|i| {
            ResponseRecord::new(
                ids.value(i),
                subject_codes.value(i),
                modules.value(i),
                responses.value(i),
            )
        })
        .collect())
}
