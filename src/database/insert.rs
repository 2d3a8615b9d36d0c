// file: src/database/insert.rs
// description: LanceDB append operations for cached responses
// reference: https://docs.rs/lancedb

use crate::database::client::LanceDbClient;
use crate::database::schema::SchemaManager;
use crate::error::StorageError;
use crate::models::ResponseRecord;
use arrow_array::{Int64Array, RecordBatch, RecordBatchIterator, StringArray};
use arrow_schema::Schema;
use std::sync::Arc;
use tracing::debug;

pub struct ResponseInserter<'a> {
    client: &'a LanceDbClient,
}

impl<'a> ResponseInserter<'a> {
    pub fn new(client: &'a LanceDbClient) -> Self {
        Self { client }
    }

    /// Next id for an append-only table: ids start at 1 and rows are never removed.
    pub async fn next_id(&self) -> Result<i64, StorageError> {
        let count = self.client.get_response_count().await?;
        Ok(count as i64 + 1)
    }

    pub async fn insert_record(&self, record: &ResponseRecord) -> Result<(), StorageError> {
        let schema = SchemaManager::get_responses_schema();
        let record_batch = Self::create_record_batch(schema.clone(), std::slice::from_ref(record))?;

        let table = self.client.get_table(self.client.table_name()).await?;
        table
            .add(RecordBatchIterator::new(vec![Ok(record_batch)], schema))
            .execute()
            .await
            .map_err(|e| StorageError::new(format!("Failed to insert response: {}", e)))?;

        debug!("Inserted response record {}", record.id);
        Ok(())
    }

    fn create_record_batch(
        schema: Arc<Schema>,
        records: &[ResponseRecord],
    ) -> Result<RecordBatch, StorageError> {
        let ids: Int64Array = records.iter().map(|r| Some(r.id)).collect();

        let subject_codes: StringArray = records
            .iter()
            .map(|r| Some(r.subject_code.clone()))
            .collect();

        let modules: StringArray = records.iter().map(|r| Some(r.module.clone())).collect();

        let responses: StringArray = records.iter().map(|r| Some(r.response.clone())).collect();

        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(ids),
                Arc::new(subject_codes),
                Arc::new(modules),
                Arc::new(responses),
            ],
        )
        .map_err(|e| StorageError::new(format!("Failed to create record batch: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_batch_layout() {
        let records = vec![
            ResponseRecord::new(1, "ABC123", "body one", "answer one"),
            ResponseRecord::new(2, "", "body two", "answer two"),
        ];

        let batch = ResponseInserter::create_record_batch(
            SchemaManager::get_responses_schema(),
            &records,
        )
        .unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 4);
    }
}
