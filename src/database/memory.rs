// file: src/database/memory.rs
// description: in-process response store for tests and throwaway runs

use crate::database::store::ResponseStore;
use crate::error::StorageError;
use crate::models::ResponseRecord;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryResponseStore {
    records: Mutex<Vec<ResponseRecord>>,
}

impl MemoryResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ResponseRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResponseStore for MemoryResponseStore {
    async fn initialize(&self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn put(
        &self,
        subject_code: &str,
        module: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let mut records = self
            .records
            .lock()
            .map_err(|e| StorageError::new(format!("Store lock poisoned: {}", e)))?;

        let id = records.len() as i64 + 1;
        records.push(ResponseRecord::new(id, subject_code, module, content));
        Ok(())
    }

    async fn get(&self, subject_code: &str, module: &str) -> Result<Vec<String>, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::new(format!("Store lock poisoned: {}", e)))?;

        Ok(records
            .iter()
            .filter(|record| record.matches(subject_code, module))
            .map(|record| record.response.clone())
            .collect())
    }

    async fn count(&self) -> Result<u64, StorageError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StorageError::new(format!("Store lock poisoned: {}", e)))?;
        Ok(records.len() as u64)
    }
}
