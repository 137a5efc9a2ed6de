use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tokio::sync::RwLock;

use tracker_api::{Record, RecordStore, StoreError, Upsert};

#[cfg(test)]
mod tests;

// ═══════════════════════════════════════════════════════════════
//  MemoryStore
// ═══════════════════════════════════════════════════════════════

/// In-memory таблица `identifier → Record`. Данные живут до
/// остановки процесса.
///
/// Один `RwLock` на всю таблицу: один писатель за раз, читатели
/// не блокируют друг друга.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for MemoryStore {
    fn put(
        &self,
        identifier: &str,
        record: Record,
    ) -> Pin<Box<dyn Future<Output = Result<Upsert, StoreError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move {
            let mut records = self.records.write().await;
            let upsert = match records.insert(identifier.clone(), record) {
                Some(_) => Upsert::Updated,
                None => Upsert::Created,
            };
            tracing::trace!(identifier = %identifier, %upsert, total = records.len(), "stored record");
            Ok(upsert)
        })
    }

    fn get(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Record, StoreError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move {
            let records = self.records.read().await;
            records
                .get(&identifier)
                .cloned()
                .ok_or(StoreError::NotFound(identifier))
        })
    }

    fn delete(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Record, StoreError>> + Send + '_>> {
        let identifier = identifier.to_string();
        Box::pin(async move {
            let mut records = self.records.write().await;
            records
                .remove(&identifier)
                .ok_or(StoreError::NotFound(identifier))
        })
    }

    fn list(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<(String, Record)>, StoreError>> + Send + '_>> {
        Box::pin(async move {
            let records = self.records.read().await;
            Ok(records
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect())
        })
    }

    fn count(&self) -> Pin<Box<dyn Future<Output = Result<usize, StoreError>> + Send + '_>> {
        Box::pin(async move { Ok(self.records.read().await.len()) })
    }
}
