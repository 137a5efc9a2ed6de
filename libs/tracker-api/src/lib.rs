pub mod error;
pub mod util;

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use error::StoreError;
pub use util::{now, time_ago};

// ════════════════════════════════════════════════════════════════
//  Record Types
// ════════════════════════════════════════════════════════════════

/// Произвольные поля записи (всё, кроме идентификатора).
pub type Payload = serde_json::Map<String, serde_json::Value>;

/// Запись одного идентификатора: payload + время последней записи.
///
/// Идентификатор — ключ в store, внутри записи не хранится.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub updated_at: DateTime<Utc>,
    pub data: Payload,
}

impl Record {
    pub fn new(data: Payload) -> Self {
        Self {
            updated_at: now(),
            data,
        }
    }

    /// Wire-представление записи с относительным временем обновления.
    pub fn view(&self, now: DateTime<Utc>) -> RecordView {
        RecordView {
            last_update: time_ago(self.updated_at, now),
            data: self.data.clone(),
        }
    }
}

/// Запись в том виде, в котором её отдаёт HTTP API.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RecordView {
    pub last_update: String,
    pub data: Payload,
}

/// Исход `put`: ключа не было или он был перезаписан.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Created,
    Updated,
}

impl std::fmt::Display for Upsert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Upsert::Created => f.write_str("created"),
            Upsert::Updated => f.write_str("updated"),
        }
    }
}

// ════════════════════════════════════════════════════════════════
//  Store Trait
// ════════════════════════════════════════════════════════════════

/// Storage backend для записей. HTTP слой получает его как
/// `Arc<dyn RecordStore>` и не знает о конкретной реализации.
///
/// Каждая операция атомарна относительно остальных: проверка
/// существования ключа и запись выполняются под одной блокировкой.
pub trait RecordStore: Send + Sync {
    /// Сохранить запись, полностью заменив предыдущую (без merge).
    fn put(
        &self,
        identifier: &str,
        record: Record,
    ) -> Pin<Box<dyn Future<Output = Result<Upsert, StoreError>> + Send + '_>>;

    /// Получить запись. `StoreError::NotFound` если ключа нет.
    fn get(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Record, StoreError>> + Send + '_>>;

    /// Удалить запись и вернуть её. `StoreError::NotFound` если ключа нет.
    fn delete(
        &self,
        identifier: &str,
    ) -> Pin<Box<dyn Future<Output = Result<Record, StoreError>> + Send + '_>>;

    /// Снимок всей таблицы.
    #[allow(clippy::type_complexity)]
    fn list(
        &self,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<(String, Record)>, StoreError>> + Send + '_>>;

    /// Количество записей.
    fn count(&self) -> Pin<Box<dyn Future<Output = Result<usize, StoreError>> + Send + '_>>;
}
