/// Ошибка операций над `RecordStore`.
///
/// `NotFound` — ожидаемый исход чтения/удаления отсутствующего ключа,
/// `Backend` — любой сбой самого хранилища.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("store backend: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(msg: impl Into<String>) -> Self {
        StoreError::Backend(msg.into())
    }
}
