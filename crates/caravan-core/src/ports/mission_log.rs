//! MissionLog port - 状態遷移の追記専用ログ

use async_trait::async_trait;

use crate::domain::{LogEntryId, LogFilter, MissionLogEntry, NewLogEntry, StoreError};

/// MissionLog は受理された遷移を 1 件ずつ記録する
///
/// Append-only: update / delete はありません。
#[async_trait]
pub trait MissionLog: Send + Sync {
    async fn append(&self, entry: NewLogEntry) -> Result<MissionLogEntry, StoreError>;

    async fn get(&self, id: LogEntryId) -> Result<Option<MissionLogEntry>, StoreError>;

    /// Entries matching `filter`, in append order.
    async fn list(&self, filter: &LogFilter) -> Result<Vec<MissionLogEntry>, StoreError>;
}
