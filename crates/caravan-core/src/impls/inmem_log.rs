//! InMemoryMissionLog - 開発・テスト用の mission log

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{LogEntryId, LogFilter, MissionLogEntry, NewLogEntry, StoreError};
use crate::ports::{IdGenerator, MissionLog, UlidGenerator};

pub struct InMemoryMissionLog {
    entries: RwLock<Vec<MissionLogEntry>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryMissionLog {
    pub fn new() -> Self {
        Self::with_id_generator(UlidGenerator::shared())
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            ids,
        }
    }
}

impl Default for InMemoryMissionLog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MissionLog for InMemoryMissionLog {
    async fn append(&self, entry: NewLogEntry) -> Result<MissionLogEntry, StoreError> {
        let entry = entry.into_entry(self.ids.generate_log_entry_id());
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn get(&self, id: LogEntryId) -> Result<Option<MissionLogEntry>, StoreError> {
        Ok(self.entries.read().await.iter().find(|e| e.id == id).cloned())
    }

    async fn list(&self, filter: &LogFilter) -> Result<Vec<MissionLogEntry>, StoreError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MissionAction, MoverId};
    use chrono::Utc;
    use ulid::Ulid;

    fn entry(mover_id: MoverId, action: MissionAction) -> NewLogEntry {
        NewLogEntry {
            mover_id,
            action,
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn entries_keep_append_order_per_mover() {
        let log = InMemoryMissionLog::new();
        let m1 = MoverId::from_ulid(Ulid::new());
        let m2 = MoverId::from_ulid(Ulid::new());

        log.append(entry(m1, MissionAction::Resting)).await.unwrap();
        log.append(entry(m2, MissionAction::Resting)).await.unwrap();
        let loading = log.append(entry(m1, MissionAction::Loading)).await.unwrap();

        let actions: Vec<MissionAction> = log
            .list(&LogFilter::for_mover(m1))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, vec![MissionAction::Resting, MissionAction::Loading]);

        assert_eq!(log.get(loading.id).await.unwrap(), Some(loading));
        assert_eq!(log.list(&LogFilter::default()).await.unwrap().len(), 3);
    }
}
