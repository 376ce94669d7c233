//! InMemoryMoverStore - 開発・テスト用の mover ストア

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use crate::domain::{Mover, MoverFilter, MoverId, MoverPatch, NewMover, StoreError};
use crate::ports::{IdGenerator, MoverStore, UlidGenerator};

/// Movers in creation order.
///
/// This store does no concurrency control beyond its own lock: read-modify-write
/// sequences are serialized by the engine, not here.
pub struct InMemoryMoverStore {
    movers: RwLock<Table<MoverId, Mover>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryMoverStore {
    pub fn new() -> Self {
        Self::with_id_generator(UlidGenerator::shared())
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            movers: RwLock::new(Table::new()),
            ids,
        }
    }
}

impl Default for InMemoryMoverStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MoverStore for InMemoryMoverStore {
    async fn create(&self, mover: NewMover) -> Result<Mover, StoreError> {
        let mover = mover.into_mover(self.ids.generate_mover_id());
        self.movers.write().await.insert(mover.id, mover.clone());
        Ok(mover)
    }

    async fn get(&self, id: MoverId) -> Result<Option<Mover>, StoreError> {
        Ok(self.movers.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &MoverFilter) -> Result<Vec<Mover>, StoreError> {
        Ok(self.movers.read().await.collect(|m| filter.matches(m)))
    }

    async fn update(&self, id: MoverId, patch: MoverPatch) -> Result<Option<Mover>, StoreError> {
        let mut movers = self.movers.write().await;
        let Some(mover) = movers.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(mover);
        Ok(Some(mover.clone()))
    }

    async fn delete(&self, id: MoverId) -> Result<bool, StoreError> {
        Ok(self.movers.write().await.remove(&id).is_some())
    }
}
