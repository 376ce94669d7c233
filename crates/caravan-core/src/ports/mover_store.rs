//! MoverStore port - mover の永続化

use async_trait::async_trait;

use crate::domain::{Mover, MoverFilter, MoverId, MoverPatch, NewMover, StoreError};

/// MoverStore は mover の正本（source of truth）
///
/// # 契約
/// - `create` は `Resting`・積荷なしの mover を作る
/// - `list` は作成順を保持する（ランキングの tie-break がこれに依存する）
/// - mover を削除する lifecycle 操作はない（`delete` は作成の取り消し専用）
#[async_trait]
pub trait MoverStore: Send + Sync {
    async fn create(&self, mover: NewMover) -> Result<Mover, StoreError>;

    async fn get(&self, id: MoverId) -> Result<Option<Mover>, StoreError>;

    /// Movers matching `filter`, in creation order.
    async fn list(&self, filter: &MoverFilter) -> Result<Vec<Mover>, StoreError>;

    /// Apply `patch`; `None` if the mover does not exist.
    async fn update(&self, id: MoverId, patch: MoverPatch) -> Result<Option<Mover>, StoreError>;

    /// Removes a mover. Only used to undo a creation whose log entry could not be written.
    async fn delete(&self, id: MoverId) -> Result<bool, StoreError>;
}
