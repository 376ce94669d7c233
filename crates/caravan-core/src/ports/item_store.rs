//! ItemStore port - item の永続化

use async_trait::async_trait;

use crate::domain::{Item, ItemFilter, ItemId, ItemPatch, NewItem, StoreError};

/// ItemStore は item の正本（source of truth）
///
/// Item の唯一の writer です。Engine は重量を知るために読むだけです。
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Persist a new item and return it with its assigned id.
    async fn create(&self, item: NewItem) -> Result<Item, StoreError>;

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError>;

    /// Items matching `filter`, in creation order.
    async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError>;

    /// Apply `patch`; `None` if the item does not exist.
    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Option<Item>, StoreError>;

    /// `true` if an item was removed.
    async fn delete(&self, id: ItemId) -> Result<bool, StoreError>;
}
