//! InMemoryItemStore - 開発・テスト用の item ストア

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::table::Table;
use crate::domain::{Item, ItemFilter, ItemId, ItemPatch, NewItem, StoreError};
use crate::ports::{IdGenerator, ItemStore, UlidGenerator};

pub struct InMemoryItemStore {
    items: RwLock<Table<ItemId, Item>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryItemStore {
    pub fn new() -> Self {
        Self::with_id_generator(UlidGenerator::shared())
    }

    pub fn with_id_generator(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            items: RwLock::new(Table::new()),
            ids,
        }
    }
}

impl Default for InMemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ItemStore for InMemoryItemStore {
    async fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        let item = item.into_item(self.ids.generate_item_id());
        self.items.write().await.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get(&self, id: ItemId) -> Result<Option<Item>, StoreError> {
        Ok(self.items.read().await.get(&id).cloned())
    }

    async fn list(&self, filter: &ItemFilter) -> Result<Vec<Item>, StoreError> {
        Ok(self.items.read().await.collect(|item| filter.matches(item)))
    }

    async fn update(&self, id: ItemId, patch: ItemPatch) -> Result<Option<Item>, StoreError> {
        let mut items = self.items.write().await;
        let Some(item) = items.get_mut(&id) else {
            return Ok(None);
        };
        patch.apply_to(item);
        Ok(Some(item.clone()))
    }

    async fn delete(&self, id: ItemId) -> Result<bool, StoreError> {
        Ok(self.items.write().await.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ulid::Ulid;

    #[tokio::test]
    async fn create_get_update_delete() {
        let store = InMemoryItemStore::new();

        let item = store.create(NewItem::new("rope", 3.0)).await.unwrap();
        assert_eq!(store.get(item.id).await.unwrap(), Some(item.clone()));

        let patch = ItemPatch {
            name: None,
            weight: Some(4.5),
        };
        let updated = store.update(item.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.weight, 4.5);
        assert_eq!(updated.name, "rope");

        assert!(store.delete(item.id).await.unwrap());
        assert!(!store.delete(item.id).await.unwrap());
        assert_eq!(store.get(item.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_ids_are_not_errors() {
        let store = InMemoryItemStore::new();
        let id = ItemId::from_ulid(Ulid::new());

        assert_eq!(store.get(id).await.unwrap(), None);
        assert_eq!(store.update(id, ItemPatch::default()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn list_filters_by_name() {
        let store = InMemoryItemStore::new();
        store.create(NewItem::new("long rope", 3.0)).await.unwrap();
        store.create(NewItem::new("lantern", 1.0)).await.unwrap();
        store.create(NewItem::new("short rope", 2.0)).await.unwrap();

        let filter = ItemFilter {
            name_contains: Some("rope".into()),
        };
        let names: Vec<String> = store
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.name)
            .collect();

        assert_eq!(names, vec!["long rope", "short rope"]);
        assert_eq!(store.list(&ItemFilter::default()).await.unwrap().len(), 3);
    }
}
