//! FleetBuilder - engine の構築とワイヤリング
//!
//! ストアはグローバルレジストリではなく、ここで明示的に渡します。
//! 必須の collaborator が欠けていれば `build()` が BuildError を返します（Fail-fast）。

use std::sync::Arc;

use super::engine::FleetEngine;
use crate::config::FleetConfig;
use crate::impls::{InMemoryItemStore, InMemoryMissionLog, InMemoryMoverStore};
use crate::ports::{Clock, ItemStore, MissionLog, MoverStore, SystemClock};

/// Builds a [`FleetEngine`].
///
/// # 使用例
/// ```ignore
/// let engine = FleetBuilder::new()
///     .item_store(Arc::new(InMemoryItemStore::new()))
///     .mover_store(Arc::new(InMemoryMoverStore::new()))
///     .mission_log(Arc::new(JsonlMissionLog::open("missions.jsonl")?))
///     .build()?;
/// ```
#[derive(Default)]
pub struct FleetBuilder {
    items: Option<Arc<dyn ItemStore>>,
    movers: Option<Arc<dyn MoverStore>>,
    log: Option<Arc<dyn MissionLog>>,
    clock: Option<Arc<dyn Clock>>,
    top_movers_limit: Option<usize>,
}

/// BuildError は engine 構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Missing components: {0:?}. These collaborators must be provided before build().")]
    MissingComponents(Vec<&'static str>),
}

impl FleetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All three stores in memory.
    pub fn in_memory() -> Self {
        Self::new()
            .item_store(Arc::new(InMemoryItemStore::new()))
            .mover_store(Arc::new(InMemoryMoverStore::new()))
            .mission_log(Arc::new(InMemoryMissionLog::new()))
    }

    pub fn item_store(mut self, store: Arc<dyn ItemStore>) -> Self {
        self.items = Some(store);
        self
    }

    pub fn mover_store(mut self, store: Arc<dyn MoverStore>) -> Self {
        self.movers = Some(store);
        self
    }

    pub fn mission_log(mut self, log: Arc<dyn MissionLog>) -> Self {
        self.log = Some(log);
        self
    }

    /// Clock used for log timestamps. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Applies the engine-level settings from `config`.
    pub fn config(mut self, config: &FleetConfig) -> Self {
        self.top_movers_limit = config.top_movers_limit;
        self
    }

    pub fn build(self) -> Result<FleetEngine, BuildError> {
        let mut missing = Vec::new();
        if self.items.is_none() {
            missing.push("item_store");
        }
        if self.movers.is_none() {
            missing.push("mover_store");
        }
        if self.log.is_none() {
            missing.push("mission_log");
        }
        let (Some(items), Some(movers), Some(log)) = (self.items, self.movers, self.log) else {
            return Err(BuildError::MissingComponents(missing));
        };
        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
        Ok(FleetEngine::new(items, movers, log, clock, self.top_movers_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_success() {
        assert!(FleetBuilder::in_memory().build().is_ok());
    }

    #[test]
    fn test_build_missing_components() {
        let engine = FleetBuilder::new()
            .item_store(Arc::new(InMemoryItemStore::new()))
            .build();
        assert!(matches!(
            engine,
            Err(BuildError::MissingComponents(missing)) if missing == vec!["mover_store", "mission_log"]
        ));
    }

    #[tokio::test]
    async fn test_config_sets_default_ranking_limit() {
        let config = FleetConfig {
            top_movers_limit: Some(1),
            ..FleetConfig::default()
        };
        let engine = FleetBuilder::in_memory().config(&config).build().unwrap();
        engine.add_mover("a", 1.0).await.unwrap();
        engine.add_mover("b", 1.0).await.unwrap();

        assert_eq!(engine.top_movers(None).await.unwrap().len(), 1);
        assert_eq!(engine.top_movers(Some(5)).await.unwrap().len(), 2);
    }
}
