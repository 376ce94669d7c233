//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: ULID ベース（本番用）

use std::sync::Arc;

use ulid::Ulid;

use crate::domain::{ItemId, LogEntryId, MoverId};
use crate::ports::{Clock, SystemClock};

/// IdGenerator はストアが record を作るときに使う
///
/// # Thread Safety
/// - `Send + Sync` を要求（複数タスクから使える）
pub trait IdGenerator: Send + Sync {
    fn generate_item_id(&self) -> ItemId;

    fn generate_mover_id(&self) -> MoverId;

    fn generate_log_entry_id(&self) -> LogEntryId;
}

/// UlidGenerator は Clock の時刻を timestamp 部に使う
///
/// FixedClock を渡すと timestamp 部分が固定される（ランダム部分は毎回異なる）。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    fn next_ulid(&self) -> Ulid {
        let timestamp_ms = u64::try_from(self.clock.now().timestamp_millis()).unwrap_or(0);
        Ulid::from_parts(timestamp_ms, rand::random())
    }
}

impl UlidGenerator<SystemClock> {
    /// Shared system-clock generator, the default for stores.
    pub fn shared() -> Arc<dyn IdGenerator> {
        Arc::new(Self::new(SystemClock))
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_item_id(&self) -> ItemId {
        ItemId::from(self.next_ulid())
    }

    fn generate_mover_id(&self) -> MoverId {
        MoverId::from(self.next_ulid())
    }

    fn generate_log_entry_id(&self) -> LogEntryId {
        LogEntryId::from(self.next_ulid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::{TimeZone, Utc};

    #[test]
    fn ulid_generator_generates_unique_ids() {
        let id_gen = UlidGenerator::new(SystemClock);

        let id1 = id_gen.generate_mover_id();
        let id2 = id_gen.generate_mover_id();

        assert_ne!(id1, id2);
    }

    #[test]
    fn fixed_clock_pins_the_timestamp_part() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let id_gen = UlidGenerator::new(FixedClock::new(fixed_time));

        let id1 = id_gen.generate_item_id();
        let id2 = id_gen.generate_item_id();

        // ランダム部分があるので ID は異なる
        assert_ne!(id1, id2);
        assert_eq!(id1.as_ulid().timestamp_ms(), id2.as_ulid().timestamp_ms());
        assert_eq!(
            id1.as_ulid().timestamp_ms(),
            u64::try_from(fixed_time.timestamp_millis()).unwrap()
        );
    }

    #[test]
    fn different_id_types_are_generated() {
        let id_gen = UlidGenerator::new(SystemClock);

        assert!(id_gen.generate_item_id().to_string().starts_with("item-"));
        assert!(id_gen.generate_mover_id().to_string().starts_with("mover-"));
        assert!(id_gen.generate_log_entry_id().to_string().starts_with("log-"));
    }
}
