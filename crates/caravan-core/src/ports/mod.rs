//! Ports - 抽象化レイヤー
//!
//! Engine が依存する外部 collaborator のインターフェースです。
//! 各 trait はドキュメントストア・RDB・インメモリ map など、
//! どのバックエンドでも実装できます。
//!
//! # 共通の契約
//! - 存在しない id の参照は `Ok(None)` / `Ok(false)` を返す（エラーにしない）
//! - ストレージ障害は `StoreError` として伝播する
//! - ビジネスルールはここに置かない（Engine の責務）

pub mod clock;
pub mod id_generator;
pub mod item_store;
pub mod mission_log;
pub mod mover_store;

pub use crate::domain::StoreError;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::item_store::ItemStore;
pub use self::mission_log::MissionLog;
pub use self::mover_store::MoverStore;
