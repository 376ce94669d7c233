//! App - アプリケーション層
//!
//! ports を組み合わせて lifecycle ロジックを実装します。
//!
//! # 主要コンポーネント
//! - **FleetBuilder**: engine の構築とワイヤリング
//! - **FleetEngine**: lifecycle 状態機械（add / load / start / end）と item 操作
//! - **KeyedLocks**: mover / item ごとの直列化
//! - **rank_movers**: ランキングクエリ
//! - **FleetCounts**: 状態別の集計

pub mod builder;
pub mod engine;
pub mod locks;
pub mod ranking;
pub mod status;

pub use self::builder::{BuildError, FleetBuilder};
pub use self::engine::FleetEngine;
pub use self::locks::{KeyGuard, KeyedLocks};
pub use self::ranking::rank_movers;
pub use self::status::FleetCounts;
