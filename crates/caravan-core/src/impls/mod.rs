//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryItemStore / InMemoryMoverStore / InMemoryMissionLog**: 開発・テスト用
//! - **JsonlMissionLog**: JSON Lines ファイルへの追記ログ

mod table;

pub mod inmem_items;
pub mod inmem_log;
pub mod inmem_movers;
pub mod jsonl_log;

pub use self::inmem_items::InMemoryItemStore;
pub use self::inmem_log::InMemoryMissionLog;
pub use self::inmem_movers::InMemoryMoverStore;
pub use self::jsonl_log::JsonlMissionLog;
