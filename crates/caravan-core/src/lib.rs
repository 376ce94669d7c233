//! caravan-core
//!
//! Fleet lifecycle core: movers carry items up to a weight limit, cycle through
//! `resting → loading → on-mission → resting`, and every accepted transition is
//! recorded in an append-only mission log.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, item, mover, state, mission_log, errors）
//! - **ports**: 抽象化レイヤー（ItemStore, MoverStore, MissionLog, Clock, IdGenerator）
//! - **impls**: 実装（in-memory ストア、JSONL mission log）
//! - **app**: アプリケーションロジック（builder, engine, ranking, status）
//! - **config**: TOML 設定

pub mod app;
pub mod config;
pub mod domain;
pub mod impls;
pub mod ports;
