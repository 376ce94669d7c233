//! Errors - エラー型と分類
//!
//! - `StoreError`: ストレージ collaborator の障害
//! - `FleetError`: lifecycle 操作の失敗（呼び出し側へ同期的に返す）
//! - `ErrorKind`: 運用上の分類（HTTP 層などはこれでステータスを決める）

use std::io;

use thiserror::Error;

use super::ids::{ItemId, MoverId};
use super::state::MoverState;

/// ErrorKind は失敗の分類
///
/// - NotFound: 参照された mover / item が存在しない
/// - InvalidState: 現在の状態ではその操作ができない
/// - CapacityExceeded: 積載重量の上限を超える
/// - InvalidInput: 作成・更新の引数が不正
/// - StorageUnavailable: ストレージ側の障害
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    CapacityExceeded,
    InvalidInput,
    StorageUnavailable,
}

/// Failure reported by a storage collaborator.
///
/// Missing records are not errors: stores return `Ok(None)` / `Ok(false)` for those.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure of a fleet operation.
#[derive(Debug, Error)]
pub enum FleetError {
    #[error("mover not found: {0}")]
    MoverNotFound(MoverId),

    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("cannot {operation} mover {mover_id} while {state}")]
    InvalidState {
        mover_id: MoverId,
        state: MoverState,
        operation: &'static str,
    },

    #[error("loading {item_id} onto {mover_id} would carry {attempted} (limit {limit})")]
    CapacityExceeded {
        mover_id: MoverId,
        item_id: ItemId,
        attempted: f64,
        limit: f64,
    },

    #[error("item {item_id} is already carried by {carrier}")]
    ItemAlreadyCarried { item_id: ItemId, carrier: MoverId },

    #[error("item {item_id} is in use by {carrier}")]
    ItemInUse { item_id: ItemId, carrier: MoverId },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl FleetError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FleetError::MoverNotFound(_) | FleetError::ItemNotFound(_) => ErrorKind::NotFound,
            FleetError::InvalidState { .. }
            | FleetError::ItemAlreadyCarried { .. }
            | FleetError::ItemInUse { .. } => ErrorKind::InvalidState,
            FleetError::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            FleetError::InvalidInput(_) => ErrorKind::InvalidInput,
            FleetError::Storage(_) => ErrorKind::StorageUnavailable,
        }
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        FleetError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, FleetError>;
