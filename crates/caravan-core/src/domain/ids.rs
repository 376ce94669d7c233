//! Domain identifiers (strongly-typed IDs).
//!
//! # ULID ベースの ID + ジェネリック実装
//! すべての ID は ULID (Universally Unique Lexicographically Sortable Identifier) です。
//! `Id<T>` の `T` は実行時には使わないマーカー型で、`ItemId` と `MoverId` を
//! コンパイル時に区別します。
//!
//! Display は `<prefix><ulid>` 形式（例: `mover-01J...`）で、`FromStr` は同じ形式を受け付けます。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// IdMarker は各 ID 型のマーカー trait
///
/// Display で使うプレフィックス（"item-", "mover-", "log-"）を提供します。
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// ジェネリック ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Error returned when a string is not a valid prefixed id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {expected}id: {input:?}")]
pub struct IdParseError {
    expected: &'static str,
    input: String,
}

impl<T: IdMarker> FromStr for Id<T> {
    type Err = IdParseError;

    /// Accepts `<prefix><ulid>` as well as a bare ULID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.strip_prefix(T::prefix()).unwrap_or(s);
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| IdParseError {
                expected: T::prefix(),
                input: s.to_string(),
            })
    }
}

// ========================================
// マーカー型の定義
// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Item {}

impl IdMarker for Item {
    fn prefix() -> &'static str {
        "item-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mover {}

impl IdMarker for Mover {
    fn prefix() -> &'static str {
        "mover-"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogEntry {}

impl IdMarker for LogEntry {
    fn prefix() -> &'static str {
        "log-"
    }
}

/// Identifier of an Item (a weighted cargo unit).
pub type ItemId = Id<Item>;

/// Identifier of a Mover (a capacity-limited carrier).
pub type MoverId = Id<Mover>;

/// Identifier of a Mission Log entry.
pub type LogEntryId = Id<LogEntry>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_prefix() {
        let ulid = Ulid::new();

        assert_eq!(ItemId::from_ulid(ulid).to_string(), format!("item-{ulid}"));
        assert_eq!(MoverId::from_ulid(ulid).to_string(), format!("mover-{ulid}"));
        assert_eq!(LogEntryId::from_ulid(ulid).to_string(), format!("log-{ulid}"));
    }

    #[test]
    fn parse_accepts_display_form_and_bare_ulid() {
        let id = MoverId::from_ulid(Ulid::new());

        let parsed: MoverId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let bare: MoverId = id.as_ulid().to_string().parse().unwrap();
        assert_eq!(bare, id);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "mover-not-a-ulid".parse::<MoverId>().unwrap_err();
        assert!(err.to_string().contains("mover-"));
    }

    #[test]
    fn ulid_ids_can_be_serialized() {
        let id = ItemId::from_ulid(Ulid::new());

        // transparent: JSON 上は ULID 文字列そのもの
        let serialized = serde_json::to_string(&id).unwrap();
        assert_eq!(serialized, format!("\"{}\"", id.as_ulid()));

        let deserialized: ItemId = serde_json::from_str(&serialized).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<MoverId>(), size_of::<Ulid>());
        assert_eq!(size_of::<ItemId>(), 16);
    }
}
