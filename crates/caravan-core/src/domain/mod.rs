//! Domain model (IDs, items, movers, mission log, errors).

pub mod errors;
pub mod ids;
pub mod item;
pub mod mission_log;
pub mod mover;
pub mod state;

pub use self::errors::{ErrorKind, FleetError, Result, StoreError};
pub use self::ids::{IdParseError, ItemId, LogEntryId, MoverId};
pub use self::item::{Item, ItemFilter, ItemPatch, NewItem};
pub use self::mission_log::{LogFilter, MissionAction, MissionLogEntry, NewLogEntry};
pub use self::mover::{Mover, MoverFilter, MoverPatch, NewMover};
pub use self::state::MoverState;
