//! Mission log model: append-only transition records.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{LogEntryId, MoverId};
use super::state::MoverState;

/// Transition label recorded in the log. Always the state the mover entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MissionAction {
    Resting,
    Loading,
    OnMission,
}

impl From<MissionAction> for MoverState {
    fn from(action: MissionAction) -> Self {
        match action {
            MissionAction::Resting => MoverState::Resting,
            MissionAction::Loading => MoverState::Loading,
            MissionAction::OnMission => MoverState::OnMission,
        }
    }
}

impl fmt::Display for MissionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        MoverState::from(*self).fmt(f)
    }
}

/// One accepted transition. Never mutated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionLogEntry {
    pub id: LogEntryId,
    pub mover_id: MoverId,
    pub action: MissionAction,
    pub timestamp: DateTime<Utc>,
}

/// Input for appending an entry (the log assigns the id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogEntry {
    pub mover_id: MoverId,
    pub action: MissionAction,
    pub timestamp: DateTime<Utc>,
}

impl NewLogEntry {
    pub fn into_entry(self, id: LogEntryId) -> MissionLogEntry {
        MissionLogEntry {
            id,
            mover_id: self.mover_id,
            action: self.action,
            timestamp: self.timestamp,
        }
    }
}

/// Listing filter. The default filter matches every entry.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub mover_id: Option<MoverId>,
    pub action: Option<MissionAction>,
}

impl LogFilter {
    pub fn for_mover(mover_id: MoverId) -> Self {
        Self {
            mover_id: Some(mover_id),
            action: None,
        }
    }

    pub fn matches(&self, entry: &MissionLogEntry) -> bool {
        self.mover_id.is_none_or(|id| entry.mover_id == id)
            && self.action.is_none_or(|a| entry.action == a)
    }
}
