//! Mover state machine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mover state.
///
/// State transitions:
/// - Resting -> Loading (first item loaded)
/// - Loading -> Loading (further items loaded)
/// - Loading -> OnMission (mission started)
/// - OnMission -> Resting (mission ended, cargo cleared)
///
/// There is no terminal state; movers cycle indefinitely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MoverState {
    /// Idle, no cargo.
    Resting,

    /// Accepting cargo, not yet dispatched.
    Loading,

    /// Dispatched; cargo is locked.
    OnMission,
}

impl MoverState {
    /// Can an item be loaded in this state?
    pub fn accepts_cargo(self) -> bool {
        matches!(self, MoverState::Resting | MoverState::Loading)
    }

    /// Can a mission be started from this state?
    pub fn can_start_mission(self) -> bool {
        self == MoverState::Loading
    }

    /// Can a mission be ended from this state?
    pub fn can_end_mission(self) -> bool {
        self == MoverState::OnMission
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MoverState::Resting => "resting",
            MoverState::Loading => "loading",
            MoverState::OnMission => "on-mission",
        }
    }
}

impl fmt::Display for MoverState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::resting(MoverState::Resting, true, false, false)]
    #[case::loading(MoverState::Loading, true, true, false)]
    #[case::on_mission(MoverState::OnMission, false, false, true)]
    fn permitted_operations(
        #[case] state: MoverState,
        #[case] load: bool,
        #[case] start: bool,
        #[case] end: bool,
    ) {
        assert_eq!(state.accepts_cargo(), load);
        assert_eq!(state.can_start_mission(), start);
        assert_eq!(state.can_end_mission(), end);
    }

    #[test]
    fn serializes_as_kebab_case_labels() {
        let json = serde_json::to_string(&MoverState::OnMission).unwrap();
        assert_eq!(json, "\"on-mission\"");
        assert_eq!(MoverState::OnMission.to_string(), "on-mission");
    }
}
