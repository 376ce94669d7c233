//! Status - fleet の状態別集計

use serde::{Deserialize, Serialize};

use crate::domain::{Mover, MoverState};

/// Number of movers in each state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FleetCounts {
    pub resting: usize,
    pub loading: usize,
    pub on_mission: usize,
}

impl FleetCounts {
    pub fn tally<'a>(movers: impl IntoIterator<Item = &'a Mover>) -> Self {
        let mut counts = Self::default();
        for mover in movers {
            match mover.state {
                MoverState::Resting => counts.resting += 1,
                MoverState::Loading => counts.loading += 1,
                MoverState::OnMission => counts.on_mission += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.resting + self.loading + self.on_mission
    }
}
