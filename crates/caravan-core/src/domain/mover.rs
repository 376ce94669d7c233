//! Mover record and its lifecycle transitions.

use serde::{Deserialize, Serialize};

use super::errors::{FleetError, Result};
use super::ids::{ItemId, MoverId};
use super::item::Item;
use super::mission_log::MissionAction;
use super::state::MoverState;

/// Relative slack for rounding in the running weight sum (0.1 + 0.2 vs 0.3).
const CAPACITY_EPSILON: f64 = 1e-9;

/// A capacity-limited carrier.
///
/// Design:
/// - State transitions happen through methods, never by direct field writes.
/// - Every transition method validates fully before mutating anything.
/// - Invariants: `current_weight` is the sum of the carried items' weights,
///   `current_weight <= weight_limit`, and a resting mover carries nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mover {
    pub id: MoverId,
    pub name: String,
    pub weight_limit: f64,
    pub state: MoverState,
    pub current_weight: f64,

    /// Carried item ids in load order (no duplicates).
    pub carried_items: Vec<ItemId>,

    pub missions_completed: u64,
}

impl Mover {
    /// Load `item`. Returns the log action to emit, if this load is a state edge
    /// (only the first load from `Resting` is).
    pub fn load(&mut self, item: &Item) -> Result<Option<MissionAction>> {
        if !self.state.accepts_cargo() {
            return Err(self.invalid_state("load"));
        }
        if self.carries(item.id) {
            return Err(FleetError::ItemAlreadyCarried {
                item_id: item.id,
                carrier: self.id,
            });
        }
        let attempted = self.current_weight + item.weight;
        if attempted - self.weight_limit > CAPACITY_EPSILON * self.weight_limit.max(1.0) {
            return Err(FleetError::CapacityExceeded {
                mover_id: self.id,
                item_id: item.id,
                attempted,
                limit: self.weight_limit,
            });
        }

        let entered = self.state == MoverState::Resting;
        self.carried_items.push(item.id);
        self.current_weight = attempted.min(self.weight_limit);
        self.state = MoverState::Loading;
        Ok(entered.then_some(MissionAction::Loading))
    }

    /// Dispatch: Loading -> OnMission.
    pub fn start_mission(&mut self) -> Result<MissionAction> {
        if !self.state.can_start_mission() {
            return Err(self.invalid_state("start mission for"));
        }
        self.state = MoverState::OnMission;
        Ok(MissionAction::OnMission)
    }

    /// Complete: OnMission -> Resting, clearing cargo.
    pub fn end_mission(&mut self) -> Result<MissionAction> {
        if !self.state.can_end_mission() {
            return Err(self.invalid_state("end mission for"));
        }
        self.carried_items.clear();
        self.current_weight = 0.0;
        self.missions_completed += 1;
        self.state = MoverState::Resting;
        Ok(MissionAction::Resting)
    }

    pub fn carries(&self, item_id: ItemId) -> bool {
        self.carried_items.contains(&item_id)
    }

    /// Full patch of the mutable fields (used to write back a transition, or to restore a snapshot).
    pub fn patch(&self) -> MoverPatch {
        MoverPatch {
            state: Some(self.state),
            current_weight: Some(self.current_weight),
            carried_items: Some(self.carried_items.clone()),
            missions_completed: Some(self.missions_completed),
        }
    }

    fn invalid_state(&self, operation: &'static str) -> FleetError {
        FleetError::InvalidState {
            mover_id: self.id,
            state: self.state,
            operation,
        }
    }
}

/// Input for creating a mover. New movers always start `Resting` and empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMover {
    pub name: String,
    pub weight_limit: f64,
}

impl NewMover {
    pub fn new(name: impl Into<String>, weight_limit: f64) -> Self {
        Self {
            name: name.into(),
            weight_limit,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(FleetError::invalid_input("mover name must not be empty"));
        }
        if !self.weight_limit.is_finite() || self.weight_limit <= 0.0 {
            return Err(FleetError::invalid_input(format!(
                "weight limit must be a positive number, got {}",
                self.weight_limit
            )));
        }
        Ok(())
    }

    pub fn into_mover(self, id: MoverId) -> Mover {
        Mover {
            id,
            name: self.name,
            weight_limit: self.weight_limit,
            state: MoverState::Resting,
            current_weight: 0.0,
            carried_items: Vec::new(),
            missions_completed: 0,
        }
    }
}

/// Partial update of a mover's mutable fields. Name and limit are immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoverPatch {
    pub state: Option<MoverState>,
    pub current_weight: Option<f64>,
    pub carried_items: Option<Vec<ItemId>>,
    pub missions_completed: Option<u64>,
}

impl MoverPatch {
    pub fn apply_to(self, mover: &mut Mover) {
        if let Some(state) = self.state {
            mover.state = state;
        }
        if let Some(weight) = self.current_weight {
            mover.current_weight = weight;
        }
        if let Some(items) = self.carried_items {
            mover.carried_items = items;
        }
        if let Some(missions) = self.missions_completed {
            mover.missions_completed = missions;
        }
    }
}

/// Listing filter. The default filter matches every mover.
#[derive(Debug, Clone, Default)]
pub struct MoverFilter {
    pub state: Option<MoverState>,

    /// Only movers currently carrying this item.
    pub carrying: Option<ItemId>,
}

impl MoverFilter {
    pub fn carrying(item_id: ItemId) -> Self {
        Self {
            state: None,
            carrying: Some(item_id),
        }
    }

    pub fn matches(&self, mover: &Mover) -> bool {
        self.state.is_none_or(|s| mover.state == s)
            && self.carrying.is_none_or(|id| mover.carries(id))
    }
}
