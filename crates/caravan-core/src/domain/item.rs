//! Item model: weighted cargo units.

use serde::{Deserialize, Serialize};

use super::errors::{FleetError, Result};
use super::ids::ItemId;

/// A weighted cargo unit. May be carried by at most one mover at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub weight: f64,
}

/// Input for creating an item (the store assigns the id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    pub weight: f64,
}

impl NewItem {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.name)?;
        validate_weight(self.weight)
    }

    pub fn into_item(self, id: ItemId) -> Item {
        Item {
            id,
            name: self.name,
            weight: self.weight,
        }
    }
}

/// Partial update of an item. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl ItemPatch {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        Ok(())
    }

    /// Does applying this patch to `item` change its weight?
    pub fn changes_weight_of(&self, item: &Item) -> bool {
        self.weight.is_some_and(|w| w != item.weight)
    }

    pub fn apply_to(self, item: &mut Item) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(weight) = self.weight {
            item.weight = weight;
        }
    }
}

/// Listing filter. The default filter matches every item.
#[derive(Debug, Clone, Default)]
pub struct ItemFilter {
    /// Case-sensitive substring match on the name.
    pub name_contains: Option<String>,
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        self.name_contains
            .as_deref()
            .is_none_or(|needle| item.name.contains(needle))
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FleetError::invalid_input("item name must not be empty"));
    }
    Ok(())
}

fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(FleetError::invalid_input(format!(
            "item weight must be a non-negative number, got {weight}"
        )));
    }
    Ok(())
}
