use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActionId(pub String);

impl ActionId {
    /// Fresh id of the form `<prefix>-<uuid>`.
    pub fn generate(prefix: &str) -> Self {
        ActionId(format!("{}-{}", prefix, Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogId(pub String);

impl LogId {
    pub fn generate() -> Self {
        LogId(Uuid::new_v4().to_string())
    }
}

/// Action category. The set is open; the constants below are the ones the
/// predefined catalog ships with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category(pub String);

impl Category {
    pub const TRANSPORT: &'static str = "transport";
    pub const FOOD: &'static str = "food";
    pub const ENERGY: &'static str = "energy";
    pub const WASTE: &'static str = "waste";
    pub const WATER: &'static str = "water";
    pub const SHOPPING: &'static str = "shopping";
    pub const OTHER: &'static str = "other";

    pub fn new(name: impl Into<String>) -> Self {
        Category(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Icon for a known category.
    pub fn icon(&self) -> Option<&'static str> {
        match self.0.as_str() {
            Self::TRANSPORT => Some("🚲"),
            Self::FOOD => Some("🥗"),
            Self::ENERGY => Some("💡"),
            Self::WASTE => Some("♻️"),
            Self::WATER => Some("💧"),
            Self::SHOPPING => Some("🛍️"),
            Self::OTHER => Some("🌱"),
            _ => None,
        }
    }

    /// Capitalized label for category badges.
    pub fn label(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Icon used when a new action's category has no icon of its own.
pub const FALLBACK_ICON: &str = "✓";

/// Icon shown in listings for categories without an icon.
pub const LISTING_ICON: &str = "♻️";

/// Environmental impact of performing an action once.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    /// kg of CO2
    pub co2_saved: f64,
    /// kg of waste
    pub waste_saved: f64,
    /// kWh
    pub energy_saved: f64,
    /// litres
    pub water_saved: f64,
}

impl Impact {
    pub const fn new(co2_saved: f64, waste_saved: f64, energy_saved: f64, water_saved: f64) -> Self {
        Self {
            co2_saved,
            waste_saved,
            energy_saved,
            water_saved,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoAction {
    pub id: ActionId,
    pub name: String,
    pub category: Category,
    pub impact: Impact,
    pub icon: String,
}

impl EcoAction {
    /// Icon for list rendering: the category icon, or the generic listing icon.
    pub fn display_icon(&self) -> &str {
        self.category.icon().unwrap_or(LISTING_ICON)
    }
}

/// An action that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEcoAction {
    pub name: String,
    pub category: Category,
    pub impact: Impact,
    pub icon: String,
}

impl NewEcoAction {
    pub fn with_id(self, id: ActionId) -> EcoAction {
        EcoAction {
            id,
            name: self.name,
            category: self.category,
            impact: self.impact,
            icon: self.icon,
        }
    }
}

/// One logged occurrence of an action. Name, category and impact are copied
/// at log time and stay fixed afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcoLogEntry {
    pub id: LogId,
    pub action_id: ActionId,
    pub action_name: String,
    pub category: Category,
    pub impact: Impact,
    pub date: DateTime<Utc>,
}

impl EcoLogEntry {
    pub fn snapshot(action: &EcoAction, date: DateTime<Utc>) -> Self {
        Self {
            id: LogId::generate(),
            action_id: action.id.clone(),
            action_name: action.name.clone(),
            category: action.category.clone(),
            impact: action.impact,
            date,
        }
    }

    /// Rebuild an action from the denormalized fields, for when the source
    /// action is no longer in the catalog.
    pub fn to_action(&self) -> EcoAction {
        EcoAction {
            id: self.action_id.clone(),
            name: self.action_name.clone(),
            category: self.category.clone(),
            impact: self.impact,
            icon: FALLBACK_ICON.to_string(),
        }
    }
}
