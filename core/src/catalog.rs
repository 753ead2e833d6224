//! Catalog views and the custom action form.
//!
//! Views are recomputed from the store's data on every call rather than
//! cached, so they cannot drift from the catalog or the log.

use std::collections::HashSet;

use crate::config::TrackerConfig;
use crate::models::{
    ActionId, Category, EcoAction, EcoLogEntry, Impact, NewEcoAction, FALLBACK_ICON,
};
use crate::number::coerce_quantity;

/// Actions whose name contains `query` (case-insensitive) and, when a
/// category is given, whose category matches it exactly. Source order is kept.
pub fn filter_actions<'a>(
    actions: &'a [EcoAction],
    query: &str,
    category: Option<&Category>,
) -> Vec<&'a EcoAction> {
    let needle = query.to_lowercase();
    actions
        .iter()
        .filter(|action| needle.is_empty() || action.name.to_lowercase().contains(&needle))
        .filter(|action| category.map_or(true, |c| &action.category == c))
        .collect()
}

/// Distinct categories in order of first appearance.
pub fn categories(actions: &[EcoAction]) -> Vec<Category> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for action in actions {
        if seen.insert(&action.category) {
            out.push(action.category.clone());
        }
    }
    out
}

/// Most recently logged distinct actions, newest first, at most `limit`.
///
/// Each entry resolves to the current catalog action; actions that have
/// since been removed are rebuilt from the log entry itself.
pub fn recently_used(logs: &[EcoLogEntry], actions: &[EcoAction], limit: usize) -> Vec<EcoAction> {
    let mut seen: HashSet<&ActionId> = HashSet::new();
    let mut recent = Vec::new();
    for entry in logs.iter().rev() {
        if recent.len() == limit {
            break;
        }
        if !seen.insert(&entry.action_id) {
            continue;
        }
        let action = actions
            .iter()
            .find(|action| action.id == entry.action_id)
            .cloned()
            .unwrap_or_else(|| entry.to_action());
        recent.push(action);
    }
    recent
}

/// A quantity field of the custom action form. Untouched fields keep the
/// preset; edited ones hold the raw text.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum QuantityInput {
    #[default]
    Unset,
    Text(String),
}

impl QuantityInput {
    pub fn resolve(&self, preset: f64) -> f64 {
        match self {
            QuantityInput::Unset => preset,
            QuantityInput::Text(text) => coerce_quantity(text),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ImpactInput {
    pub co2_saved: QuantityInput,
    pub waste_saved: QuantityInput,
    pub energy_saved: QuantityInput,
    pub water_saved: QuantityInput,
}

impl ImpactInput {
    /// All four quantities given as numbers.
    pub fn from_values(impact: Impact) -> Self {
        Self {
            co2_saved: QuantityInput::Text(impact.co2_saved.to_string()),
            waste_saved: QuantityInput::Text(impact.waste_saved.to_string()),
            energy_saved: QuantityInput::Text(impact.energy_saved.to_string()),
            water_saved: QuantityInput::Text(impact.water_saved.to_string()),
        }
    }

    pub fn resolve(&self, preset: &Impact) -> Impact {
        Impact {
            co2_saved: self.co2_saved.resolve(preset.co2_saved),
            waste_saved: self.waste_saved.resolve(preset.waste_saved),
            energy_saved: self.energy_saved.resolve(preset.energy_saved),
            water_saved: self.water_saved.resolve(preset.water_saved),
        }
    }
}

/// Contents of the "add custom action" form.
#[derive(Clone, Debug, PartialEq)]
pub struct CustomActionDraft {
    pub name: String,
    pub category: Category,
    pub impact: ImpactInput,
}

impl CustomActionDraft {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            name: String::new(),
            category: config.default_category(),
            impact: ImpactInput::default(),
        }
    }

    pub fn can_save(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// The action to add, or `None` when the name is blank.
    pub fn build(&self, config: &TrackerConfig) -> Option<NewEcoAction> {
        if !self.can_save() {
            return None;
        }
        Some(NewEcoAction {
            name: self.name.clone(),
            category: self.category.clone(),
            impact: self.impact.resolve(&config.default_impact),
            icon: self.category.icon().unwrap_or(FALLBACK_ICON).to_string(),
        })
    }
}

/// Actions every new user starts with.
pub fn predefined_actions() -> Vec<EcoAction> {
    let entries: [(&str, &str, &str, Impact); 12] = [
        ("bike-commute", "Biked instead of driving", Category::TRANSPORT, Impact::new(2.6, 0.0, 0.0, 0.0)),
        ("public-transit", "Took public transport", Category::TRANSPORT, Impact::new(1.8, 0.0, 0.0, 0.0)),
        ("walk-errand", "Walked to run an errand", Category::TRANSPORT, Impact::new(0.9, 0.0, 0.0, 0.0)),
        ("plant-meal", "Ate a plant-based meal", Category::FOOD, Impact::new(1.5, 0.1, 0.0, 0.0)),
        ("local-produce", "Bought local produce", Category::FOOD, Impact::new(0.5, 0.1, 0.0, 0.0)),
        ("lights-off", "Turned off unused lights", Category::ENERGY, Impact::new(0.3, 0.0, 0.5, 0.0)),
        ("air-dry", "Air-dried laundry", Category::ENERGY, Impact::new(1.2, 0.0, 2.0, 0.0)),
        ("recycle", "Recycled household waste", Category::WASTE, Impact::new(0.4, 1.0, 0.0, 0.0)),
        ("reusable-bag", "Used a reusable bag", Category::WASTE, Impact::new(0.1, 0.05, 0.0, 0.0)),
        ("short-shower", "Took a shorter shower", Category::WATER, Impact::new(0.2, 0.0, 0.4, 30.0)),
        ("second-hand", "Bought second-hand", Category::SHOPPING, Impact::new(2.0, 0.5, 0.0, 0.0)),
        ("reusable-bottle", "Used a reusable water bottle", Category::OTHER, Impact::new(0.1, 0.05, 0.0, 0.5)),
    ];

    entries
        .into_iter()
        .map(|(id, name, category, impact)| {
            let category = Category::new(category);
            EcoAction {
                id: ActionId(id.to_string()),
                name: name.to_string(),
                icon: category.icon().unwrap_or(FALLBACK_ICON).to_string(),
                category,
                impact,
            }
        })
        .collect()
}
