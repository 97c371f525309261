use std::collections::BTreeSet;

use shared::domain::FilterKind;

/// Categories and pricing tiers the user has selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelectionModel {
    selected_categories: BTreeSet<String>,
    selected_pricing: BTreeSet<String>,
}

impl FilterSelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `value` and returns whether it is now selected.
    pub fn toggle(&mut self, kind: FilterKind, value: &str) -> bool {
        let set = self.set_mut(kind);
        if set.remove(value) {
            false
        } else {
            set.insert(value.to_string());
            true
        }
    }

    pub fn is_selected(&self, kind: FilterKind, value: &str) -> bool {
        self.set(kind).contains(value)
    }

    pub fn categories(&self) -> Vec<String> {
        self.selected_categories.iter().cloned().collect()
    }

    pub fn pricing(&self) -> Vec<String> {
        self.selected_pricing.iter().cloned().collect()
    }

    fn set(&self, kind: FilterKind) -> &BTreeSet<String> {
        match kind {
            FilterKind::Category => &self.selected_categories,
            FilterKind::Pricing => &self.selected_pricing,
        }
    }

    fn set_mut(&mut self, kind: FilterKind) -> &mut BTreeSet<String> {
        match kind {
            FilterKind::Category => &mut self.selected_categories,
            FilterKind::Pricing => &mut self.selected_pricing,
        }
    }
}

#[cfg(test)]
#[path = "tests/filters_tests.rs"]
mod tests;
