use super::*;

use std::collections::HashMap;

use proptest::prelude::*;

#[test]
fn toggle_reports_new_membership() {
    let mut model = FilterSelectionModel::new();
    assert!(model.toggle(FilterKind::Category, "Writing"));
    assert!(model.is_selected(FilterKind::Category, "Writing"));
    assert!(!model.toggle(FilterKind::Category, "Writing"));
    assert!(!model.is_selected(FilterKind::Category, "Writing"));
}

#[test]
fn category_and_pricing_sets_are_independent() {
    let mut model = FilterSelectionModel::new();
    model.toggle(FilterKind::Category, "Free");
    model.toggle(FilterKind::Pricing, "Paid");

    assert_eq!(model.categories(), vec!["Free".to_string()]);
    assert_eq!(model.pricing(), vec!["Paid".to_string()]);
    assert!(!model.is_selected(FilterKind::Pricing, "Free"));
}

#[test]
fn double_toggle_restores_previous_selection() {
    let mut model = FilterSelectionModel::new();
    model.toggle(FilterKind::Pricing, "Freemium");
    let before = model.clone();

    model.toggle(FilterKind::Category, "Video");
    model.toggle(FilterKind::Category, "Video");

    assert_eq!(model, before);
    assert!(model.is_selected(FilterKind::Pricing, "Freemium"));
}

fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Writing".to_string()),
        Just("Video".to_string()),
        Just("Code".to_string()),
        Just("Image".to_string()),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_selection_matches_odd_toggle_counts(toggles in proptest::collection::vec(arb_category(), 0..40)) {
        let mut model = FilterSelectionModel::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for value in &toggles {
            model.toggle(FilterKind::Category, value);
            *counts.entry(value.clone()).or_default() += 1;
        }

        let mut expected: Vec<String> = counts
            .into_iter()
            .filter(|(_, count)| count % 2 == 1)
            .map(|(value, _)| value)
            .collect();
        expected.sort();

        prop_assert_eq!(model.categories(), expected);
        prop_assert!(model.pricing().is_empty());
    }
}
