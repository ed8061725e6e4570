//! Integration tests for target selection with YAML-configured targets.

use fieldhook_core::{
    Coordinates, ParamValue, PoiSnapshot, ResearchDescriptor, StaticGeofences, YamlTargetSource,
};
use fieldhook_filter::EligibilityFilter;
use std::collections::HashMap;
use std::sync::Arc;

const TARGETS: &str = r#"
webhooks:
  - id: everything
    type: json
    target: "https://hooks.example/all"
    body: "{}"
  - id: no-small-catches
    type: json
    target: "https://hooks.example/big"
    body: "{}"
    objectives:
      mode: blacklist
      requirements:
        - type: catch
          params: {quantity: 5}
  - id: starters-downtown
    type: telegram
    target: "tg://send?to=-100500"
    body: "<%REWARD%>"
    geofence: downtown
    rewards:
      requirements:
        - type: encounter
          params: {species: [1, 4, 7]}
"#;

fn filter() -> EligibilityFilter {
    let mut fences = HashMap::new();
    fences.insert(
        "downtown".to_string(),
        vec![[59.90, 10.70], [59.90, 10.80], [59.95, 10.80], [59.95, 10.70]],
    );
    EligibilityFilter::new(Arc::new(StaticGeofences::from_config(&fences)))
}

fn poi(latitude: f64, objective: ResearchDescriptor, species: i64) -> PoiSnapshot {
    PoiSnapshot {
        id: Some("1".to_string()),
        name: "Fountain".to_string(),
        location: Coordinates::new(latitude, 10.75),
        objective,
        reward: ResearchDescriptor::new("encounter").with_param("species", ParamValue::list([species])),
    }
}

fn selected(poi: &PoiSnapshot) -> Vec<String> {
    let targets = YamlTargetSource::parse(TARGETS).unwrap();
    filter()
        .select(&targets, poi)
        .into_iter()
        .map(|t| t.id.clone())
        .collect()
}

#[test]
fn test_starter_downtown_reaches_everyone() {
    let catch_ten = ResearchDescriptor::new("catch").with_param("quantity", 10);
    assert_eq!(
        selected(&poi(59.92, catch_ten, 4)),
        vec!["everything", "no-small-catches", "starters-downtown"]
    );
}

#[test]
fn test_blacklisted_objective() {
    let catch_five = ResearchDescriptor::new("catch").with_param("quantity", 5);
    assert_eq!(selected(&poi(59.92, catch_five, 4)), vec!["everything", "starters-downtown"]);
}

#[test]
fn test_outside_geofence() {
    let catch_ten = ResearchDescriptor::new("catch").with_param("quantity", 10);
    assert_eq!(selected(&poi(60.5, catch_ten, 4)), vec!["everything", "no-small-catches"]);
}

#[test]
fn test_wrong_species() {
    let hatch = ResearchDescriptor::new("hatch").with_param("quantity", 1);
    assert_eq!(selected(&poi(59.92, hatch, 25)), vec!["everything", "no-small-catches"]);
}
