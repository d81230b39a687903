//! Property-based tests
//!
//! Covers the invariants that hold for arbitrary inputs: money rounding,
//! profile resolution idempotence, and dynamic-profile round-tripping.

use printquote::profile::{DynamicProfileGenerator, ProfileLine, ProfileResolver, load_profile};
use printquote::{Money, PrintParameters};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Keys the dynamic generator may rewrite; base-profile generation avoids
/// them so preservation can be asserted exactly.
const OVERRIDDEN_KEYS: &[&str] = &[
    "layer_height",
    "perimeters",
    "fill_density",
    "top_solid_layers",
    "bottom_solid_layers",
    "fill_pattern",
    "brim_type",
    "brim_width",
    "support_material",
    "support_material_auto",
    "support_material_pattern",
    "seam_position",
    "color_change_gcode",
];

fn free_key() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,15}".prop_filter("not an overridden key", |k| {
        !OVERRIDDEN_KEYS.contains(&k.as_str())
    })
}

proptest! {
    #[test]
    fn prop_money_round_trips_exact_cents(cents in 0i64..10_000_000) {
        let amount = cents as f64 / 100.0;
        prop_assert_eq!(Money::from_amount_half_up(amount), Money::from_cents(cents));
    }

    #[test]
    fn prop_money_sum_matches_cent_sum(a in 0i64..1_000_000, b in 0i64..1_000_000) {
        let sum = Money::from_cents(a) + Money::from_cents(b);
        prop_assert_eq!(sum.cents(), a + b);
    }

    #[test]
    fn prop_resolution_is_idempotent(
        technology in prop::sample::select(vec!["FDM", "SLS", "SLA"]),
        material in prop::sample::select(vec!["PLA", "ABS", "PETG", "TPU"]),
        layer_height in 0.05f64..0.4,
        supports: bool,
    ) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(format!("{}.ini", technology.to_lowercase())),
            "layer_height = 0.2\n",
        ).unwrap();

        let resolver = ProfileResolver::new(dir.path());
        let first = resolver.resolve(technology, material, layer_height, supports);
        let second = resolver.resolve(technology, material, layer_height, supports);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_dynamic_profile_preserves_unrelated_keys(
        base_pairs in prop::collection::btree_map(free_key(), "[a-z0-9.]{1,8}", 1..12),
        shells in 1u32..=5,
        infill in 5u32..=20,
        supports: bool,
    ) {
        let dir = tempfile::tempdir().unwrap();
        let base_path = dir.path().join("base.ini");

        let mut content = String::from("# generated base\n\n");
        for (key, value) in &base_pairs {
            content.push_str(&format!("{key} = {value}\n"));
        }
        std::fs::write(&base_path, content).unwrap();

        let params = PrintParameters::new("FDM", "PLA", 0.2, shells, infill, supports);
        let generator = DynamicProfileGenerator::new(dir.path());
        let generated = generator.generate(&base_path, &params).unwrap();
        let lines = load_profile(&generated).unwrap();

        let pairs: BTreeMap<String, String> = lines
            .iter()
            .filter_map(|line| match line {
                ProfileLine::Pair { key, value } => Some((key.clone(), value.clone())),
                _ => None,
            })
            .collect();

        // Every original non-overridden key survives unchanged
        for (key, value) in &base_pairs {
            prop_assert_eq!(pairs.get(key), Some(value));
        }

        // Every overridden mandatory key appears exactly once
        for key in ["layer_height", "perimeters", "fill_density"] {
            let count = lines.iter().filter(|line| matches!(
                line,
                ProfileLine::Pair { key: k, .. } if k == key
            )).count();
            prop_assert_eq!(count, 1);
        }

        // The support pair is always consistent
        let flag = if supports { "1" } else { "0" };
        prop_assert_eq!(pairs.get("support_material").map(String::as_str), Some(flag));
        prop_assert_eq!(pairs.get("support_material_auto").map(String::as_str), Some(flag));

        generator.cleanup(&generated);
        prop_assert!(!generated.exists());
    }
}
