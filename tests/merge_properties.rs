//! Property tests for the guarantees the merge engine makes.

use std::collections::HashSet;

use proptest::prelude::*;
use serde_json::Value;
use scenmerge::{CustomizationDetector, MergeMode, ScenarioCollection, ScenarioRecord, merge};

fn step() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[a-z ]{1,8}",
        1 => "[a-z ]{0,4}".prop_map(|s| format!("// Custom: {s}")),
    ]
}

fn priority() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop_oneof![
        Just(String::new()),
        Just("high".to_owned()),
        Just("low".to_owned()),
    ])
}

fn record() -> impl Strategy<Value = ScenarioRecord> {
    (
        "[a-f]",
        prop::collection::vec(step(), 0..4),
        priority(),
        prop::bool::weighted(0.2),
        prop::option::of("[a-z]{1,5}"),
        prop::option::of("[1-9]m"),
        prop::option::of("[a-z]{1,5}"),
    )
        .prop_map(
            |(id, steps, priority, locked, category, estimated_time, data)| {
                let mut r = ScenarioRecord::new(id, steps);
                r.priority = priority;
                r.locked = locked;
                r.category = category;
                r.estimated_time = estimated_time;
                r.test_data = data.map(Value::String);
                r
            },
        )
}

/// Collections with unique ids, as a well-formed scenario file holds.
fn collection() -> impl Strategy<Value = ScenarioCollection> {
    prop::collection::vec(record(), 0..6).prop_map(|records| {
        let mut seen = HashSet::new();
        records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect()
    })
}

fn any_mode() -> impl Strategy<Value = MergeMode> {
    prop::sample::select(vec![
        MergeMode::Merge,
        MergeMode::Append,
        MergeMode::Selective,
        MergeMode::ReplaceAll,
    ])
}

fn keeping_mode() -> impl Strategy<Value = MergeMode> {
    prop::sample::select(vec![
        MergeMode::Merge,
        MergeMode::Append,
        MergeMode::Selective,
    ])
}

proptest! {
    #[test]
    fn existing_ids_are_never_dropped(
        old in collection(),
        proposed in collection(),
        mode in keeping_mode(),
    ) {
        let outcome = merge(old.clone(), proposed, mode);
        for id in old.ids() {
            prop_assert!(outcome.merged.get(id).is_some(), "lost {}", id);
        }
    }

    #[test]
    fn merged_ids_are_unique(
        old in prop::collection::vec(record(), 0..6),
        proposed in prop::collection::vec(record(), 0..6),
        mode in any_mode(),
    ) {
        let outcome = merge(old.into(), proposed.into(), mode);
        let mut seen = HashSet::new();
        for id in outcome.merged.ids() {
            prop_assert!(seen.insert(id.to_owned()), "duplicate {}", id);
        }
    }

    #[test]
    fn append_only_adds_unseen_ids(old in collection(), proposed in collection()) {
        let outcome = merge(old.clone(), proposed.clone(), MergeMode::Append);
        let mut expected = old.clone().into_vec();
        expected.extend(proposed.into_iter().filter(|r| old.get(&r.id).is_none()));
        prop_assert_eq!(outcome.merged.into_vec(), expected);
    }

    #[test]
    fn replace_all_returns_the_proposal(old in collection(), proposed in collection()) {
        let outcome = merge(old, proposed.clone(), MergeMode::ReplaceAll);
        prop_assert_eq!(outcome.merged, proposed);
    }

    #[test]
    fn customized_records_are_frozen(old in collection(), proposed in collection()) {
        let detector = CustomizationDetector::default();
        let outcome = merge(old.clone(), proposed, MergeMode::Merge);
        for record in old.iter().filter(|r| detector.is_customized(r)) {
            prop_assert_eq!(outcome.merged.get(&record.id), Some(record));
        }
    }

    #[test]
    fn existing_priority_survives(old in collection(), proposed in collection()) {
        let outcome = merge(old.clone(), proposed, MergeMode::Merge);
        for record in &old {
            if let Some(p) = record.effective_priority() {
                let merged = outcome.merged.get(&record.id).expect("record kept");
                prop_assert_eq!(merged.effective_priority(), Some(p));
            }
        }
    }

    #[test]
    fn unfrozen_records_take_the_proposal(old in collection(), proposed in collection()) {
        let detector = CustomizationDetector::default();
        let outcome = merge(old.clone(), proposed.clone(), MergeMode::Merge);
        for record in old.iter().filter(|r| !detector.is_customized(r)) {
            let Some(incoming) = proposed.get(&record.id) else {
                continue;
            };
            let mut expected = incoming.clone();
            if record.effective_priority().is_some() {
                expected.priority = record.priority.clone();
            }
            expected.locked = record.locked;
            prop_assert_eq!(outcome.merged.get(&record.id), Some(&expected));
        }
    }

    #[test]
    fn remerging_is_idempotent(old in collection(), proposed in collection()) {
        let once = merge(old, proposed.clone(), MergeMode::Merge);
        let twice = merge(once.merged.clone(), proposed, MergeMode::Merge);
        prop_assert_eq!(&twice.merged, &once.merged);
        prop_assert!(!twice.report.has_changes());
    }
}
