//! Property-based tests for the proportional calibrator.
//!
//! # Invariants tested
//!
//! - **Non-negativity:** calibrated norms never drop below zero.
//! - **Monotonicity:** more rejections never yield a lower norm, and more
//!   acceptances never yield a higher one.
//! - **Idempotence:** calibrating with no new feedback changes nothing.
//! - **Coverage:** the result covers exactly the input categories.

use amenity_calibrator::calibrate;
use amenity_core::{Category, FeedbackSnapshot, FeedbackTally, NormEntry, NormTable};
use proptest::prelude::*;

fn category_strategy() -> impl Strategy<Value = Category> {
    proptest::sample::select(Category::ALL.to_vec())
}

fn table_strategy() -> impl Strategy<Value = NormTable> {
    proptest::collection::btree_map(category_strategy(), 0.0_f64..100.0, 1..=8).prop_map(
        |norms| {
            NormTable::new(
                norms
                    .into_iter()
                    .map(|(category, per_100k)| NormEntry::new(category, per_100k)),
            )
            .expect("generated norms are valid")
        },
    )
}

fn snapshot_strategy() -> impl Strategy<Value = FeedbackSnapshot> {
    proptest::collection::btree_map(category_strategy(), (0_u64..500, 0_u64..500), 0..=8)
        .prop_map(|tallies| {
            FeedbackSnapshot::from_tallies(
                tallies
                    .into_iter()
                    .map(|(category, (accept, reject))| {
                        (category, FeedbackTally::new(accept, reject))
                    }),
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: no calibrated norm is negative.
    #[test]
    fn norms_stay_non_negative(
        table in table_strategy(),
        feedback in snapshot_strategy(),
        sensitivity in 0.0_f64..1.0,
    ) {
        let result = calibrate(&feedback, &table, sensitivity).expect("calibrates");
        for entry in result.table.iter() {
            prop_assert!(entry.per_100k >= 0.0, "{} went negative", entry.category);
        }
    }

    /// Property: adding rejections to a category never lowers its norm.
    #[test]
    fn more_rejections_never_lower_the_norm(
        table in table_strategy(),
        accept in 0_u64..500,
        reject in 0_u64..500,
        extra in 1_u64..500,
        sensitivity in 0.0_f64..1.0,
    ) {
        let category = table.categories().next().expect("tables are never empty");
        let fewer = FeedbackSnapshot::from_tallies([(category, FeedbackTally::new(accept, reject))]);
        let more = FeedbackSnapshot::from_tallies([(
            category,
            FeedbackTally::new(accept, reject.saturating_add(extra)),
        )]);

        let lower = calibrate(&fewer, &table, sensitivity).expect("calibrates");
        let higher = calibrate(&more, &table, sensitivity).expect("calibrates");

        let lower_norm = lower.table.get(category).expect("configured").per_100k;
        let higher_norm = higher.table.get(category).expect("configured").per_100k;
        prop_assert!(higher_norm >= lower_norm);
    }

    /// Property: adding acceptances to a category never raises its norm.
    #[test]
    fn more_acceptances_never_raise_the_norm(
        table in table_strategy(),
        accept in 0_u64..500,
        reject in 0_u64..500,
        extra in 1_u64..500,
        sensitivity in 0.0_f64..1.0,
    ) {
        let category = table.categories().next().expect("tables are never empty");
        let fewer = FeedbackSnapshot::from_tallies([(category, FeedbackTally::new(accept, reject))]);
        let more = FeedbackSnapshot::from_tallies([(
            category,
            FeedbackTally::new(accept.saturating_add(extra), reject),
        )]);

        let higher = calibrate(&fewer, &table, sensitivity).expect("calibrates");
        let lower = calibrate(&more, &table, sensitivity).expect("calibrates");

        let higher_norm = higher.table.get(category).expect("configured").per_100k;
        let lower_norm = lower.table.get(category).expect("configured").per_100k;
        prop_assert!(lower_norm <= higher_norm);
    }

    /// Property: an empty snapshot is a no-op, so repeating a pass with no
    /// new signals leaves the table unchanged.
    #[test]
    fn empty_feedback_is_a_no_op(
        table in table_strategy(),
        sensitivity in 0.0_f64..1.0,
    ) {
        let result = calibrate(&FeedbackSnapshot::default(), &table, sensitivity)
            .expect("calibrates");
        prop_assert_eq!(&result.table, &table);
        let again = calibrate(&FeedbackSnapshot::default(), &result.table, sensitivity)
            .expect("calibrates");
        prop_assert_eq!(again.table, result.table);
    }

    /// Property: the result covers exactly the input categories, with a
    /// delta for each.
    #[test]
    fn result_covers_input_categories(
        table in table_strategy(),
        feedback in snapshot_strategy(),
    ) {
        let result = calibrate(&feedback, &table, 0.01).expect("calibrates");
        prop_assert!(result.table.covers_same_categories(&table));
        prop_assert!(result.deltas.keys().copied().eq(table.categories()));
    }
}
