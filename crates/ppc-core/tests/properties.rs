//! Property-based tests for selection, summaries and figure assembly.

use std::collections::HashSet;

use ppc_common::ObservationId;
use ppc_core::inference::InferenceData;
use ppc_core::render::{plot_posterior_predictive_comparison, ComparisonOptions};
use ppc_core::select::{seeded_rng, select_rows};
use ppc_core::summary::summarize_one;
use proptest::prelude::*;

/// `(observed, pools)` with 1..12 observations and 1..60 draws each.
fn data_strategy() -> impl Strategy<Value = InferenceData> {
    (1usize..12, 1usize..60)
        .prop_flat_map(|(n_obs, n_draws)| {
            (
                prop::collection::vec(-1.0e3..1.0e3f64, n_obs),
                prop::collection::vec(prop::collection::vec(-1.0e3..1.0e3f64, n_draws), n_obs),
            )
        })
        .prop_map(|(observed, pools)| {
            InferenceData::new(observed, pools).expect("generated data is well formed")
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The same seed always picks the same rows in the same order.
    #[test]
    fn seeded_selection_is_deterministic(
        n in 1usize..500,
        k_frac in 0.0..1.0f64,
        seed in any::<u64>(),
    ) {
        let k = ((n as f64 * k_frac) as usize).max(1);
        let a = select_rows(n, k, &mut seeded_rng(Some(seed))).unwrap();
        let b = select_rows(n, k, &mut seeded_rng(Some(seed))).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Random selection yields exactly k distinct in-range ids.
    #[test]
    fn selection_is_distinct_and_in_range(
        n in 1usize..500,
        k_frac in 0.0..1.0f64,
        seed in any::<u64>(),
    ) {
        let k = ((n as f64 * k_frac) as usize).max(1);
        let sel = select_rows(n, k, &mut seeded_rng(Some(seed))).unwrap();
        prop_assert_eq!(sel.len(), k);
        let unique: HashSet<usize> = sel.iter().map(|id| id.index()).collect();
        prop_assert_eq!(unique.len(), k);
        prop_assert!(sel.iter().all(|id| id.index() < n));
    }

    /// Asking for more rows than exist always fails.
    #[test]
    fn oversized_selection_fails(n in 1usize..100, extra in 1usize..50, seed in any::<u64>()) {
        prop_assert!(select_rows(n, n + extra, &mut seeded_rng(Some(seed))).is_err());
    }

    /// Interval bounds are ordered and the mean and bounds sit inside the pool range.
    #[test]
    fn summary_bounds_within_pool(data in data_strategy(), pick in any::<prop::sample::Index>()) {
        let id = ObservationId(pick.index(data.n_observations()));
        let rec = summarize_one(&data, id).unwrap();
        let pool = data.draws(id).unwrap();
        let min = pool.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = pool.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let slack = 1e-9 * min.abs().max(max.abs()).max(1.0);

        prop_assert!(rec.lower <= rec.upper);
        prop_assert!(rec.lower >= min - slack && rec.upper <= max + slack);
        prop_assert!(rec.mean >= min - slack && rec.mean <= max + slack);
        prop_assert_eq!(rec.n_draws, pool.len());
        prop_assert_eq!(rec.observed, data.observed(id).unwrap());
    }

    /// One panel per requested id, in request order, duplicates included.
    #[test]
    fn comparison_panels_follow_ids(
        data in data_strategy(),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        let ids: Vec<ObservationId> = picks
            .iter()
            .map(|p| ObservationId(p.index(data.n_observations())))
            .collect();
        let figure =
            plot_posterior_predictive_comparison(&data, &ids, &ComparisonOptions::default())
                .unwrap();

        prop_assert_eq!(figure.layout.rows, 1);
        prop_assert_eq!(figure.layout.cols, ids.len());
        let panel_ids: Vec<ObservationId> = figure.panels.iter().map(|p| p.id).collect();
        prop_assert_eq!(panel_ids, ids);
    }
}
