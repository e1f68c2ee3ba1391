#![cfg(feature = "dev")]
//! Tests for one-sided leave-one-out cross-validation.
//!
//! These tests verify bandwidth selection by cross-validation:
//! - Per-candidate scores on a reference sample
//! - Selection and tie-breaking
//! - Agreement with a naive re-filtering implementation
//! - Grid construction around a pilot bandwidth
//!
//! ## Test Organization
//!
//! 1. **Scoring** - Per-candidate SSE and comparison counts
//! 2. **Selection** - Argmin, ties, and degenerate grids
//! 3. **Reference** - Naive one-sided leave-one-out
//! 4. **Grids** - linspace and grid_around

use approx::assert_relative_eq;

use rdd::internals::algorithms::regression::LocalPolynomial;
use rdd::internals::evaluation::cv::{
    cross_validate, grid_around, linspace, score_candidate, score_grid, select_best, CandidateScore,
};
use rdd::internals::primitives::buffer::CVBuffer;
use rdd::internals::primitives::errors::RddError;
use rdd::internals::primitives::sample::{Sample, SideSplit};

fn reference_split() -> SideSplit<f64> {
    let r = vec![2.0, 1.0, 1.75, 1.5, 3.0, 3.4, 3.5, 3.8, 4.0];
    let y = vec![3.0, 4.0, 3.0, 3.5, 6.0, 5.0, 6.0, 5.5, 7.0];
    Sample::new(&r, &y).unwrap().split(2.5).unwrap()
}

// ============================================================================
// Scoring Tests
// ============================================================================

/// Test per-candidate scores on the reference sample.
#[test]
fn test_score_candidate_reference() {
    let split = reference_split();
    let mut buffer = CVBuffer::new();

    let wide = score_candidate(&split, 1.0, 2, &mut buffer);
    assert_eq!(wide.comparisons, 5);
    assert_relative_eq!(wide.mse().unwrap(), 1.9455507076809084, epsilon = 1e-9);

    let narrow = score_candidate(&split, 0.5, 2, &mut buffer);
    assert_eq!(narrow.comparisons, 1);
    assert_relative_eq!(narrow.mse().unwrap(), 1.3611111111111112, epsilon = 1e-9);
}

/// Test that a tiny bandwidth yields no comparisons.
#[test]
fn test_score_candidate_no_comparisons() {
    let split = reference_split();
    let score = score_candidate(&split, 0.2, 2, &mut CVBuffer::new());

    assert_eq!(score, CandidateScore::empty());
    assert_eq!(score.mse(), None);
}

/// Test that a large minimum training size skips every point.
#[test]
fn test_score_candidate_min_num_obs() {
    let split = reference_split();
    let score = score_candidate(&split, 10.0, 100, &mut CVBuffer::new());

    assert_eq!(score.comparisons, 0);
}

// ============================================================================
// Selection Tests
// ============================================================================

/// Test that the smallest MSE wins and the outcome is a grid member.
#[test]
fn test_cross_validate_selects_min_mse() {
    let split = reference_split();
    let grid = vec![1.0, 0.5];
    let outcome = cross_validate(&split, &grid, 2).unwrap();

    assert_eq!(outcome.best_index, 1);
    assert_eq!(outcome.bandwidth, 0.5);
    assert!(grid.contains(&outcome.bandwidth));
    assert_eq!(outcome.scores.len(), 2);
}

/// Test that ties resolve to the first candidate.
#[test]
fn test_cross_validate_tie_first() {
    let split = reference_split();
    let outcome = cross_validate(&split, &[1.0, 1.0, 1.0], 2).unwrap();

    assert_eq!(outcome.best_index, 0);
}

/// Test that candidates without comparisons are ineligible.
#[test]
fn test_ineligible_candidates_skipped() {
    let split = reference_split();
    let outcome = cross_validate(&split, &[0.2, 1.0], 2).unwrap();

    assert_eq!(outcome.best_index, 1);
    assert_eq!(outcome.scores[0].comparisons, 0);
}

/// Test the degenerate grid.
#[test]
fn test_no_valid_comparisons() {
    let split = reference_split();
    let err = cross_validate(&split, &[0.2], 2).unwrap_err();

    assert_eq!(err, RddError::NoValidComparisons { candidates: 1 });
    assert!(err.is_degenerate());
}

/// Test selection directly from precomputed scores.
#[test]
fn test_select_best_from_scores() {
    let grid = vec![0.5, 1.0, 2.0];
    let scores = vec![
        CandidateScore {
            sse: 3.0,
            comparisons: 1,
        },
        CandidateScore {
            sse: 4.0,
            comparisons: 4,
        },
        CandidateScore::empty(),
    ];

    let outcome = select_best(&grid, scores).unwrap();
    assert_eq!(outcome.bandwidth, 1.0);
}

// ============================================================================
// Reference Tests
// ============================================================================

/// Naive one-sided leave-one-out with full re-filtering of the training set.
fn naive_score(r: &[f64], y: &[f64], cutoff: f64, h: f64, min_num_obs: usize) -> (f64, usize) {
    let predictor = LocalPolynomial::default();
    let mut sse = 0.0;
    let mut comparisons = 0;

    for i in 0..r.len() {
        let below = r[i] < cutoff;
        let (tx, ty): (Vec<f64>, Vec<f64>) = (0..r.len())
            .filter(|&j| j != i)
            .filter(|&j| {
                if below {
                    r[j] < cutoff && r[j] <= r[i]
                } else {
                    r[j] >= cutoff && r[j] >= r[i]
                }
            })
            .map(|j| (r[j], y[j]))
            .unzip();

        if tx.len() < min_num_obs {
            continue;
        }
        if let Some(y_hat) = predictor.predict(&tx, &ty, r[i], h).unwrap().value() {
            sse += (y[i] - y_hat).powi(2);
            comparisons += 1;
        }
    }

    (sse, comparisons)
}

/// Test the windowed implementation against the naive reference.
#[test]
fn test_matches_naive_reference() {
    let r: Vec<f64> = (0..40).map(|i| ((i * 17) % 40) as f64 / 8.0).collect();
    let y: Vec<f64> = r
        .iter()
        .enumerate()
        .map(|(i, &ri)| ri.sin() + if ri >= 2.4 { 1.0 } else { 0.0 } + 0.1 * (i as f64).cos())
        .collect();
    let cutoff = 2.4;
    let split = Sample::new(&r, &y).unwrap().split(cutoff).unwrap();
    let grid = vec![0.3, 0.6, 1.0, 1.7, 3.0];

    let scores = score_grid(&split, &grid, 3);

    for (&h, score) in grid.iter().zip(&scores) {
        let (sse, comparisons) = naive_score(&r, &y, cutoff, h, 3);
        assert_eq!(score.comparisons, comparisons, "comparisons at h={}", h);
        assert_relative_eq!(score.sse, sse, epsilon = 1e-9, max_relative = 1e-9);
    }
}

// ============================================================================
// Grid Tests
// ============================================================================

/// Test evenly spaced grids.
#[test]
fn test_linspace() {
    let grid = linspace(1.0, 2.0, 5);
    assert_eq!(grid.len(), 5);
    assert_relative_eq!(grid[1], 1.25, epsilon = 1e-12);
    assert_eq!(grid[4], 2.0);

    assert!(linspace(1.0, 2.0, 0).is_empty());
    assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
}

/// Test the grid around a pilot bandwidth.
#[test]
fn test_grid_around() {
    let grid = grid_around(2.0, 4);
    assert_eq!(grid.len(), 4);
    assert_relative_eq!(grid[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(grid[3], 4.0, epsilon = 1e-12);
}
