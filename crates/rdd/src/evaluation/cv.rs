//! One-sided leave-one-out cross-validation for bandwidth selection.
//!
//! ## Purpose
//!
//! This module selects the bandwidth of the local-linear estimator from a grid
//! of candidates by leave-one-out prediction error. Because the treatment
//! effect is estimated at a boundary, every point is predicted only from
//! points on its own side of the cutoff that lie between it and the
//! outer edge of the sample, which mimics estimation at the cutoff.
//!
//! ## Design notes
//!
//! * **One-sided**: A control point at `r_i` is predicted from control points
//!   with `r <= r_i`; a treated point from treated points with `r >= r_i`.
//! * **Windowed training sets**: Each side is sorted once. Two monotone
//!   pointers bound the points inside the kernel support, so only those are
//!   copied into the training buffer. The size check still counts the whole
//!   one-sided training set.
//! * **Candidate independence**: Every candidate is scored separately, which
//!   lets `fastRdd` score the grid in parallel through [`score_grid`]'s
//!   per-candidate entry point [`score_candidate`].
//!
//! ## Key concepts
//!
//! * **Comparison**: A point whose training set is large enough and whose
//!   prediction is defined contributes one squared error.
//! * **MSE**: `SSE / comparisons` per candidate. A candidate without
//!   comparisons has no MSE and cannot be selected.
//!
//! ## Invariants
//!
//! * The selected bandwidth is a member of the grid.
//! * Ties resolve to the first minimizer in grid order.
//!
//! ## Non-goals
//!
//! * This module does not validate the grid; the engine validator does.
//! * K-fold or generalized cross-validation.

// External dependencies
use core::cmp::Ordering::Equal;
use log::debug;
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::{LocalPolynomial, WLSSolver};
use crate::primitives::buffer::CVBuffer;
use crate::primitives::errors::RddError;
use crate::primitives::sample::SideSplit;
use crate::primitives::sorting::SortedData;

// ============================================================================
// Candidate Scores
// ============================================================================

/// Accumulated prediction error of one candidate bandwidth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CandidateScore<T> {
    /// Sum of squared leave-one-out prediction errors.
    pub sse: T,
    /// Number of points that contributed to `sse`.
    pub comparisons: usize,
}

impl<T: Float> CandidateScore<T> {
    /// Score with no comparisons.
    #[inline]
    pub fn empty() -> Self {
        Self {
            sse: T::zero(),
            comparisons: 0,
        }
    }

    /// Mean squared error, or `None` without comparisons.
    #[inline]
    pub fn mse(&self) -> Option<T> {
        if self.comparisons == 0 {
            return None;
        }
        T::from(self.comparisons).map(|n| self.sse / n)
    }

    #[inline]
    fn record(&mut self, error: T) {
        self.sse = self.sse + error * error;
        self.comparisons += 1;
    }
}

/// Outcome of a cross-validation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CVOutcome<T> {
    /// Selected bandwidth.
    pub bandwidth: T,
    /// Grid index of the selected bandwidth.
    pub best_index: usize,
    /// Score of every candidate, in grid order.
    pub scores: Vec<CandidateScore<T>>,
}

// ============================================================================
// Scoring
// ============================================================================

/// Direction of the one-sided training set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Train on points at or below the evaluation point (control side).
    Below,
    /// Train on points at or above the evaluation point (treated side).
    Above,
}

/// Score a single candidate bandwidth over both sides of the cutoff.
///
/// `bandwidth` must be positive and finite.
pub fn score_candidate<T: WLSSolver>(
    split: &SideSplit<T>,
    bandwidth: T,
    min_num_obs: usize,
    buffer: &mut CVBuffer<T>,
) -> CandidateScore<T> {
    let predictor = LocalPolynomial::default();
    let mut score = CandidateScore::empty();

    buffer.ensure_capacity(split.left.len().max(split.right.len()));

    score_side(
        &split.left,
        Direction::Below,
        bandwidth,
        min_num_obs,
        &predictor,
        buffer,
        &mut score,
    );
    score_side(
        &split.right,
        Direction::Above,
        bandwidth,
        min_num_obs,
        &predictor,
        buffer,
        &mut score,
    );

    score
}

fn score_side<T: WLSSolver>(
    side: &SortedData<T>,
    direction: Direction,
    bandwidth: T,
    min_num_obs: usize,
    predictor: &LocalPolynomial,
    buffer: &mut CVBuffer<T>,
    score: &mut CandidateScore<T>,
) {
    let x = &side.x;
    let y = &side.y;
    let n = x.len();

    // [lo, hi) bounds the one-sided training set plus the point itself;
    // [win_lo, win_hi) the part of it inside the kernel support.
    let mut lo = 0;
    let mut hi = 0;
    let mut win_lo = 0;
    let mut win_hi = 0;

    for i in 0..n {
        let xi = x[i];

        match direction {
            Direction::Below => {
                while hi < n && x[hi] <= xi {
                    hi += 1;
                }
                while win_lo < hi && x[win_lo] < xi - bandwidth {
                    win_lo += 1;
                }
                win_hi = hi;
            }
            Direction::Above => {
                while lo < n && x[lo] < xi {
                    lo += 1;
                }
                hi = n;
                win_lo = win_lo.max(lo);
                while win_hi < n && x[win_hi] <= xi + bandwidth {
                    win_hi += 1;
                }
            }
        }

        let training_size = hi - lo - 1;
        if training_size < min_num_obs {
            continue;
        }

        buffer.clear();
        for j in win_lo..win_hi {
            if j != i {
                buffer.train_x.push(x[j]);
                buffer.train_y.push(y[j]);
            }
        }

        let prediction = predictor.predict_with_buffer(
            &buffer.train_x,
            &buffer.train_y,
            xi,
            bandwidth,
            &mut buffer.fit,
        );

        if let Some(y_hat) = prediction.value() {
            score.record(y[i] - y_hat);
        }
    }
}

/// Score every candidate of the grid sequentially.
pub fn score_grid<T: WLSSolver>(
    split: &SideSplit<T>,
    grid: &[T],
    min_num_obs: usize,
) -> Vec<CandidateScore<T>> {
    let mut buffer = CVBuffer::new();
    grid.iter()
        .map(|&h| score_candidate(split, h, min_num_obs, &mut buffer))
        .collect()
}

// ============================================================================
// Selection
// ============================================================================

/// Select the candidate with the smallest MSE.
///
/// Candidates without comparisons are ineligible and are skipped, so a grid
/// that mixes very small bandwidths with usable ones still selects among the
/// usable ones rather than failing outright. Fails with
/// [`RddError::NoValidComparisons`] only when no candidate is eligible.
pub fn select_best<T: Float>(
    grid: &[T],
    scores: Vec<CandidateScore<T>>,
) -> Result<CVOutcome<T>, RddError> {
    for (&h, score) in grid.iter().zip(&scores) {
        debug!(
            "cv candidate h={:.6}: mse={:?}, comparisons={}",
            h.to_f64().unwrap_or(f64::NAN),
            score.mse().and_then(|m| m.to_f64()),
            score.comparisons
        );
    }

    let best_index = scores
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.mse().map(|m| (i, m)))
        .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Equal))
        .map(|(i, _)| i)
        .ok_or(RddError::NoValidComparisons {
            candidates: grid.len(),
        })?;

    let bandwidth = grid[best_index];
    debug!(
        "cv selected h={:.6} (candidate {} of {})",
        bandwidth.to_f64().unwrap_or(f64::NAN),
        best_index + 1,
        grid.len()
    );

    Ok(CVOutcome {
        bandwidth,
        best_index,
        scores,
    })
}

/// Sequential one-sided leave-one-out cross-validation.
pub fn cross_validate<T: WLSSolver>(
    split: &SideSplit<T>,
    grid: &[T],
    min_num_obs: usize,
) -> Result<CVOutcome<T>, RddError> {
    select_best(grid, score_grid(split, grid, min_num_obs))
}

// ============================================================================
// Grid Construction
// ============================================================================

/// Default number of candidates in a grid built around a pilot bandwidth.
pub const DEFAULT_GRID_SIZE: usize = 32;

/// `num` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace<T: Float>(start: T, stop: T, num: usize) -> Vec<T> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let steps = T::from(num - 1).unwrap_or_else(T::one);
            let step = (stop - start) / steps;
            (0..num)
                .map(|k| {
                    if k == num - 1 {
                        stop
                    } else {
                        start + step * T::from(k).unwrap_or_else(T::zero)
                    }
                })
                .collect()
        }
    }
}

/// Grid from half to twice a pilot bandwidth.
pub fn grid_around<T: Float>(pilot: T, num: usize) -> Vec<T> {
    let two = T::one() + T::one();
    linspace(pilot / two, pilot * two, num)
}
