//! Sorting utilities for running-variable data.
//!
//! ## Purpose
//!
//! This module sorts `(r, y)` pairs by the running variable. Cross-validation
//! and the plug-in estimator walk each side of the cutoff in ascending order,
//! so every side is materialized as a [`SortedData`].
//!
//! ## Design notes
//!
//! * **Stability**: Uses stable sorting to preserve the relative order of equal x-values.
//!
//! ## Invariants
//!
//! * Sorted x-values are non-decreasing.
//! * `y[k]` is the outcome of the row whose running variable is `x[k]`.
//!
//! ## Non-goals
//!
//! * This module does not validate values; callers reject non-finite data first.

// External dependencies
use core::cmp::Ordering;
use num_traits::Float;

// ============================================================================
// Data Structures
// ============================================================================

/// One side of the sample, ordered by the running variable.
#[derive(Debug, Clone, PartialEq)]
pub struct SortedData<T> {
    /// Running variable, ascending.
    pub x: Vec<T>,

    /// Outcomes aligned with `x`.
    pub y: Vec<T>,
}

impl<T> SortedData<T> {
    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns `true` if no points are held.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ============================================================================
// Sorting Functions
// ============================================================================

/// Sort the rows selected by `keep` by x-coordinate in ascending order.
///
/// Only `(x, index)` pairs are sorted; y is gathered afterwards through the
/// permutation.
pub fn sort_selected_by_x<T, F>(x: &[T], y: &[T], mut keep: F) -> SortedData<T>
where
    T: Float,
    F: FnMut(T) -> bool,
{
    let mut pairs: Vec<(T, usize)> = x
        .iter()
        .enumerate()
        .filter(|&(_, &xi)| keep(xi))
        .map(|(i, &xi)| (xi, i))
        .collect();

    // Stable sort keeps ties in input order
    pairs.sort_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let (x, y) = pairs.into_iter().map(|(xi, i)| (xi, y[i])).unzip();

    SortedData { x, y }
}
