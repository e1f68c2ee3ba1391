//! Sample data model for a sharp regression discontinuity design.
//!
//! ## Purpose
//!
//! A [`Sample`] borrows the running variable `r`, the outcome `y` and an
//! optional treatment indicator `d`. A [`SideSplit`] partitions the sample at
//! a cutoff into the control side (`r < cutoff`) and the treated side
//! (`r >= cutoff`), each sorted ascending by `r`.
//!
//! ## Design notes
//!
//! * **Borrowed**: Columns are never copied until a side split is requested.
//! * **Sharp design**: Treatment is a deterministic function of `r`. When `d` is
//!   supplied it is checked against `1{r >= cutoff}`; when it is absent it is
//!   derived from the cutoff.
//!
//! ## Invariants
//!
//! * `r` and `y` are non-empty, equally long and finite.
//! * `d`, when present, has the same length and only holds 0 or 1.
//! * Both sides of a [`SideSplit`] are non-empty.
//!
//! ## Non-goals
//!
//! * Fuzzy designs (treatment probability jumping by less than one).
//! * Multi-dimensional running variables.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::RddError;
use crate::primitives::sorting::{sort_selected_by_x, SortedData};

// ============================================================================
// Sample
// ============================================================================

/// Borrowed observations of a sharp regression discontinuity design.
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a, T> {
    r: &'a [T],
    y: &'a [T],
    d: Option<&'a [u8]>,
}

impl<'a, T: Float> Sample<'a, T> {
    /// Create a sample whose treatment is derived from the cutoff.
    pub fn new(r: &'a [T], y: &'a [T]) -> Result<Self, RddError> {
        check_columns(r, y)?;
        Ok(Self { r, y, d: None })
    }

    /// Create a sample with an explicit treatment column.
    pub fn with_treatment(r: &'a [T], y: &'a [T], d: &'a [u8]) -> Result<Self, RddError> {
        check_columns(r, y)?;

        if d.len() != r.len() {
            return Err(RddError::MismatchedInputs {
                column: "d",
                expected: r.len(),
                got: d.len(),
            });
        }

        if let Some((index, &value)) = d.iter().enumerate().find(|&(_, &v)| v > 1) {
            return Err(RddError::InvalidTreatment { index, value });
        }

        Ok(Self { r, y, d: Some(d) })
    }

    /// Running variable.
    #[inline]
    pub fn r(&self) -> &'a [T] {
        self.r
    }

    /// Outcome.
    #[inline]
    pub fn y(&self) -> &'a [T] {
        self.y
    }

    /// Explicit treatment column, if one was supplied.
    #[inline]
    pub fn treatment(&self) -> Option<&'a [u8]> {
        self.d
    }

    /// Number of observations.
    #[inline]
    pub fn len(&self) -> usize {
        self.r.len()
    }

    /// Always `false`; construction rejects empty samples.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.r.is_empty()
    }

    /// Treatment indicator of row `i` for the given cutoff.
    #[inline]
    pub fn is_treated(&self, i: usize, cutoff: T) -> bool {
        match self.d {
            Some(d) => d[i] == 1,
            None => self.r[i] >= cutoff,
        }
    }

    /// Check that an explicit treatment column equals `1{r >= cutoff}`.
    pub fn check_sharp_assignment(&self, cutoff: T) -> Result<(), RddError> {
        check_cutoff(cutoff)?;

        let Some(d) = self.d else {
            return Ok(());
        };

        for (index, (&ri, &di)) in self.r.iter().zip(d.iter()).enumerate() {
            let expected = u8::from(ri >= cutoff);
            if di != expected {
                return Err(RddError::InvalidTreatment { index, value: di });
            }
        }

        Ok(())
    }

    /// Partition the sample at `cutoff` into sorted control and treated sides.
    pub fn split(&self, cutoff: T) -> Result<SideSplit<T>, RddError> {
        check_cutoff(cutoff)?;

        let left = sort_selected_by_x(self.r, self.y, |ri| ri < cutoff);
        let right = sort_selected_by_x(self.r, self.y, |ri| ri >= cutoff);

        if left.is_empty() || right.is_empty() {
            return Err(RddError::CutoffOutOfRange {
                cutoff: cutoff.to_f64().unwrap_or(f64::NAN),
                n_left: left.len(),
                n_right: right.len(),
            });
        }

        Ok(SideSplit {
            cutoff,
            left,
            right,
        })
    }
}

// ============================================================================
// Side Split
// ============================================================================

/// Sample partitioned at the cutoff, each side sorted ascending by `r`.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSplit<T> {
    /// Cutoff used for the partition.
    pub cutoff: T,
    /// Control side (`r < cutoff`).
    pub left: SortedData<T>,
    /// Treated side (`r >= cutoff`).
    pub right: SortedData<T>,
}

impl<T> SideSplit<T> {
    /// Total number of observations across both sides.
    #[inline]
    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    /// Returns `true` if both sides are empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

// ============================================================================
// Column Checks
// ============================================================================

fn check_columns<T: Float>(r: &[T], y: &[T]) -> Result<(), RddError> {
    if r.is_empty() || y.is_empty() {
        return Err(RddError::EmptyInput);
    }

    if r.len() != y.len() {
        return Err(RddError::MismatchedInputs {
            column: "y",
            expected: r.len(),
            got: y.len(),
        });
    }

    for (name, column) in [("r", r), ("y", y)] {
        if let Some((i, v)) = column.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(RddError::InvalidNumericValue(format!(
                "{name}[{i}]={}",
                v.to_f64().unwrap_or(f64::NAN)
            )));
        }
    }

    Ok(())
}

fn check_cutoff<T: Float>(cutoff: T) -> Result<(), RddError> {
    if !cutoff.is_finite() {
        return Err(RddError::InvalidNumericValue(format!(
            "cutoff={}",
            cutoff.to_f64().unwrap_or(f64::NAN)
        )));
    }
    Ok(())
}
