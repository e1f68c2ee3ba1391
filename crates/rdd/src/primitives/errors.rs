//! Error types for regression discontinuity operations.
//!
//! ## Purpose
//!
//! This module defines every error condition raised while selecting a
//! bandwidth or estimating a treatment effect. Errors fall into two families,
//! exposed through [`ErrorKind`]:
//!
//! * **InvalidArgument**: the caller supplied a structurally invalid
//!   parameter (non-positive bandwidth, degree zero, empty grid, cutoff
//!   outside the data).
//! * **DegenerateResult**: the inputs are valid but the data cannot support a
//!   meaningful answer (empty kernel, every CV comparison skipped, a plug-in
//!   quantity that is not strictly positive).
//!
//! ## Design notes
//!
//! * **Contextual**: Variants carry the offending values.
//! * **Typed causes**: Plug-in failures name the stage quantity that failed.
//! * **Trait Implementation**: Implements `Display` and `std::error::Error`.
//!
//! ## Invariants
//!
//! * Every variant maps to exactly one [`ErrorKind`].
//! * An undefined local prediction is never an error; it is a
//!   `Prediction::Undefined` value.
//!
//! ## Non-goals
//!
//! * This module does not perform the validation logic itself.
//! * This module does not provide recovery or fallback strategies.

// External dependencies
use std::error::Error;
use std::fmt::{Display, Formatter, Result};

// Internal dependencies
use crate::algorithms::regression::MAX_DEGREE;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification of an [`RddError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A structurally invalid parameter was supplied.
    InvalidArgument,

    /// Valid inputs produced no statistically meaningful result.
    DegenerateResult,
}

// ============================================================================
// Error Type
// ============================================================================

/// Error type for regression discontinuity operations.
#[derive(Debug, Clone, PartialEq)]
pub enum RddError {
    /// Input arrays are empty.
    EmptyInput,

    /// Paired input columns must have the same number of elements.
    MismatchedInputs {
        /// Name of the column compared against `r`/`x`.
        column: &'static str,
        /// Expected number of elements.
        expected: usize,
        /// Number of elements found.
        got: usize,
    },

    /// Input data or a scalar parameter contains NaN or infinite values.
    InvalidNumericValue(String),

    /// Bandwidths must be strictly positive and finite.
    InvalidBandwidth(f64),

    /// Local polynomial degree must lie in `1..=MAX_DEGREE`.
    InvalidDegree(usize),

    /// The cross-validation grid contains no candidates.
    EmptyGrid,

    /// Significance level must lie strictly between 0 and 1.
    InvalidAlpha(f64),

    /// The cutoff leaves one side of the sample empty.
    CutoffOutOfRange {
        /// Cutoff that was requested.
        cutoff: f64,
        /// Number of observations with `r < cutoff`.
        n_left: usize,
        /// Number of observations with `r >= cutoff`.
        n_right: usize,
    },

    /// Treatment column is not a sharp assignment `d = 1{r >= cutoff}`.
    InvalidTreatment {
        /// Row of the first inconsistent observation.
        index: usize,
        /// Treatment value found in that row.
        value: u8,
    },

    /// Parameter was set multiple times in the builder.
    DuplicateParameter {
        /// Name of the parameter that was set multiple times.
        parameter: &'static str,
    },

    /// A required builder parameter was never set.
    MissingParameter {
        /// Name of the missing parameter.
        parameter: &'static str,
    },

    /// The kernel assigns zero weight to every observation.
    EmptyKernel {
        /// Evaluation point of the kernel.
        at: f64,
        /// Bandwidth of the kernel.
        bandwidth: f64,
    },

    /// The kernel covers observations on only one side of the cutoff.
    OneSidedKernel {
        /// Observations with positive weight below the cutoff.
        n_left: usize,
        /// Observations with positive weight at or above the cutoff.
        n_right: usize,
    },

    /// Cross-validation skipped every evaluation point for every candidate.
    NoValidComparisons {
        /// Number of candidate bandwidths evaluated.
        candidates: usize,
    },

    /// A plug-in quantity that must be strictly positive is not.
    NonPositiveQuantity {
        /// Name of the quantity (e.g. `"h_pilot"`).
        quantity: &'static str,
        /// Computed value.
        value: f64,
    },

    /// No observations fall within a side's curvature reference bandwidth.
    EmptyReferenceWindow {
        /// Side of the cutoff (`"left"` or `"right"`).
        side: &'static str,
        /// Reference bandwidth used on that side.
        bandwidth: f64,
    },

    /// The pooled regression has as many parameters as observations.
    NoResidualDegreesOfFreedom {
        /// Observations with positive weight.
        n_obs: usize,
        /// Rank of the design matrix.
        rank: usize,
    },
}

impl RddError {
    /// Classify the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput
            | Self::MismatchedInputs { .. }
            | Self::InvalidNumericValue(_)
            | Self::InvalidBandwidth(_)
            | Self::InvalidDegree(_)
            | Self::EmptyGrid
            | Self::InvalidAlpha(_)
            | Self::CutoffOutOfRange { .. }
            | Self::InvalidTreatment { .. }
            | Self::DuplicateParameter { .. }
            | Self::MissingParameter { .. } => ErrorKind::InvalidArgument,
            Self::EmptyKernel { .. }
            | Self::OneSidedKernel { .. }
            | Self::NoValidComparisons { .. }
            | Self::NonPositiveQuantity { .. }
            | Self::EmptyReferenceWindow { .. }
            | Self::NoResidualDegreesOfFreedom { .. } => ErrorKind::DegenerateResult,
        }
    }

    /// Returns `true` for caller errors.
    #[inline]
    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    /// Returns `true` for data that cannot support the requested estimate.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.kind() == ErrorKind::DegenerateResult
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl Display for RddError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Self::EmptyInput => write!(f, "Input arrays are empty"),
            Self::MismatchedInputs {
                column,
                expected,
                got,
            } => write!(
                f,
                "Length mismatch: expected {expected} values in '{column}', got {got}"
            ),
            Self::InvalidNumericValue(s) => write!(f, "Invalid numeric value: {s}"),
            Self::InvalidBandwidth(h) => {
                write!(f, "Invalid bandwidth: {h} (must be > 0 and finite)")
            }
            Self::InvalidDegree(p) => {
                write!(f, "Invalid degree: {p} (must be between 1 and {MAX_DEGREE})")
            }
            Self::EmptyGrid => write!(f, "Bandwidth grid is empty"),
            Self::InvalidAlpha(a) => {
                write!(f, "Invalid significance level: {a} (must be > 0 and < 1)")
            }
            Self::CutoffOutOfRange {
                cutoff,
                n_left,
                n_right,
            } => write!(
                f,
                "Cutoff {cutoff} must lie within the range of the running variable \
                 ({n_left} points below, {n_right} at or above)"
            ),
            Self::InvalidTreatment { index, value } => write!(
                f,
                "Treatment d[{index}]={value} does not match the sharp assignment 1{{r >= cutoff}}"
            ),
            Self::DuplicateParameter { parameter } => write!(
                f,
                "Parameter '{parameter}' was set multiple times. Each parameter can only be configured once."
            ),
            Self::MissingParameter { parameter } => {
                write!(f, "Required parameter '{parameter}' was not set")
            }
            Self::EmptyKernel { at, bandwidth } => write!(
                f,
                "The kernel at {at} with bandwidth {bandwidth} does not include any data"
            ),
            Self::OneSidedKernel { n_left, n_right } => write!(
                f,
                "The kernel must include data on both sides of the cutoff \
                 ({n_left} below, {n_right} at or above)"
            ),
            Self::NoValidComparisons { candidates } => write!(
                f,
                "Cross-validation made no comparisons for any of the {candidates} candidate bandwidths"
            ),
            Self::NonPositiveQuantity { quantity, value } => {
                write!(f, "The computed {quantity} is not positive: {value}")
            }
            Self::EmptyReferenceWindow { side, bandwidth } => write!(
                f,
                "No observations {side} of the cutoff within reference bandwidth {bandwidth}"
            ),
            Self::NoResidualDegreesOfFreedom { n_obs, rank } => write!(
                f,
                "No residual degrees of freedom: {n_obs} observations, design rank {rank}"
            ),
        }
    }
}

// ============================================================================
// Standard Error Trait
// ============================================================================

impl Error for RddError {}
