//! Input validation for bandwidth selection and effect estimation.
//!
//! ## Purpose
//!
//! This module checks configuration parameters before any computation runs:
//! bandwidths, grids, significance levels, degrees, cutoffs, and builder
//! bookkeeping.
//!
//! ## Design notes
//!
//! * **Fail-Fast**: Validation stops at the first error encountered.
//! * **Generics**: Validation is generic over `Float` types.
//!
//! ## Invariants
//!
//! * Validation logic is deterministic and side-effect free.
//!
//! ## Non-goals
//!
//! * Column checks (lengths, finiteness, treatment values) live with
//!   `Sample` construction.
//! * This module does not provide automatic correction of invalid inputs.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::check_degree;
use crate::math::kernel::check_bandwidth;
use crate::primitives::errors::RddError;

// ============================================================================
// Validator
// ============================================================================

/// Validation utility for configuration parameters.
///
/// All methods return `Result<(), RddError>` and fail on the first violation.
pub struct Validator;

impl Validator {
    /// Validate a single numeric value for finiteness.
    pub fn validate_scalar<T: Float>(val: T, name: &str) -> Result<(), RddError> {
        if !val.is_finite() {
            return Err(RddError::InvalidNumericValue(format!(
                "{}={}",
                name,
                val.to_f64().unwrap_or(f64::NAN)
            )));
        }
        Ok(())
    }

    /// Validate a bandwidth (positive and finite).
    #[inline]
    pub fn validate_bandwidth<T: Float>(bandwidth: T) -> Result<(), RddError> {
        check_bandwidth(bandwidth)
    }

    /// Validate a candidate grid for cross-validation.
    pub fn validate_grid<T: Float>(grid: &[T]) -> Result<(), RddError> {
        if grid.is_empty() {
            return Err(RddError::EmptyGrid);
        }

        for &h in grid {
            Self::validate_bandwidth(h)?;
        }

        Ok(())
    }

    /// Validate the significance level of confidence intervals.
    pub fn validate_alpha<T: Float>(alpha: T) -> Result<(), RddError> {
        if !alpha.is_finite() || alpha <= T::zero() || alpha >= T::one() {
            return Err(RddError::InvalidAlpha(alpha.to_f64().unwrap_or(f64::NAN)));
        }
        Ok(())
    }

    /// Validate the polynomial degree.
    pub fn validate_degree(degree: usize) -> Result<(), RddError> {
        check_degree(degree)
    }

    /// Validate the number of candidates of a generated grid.
    pub fn validate_grid_size(num: usize) -> Result<(), RddError> {
        if num == 0 {
            return Err(RddError::EmptyGrid);
        }
        Ok(())
    }

    /// Validate that no parameters were set multiple times in the builder.
    pub fn validate_no_duplicates(duplicate_param: Option<&'static str>) -> Result<(), RddError> {
        if let Some(param) = duplicate_param {
            return Err(RddError::DuplicateParameter { parameter: param });
        }
        Ok(())
    }
}
