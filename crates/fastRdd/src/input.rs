//! Input abstractions for estimation runs.
//!
//! ## Purpose
//!
//! This module lets `fit` accept several column containers (slices, vectors,
//! ndarray) through a single interface.
//!
//! ## Design notes
//!
//! * **Zero-copy where possible**: Provides direct slice access to underlying data buffers.
//! * **Fail-fast validation**: Non-contiguous ndarray views are rejected before any work.
//!
//! ## Invariants
//!
//! * Returned slices represent all elements in the input container.
//!
//! ## Non-goals
//!
//! * This module does not perform data cleaning or imputation.

// External dependencies
use ndarray::{ArrayBase, Data, Ix1};
use num_traits::Float;

// Export dependencies from rdd crate
use rdd::internals::primitives::errors::RddError;

/// Trait for types that can be used as a numeric column of a sample.
pub trait RddInput<T: Float> {
    /// Convert the input to a contiguous slice.
    fn as_rdd_slice(&self) -> Result<&[T], RddError>;
}

impl<T: Float> RddInput<T> for [T] {
    fn as_rdd_slice(&self) -> Result<&[T], RddError> {
        Ok(self)
    }
}

impl<T: Float> RddInput<T> for Vec<T> {
    fn as_rdd_slice(&self) -> Result<&[T], RddError> {
        Ok(self.as_slice())
    }
}

impl<T: Float, S> RddInput<T> for ArrayBase<S, Ix1>
where
    S: Data<Elem = T>,
{
    fn as_rdd_slice(&self) -> Result<&[T], RddError> {
        self.as_slice().ok_or_else(|| {
            RddError::InvalidNumericValue("ndarray input must be contiguous in memory".to_string())
        })
    }
}
