//! Layer 4: Evaluation
//!
//! This layer provides parallel implementations of bandwidth selection:
//! - Parallel one-sided leave-one-out cross-validation

// Parallel cross-validation for bandwidth selection
#[cfg(feature = "cpu")]
pub mod cv;
