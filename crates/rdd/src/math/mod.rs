//! Layer 2: Math
//!
//! # Purpose
//!
//! This layer provides pure mathematical functions used throughout the crate:
//! - Kernel functions for distance-based weighting
//! - Dense least squares (minimum-norm and pseudo-inverse OLS)
//! - Sample moments
//!
//! These are reusable mathematical building blocks with no estimator-specific logic.
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math ← You are here
//!   ↓
//! Layer 1: Primitives
//! ```

/// Kernel (weight) functions for distance-based weighting.
pub mod kernel;

/// Least-squares backend over nalgebra.
pub mod linalg;

/// Sample moments (mean, variance, median).
pub mod moments;
