//! Layer 4: Evaluation
//!
//! # Purpose
//!
//! This layer turns the regression machinery into the quantities reported to
//! the user:
//! - Cross-validated bandwidth selection
//! - Rule-of-thumb plug-in bandwidth
//! - Treatment-effect estimation with confidence intervals
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine
//!   ↓
//! Layer 4: Evaluation ← You are here
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// One-sided leave-one-out cross-validation.
pub mod cv;

/// Imbens–Kalyanaraman plug-in bandwidth.
pub mod rule_of_thumb;

/// Treatment-effect estimation.
pub mod effect;
