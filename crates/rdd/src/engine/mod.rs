//! Layer 5: Engine
//!
//! # Purpose
//!
//! This layer orchestrates a complete run:
//! - Parameter validation
//! - Bandwidth selection and effect estimation
//! - Result assembly and formatting
//!
//! # Architecture
//!
//! ```text
//! Layer 6: API
//!   ↓
//! Layer 5: Engine ← You are here
//!   ↓
//! Layer 4: Evaluation
//!   ↓
//! Layer 3: Algorithms
//!   ↓
//! Layer 2: Math
//!   ↓
//! Layer 1: Primitives
//! ```

/// Configuration validation.
pub mod validator;

/// Selection and estimation orchestration.
pub mod executor;

/// Result types.
pub mod output;
