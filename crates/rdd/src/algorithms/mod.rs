//! Layer 3: Algorithms
//!
//! This layer implements the regression machinery: the kernel-weighted local
//! polynomial predictor and the unweighted polynomial fits used by the plug-in
//! bandwidth. It is orchestrated by the evaluation and engine layers.

// Local polynomial prediction and polynomial fits.
pub mod regression;
