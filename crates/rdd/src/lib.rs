//! # RDD — Regression Discontinuity estimation for Rust
//!
//! Nonparametric estimation of treatment effects in sharp regression
//! discontinuity designs: local polynomial regression on each side of a
//! cutoff, data-driven bandwidth selection, and Student-t inference.
//!
//! ## What is a regression discontinuity design?
//!
//! Treatment is assigned by a running variable `r` crossing a known cutoff
//! (`d = 1{r >= cutoff}`). Units just below and just above the cutoff are
//! comparable, so the jump of `E[y | r]` at the cutoff identifies the local
//! treatment effect. The jump is estimated by a kernel-weighted local linear
//! fit on each side, and the quality of that fit hinges on the bandwidth.
//!
//! ## Quick Start
//!
//! ### Free functions
//!
//! ```rust
//! use rdd::prelude::*;
//!
//! let r = vec![2.0, 1.0, 1.75, 1.5, 3.0, 3.5, 4.0];
//! let y = vec![3.0, 4.0, 3.0, 3.5, 6.0, 6.0, 7.0];
//!
//! let sample = Sample::new(&r, &y)?;
//! let effect = estimate_effect_nonparametric(&sample, 1.8, 1.0, 0.05)?;
//!
//! assert!(effect.conf_int_lower <= effect.coef);
//! println!("{}", effect);
//! # Result::<(), RddError>::Ok(())
//! ```
//!
//! ### Builder
//!
//! ```rust
//! use rdd::prelude::*;
//!
//! let r: Vec<f64> = (0..40).map(|i| i as f64 / 4.0).collect();
//! let y: Vec<f64> = r
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &ri)| 1.0 + 0.5 * ri + if ri >= 5.0 { 2.0 } else { 0.0 } + 0.1 * (i as f64).sin())
//!     .collect();
//!
//! let model = Rdd::new()
//!     .cutoff(5.0)
//!     .cross_validation(&[1.0, 2.0, 3.0], 3)
//!     .alpha(0.1)
//!     .build()?;
//!
//! let result = model.fit(&r, &y, None)?;
//! println!("{}", result);
//! # Result::<(), RddError>::Ok(())
//! ```
//!
//! ## Bandwidth selectors
//!
//! | Selector                                   | Builder method                               |
//! |--------------------------------------------|----------------------------------------------|
//! | Fixed                                      | `.bandwidth(h)`                              |
//! | One-sided leave-one-out cross-validation   | `.cross_validation(grid, min_num_obs)`       |
//! | Imbens–Kalyanaraman plug-in (default)      | `.rule_of_thumb()`                           |
//! | Cross-validation around the plug-in        | `.cross_validation_around_rule_of_thumb(m)`  |
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade: per-candidate
//! CV scores and plug-in stages at `debug`, the selected bandwidth at `info`,
//! and the third-derivative floor of the plug-in at `warn`. No logger is
//! installed by the library.
//!
//! ## References
//!
//! - Imbens, G. and Kalyanaraman, K. (2009). "Optimal Bandwidth Choice for the Regression Discontinuity Estimator"
//! - Imbens, G. and Lemieux, T. (2008). "Regression Discontinuity Designs: A Guide to Practice"
//! - Ludwig, J. and Miller, D. (2007). "Does Head Start Improve Children's Life Chances?"
//!
//! ## License
//!
//! See the repository for license information and contribution guidelines.

// Layer 1: Primitives - data structures and basic utilities.
mod primitives;

// Layer 2: Math - pure mathematical functions.
mod math;

// Layer 3: Algorithms - local polynomial regression.
mod algorithms;

// Layer 4: Evaluation - bandwidth selection and effect estimation.
mod evaluation;

// Layer 5: Engine - orchestration and execution control.
mod engine;

// High-level fluent API.
mod api;

pub use api::{
    cross_validate, estimate_effect_nonparametric, predict_local, rule_of_thumb, select_bandwidth_cv,
    select_bandwidth_rule_of_thumb,
};

// Standard RDD prelude.
pub mod prelude {
    pub use crate::api::{
        cross_validate, estimate_effect_nonparametric, predict_local, rule_of_thumb, select_bandwidth_cv,
        select_bandwidth_rule_of_thumb, BandwidthSelection, EffectEstimate, ErrorKind, PlugInEstimate,
        Prediction, Rdd, RddBuilder, RddError, RddResult, Sample, SelectionMethod,
        WeightFunction,
        WeightFunction::Epanechnikov,
        WeightFunction::Triangle,
        WeightFunction::Uniform,
    };
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod primitives {
        pub use crate::primitives::*;
    }
    pub mod math {
        pub use crate::math::*;
    }
    pub mod algorithms {
        pub use crate::algorithms::*;
    }
    pub mod engine {
        pub use crate::engine::*;
    }
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
