//! # Fast RDD (parallel Regression Discontinuity estimation)
//!
//! Extension of the [`rdd`] crate: the one-sided leave-one-out
//! cross-validation scores its bandwidth grid on all CPU cores with
//! [rayon](https://docs.rs/rayon), and models accept
//! [ndarray](https://docs.rs/ndarray) columns directly.
//!
//! Results are identical to the sequential `rdd` crate: candidates are scored
//! independently and reassembled in grid order before the same selection.
//!
//! ## Quick Start
//!
//! ```rust
//! use fastRdd::prelude::*;
//!
//! let r: Vec<f64> = (0..60).map(|i| i as f64 / 6.0).collect();
//! let y: Vec<f64> = r
//!     .iter()
//!     .enumerate()
//!     .map(|(i, &ri)| 0.5 * ri + if ri >= 5.0 { 1.5 } else { 0.0 } + 0.05 * (i as f64).cos())
//!     .collect();
//!
//! let model = Rdd::new()
//!     .cutoff(5.0)
//!     .cross_validation(&[1.0, 1.5, 2.0, 2.5], 3)
//!     .build()?;
//!
//! let result = model.fit(&r, &y, None)?;
//! println!("{}", result);
//! # Result::<(), RddError>::Ok(())
//! ```
//!
//! ### ndarray Integration
//!
//! ```rust
//! use fastRdd::prelude::*;
//! use ndarray::Array1;
//!
//! let r = Array1::from_vec((0..60).map(|i| i as f64 / 6.0).collect());
//! let y = r.mapv(|ri| if ri >= 5.0 { 1.0 + ri } else { ri });
//!
//! let model = Rdd::new().cutoff(5.0).bandwidth(2.0).build()?;
//!
//! // fit() accepts &Array1<f64>, &[f64], or Vec<f64>
//! let result = model.fit(&r, &y, None)?;
//! assert!((result.estimate.coef - 1.0).abs() < 1e-8);
//! # Result::<(), RddError>::Ok(())
//! ```
//!
//! ## Features
//!
//! * `cpu` (default): rayon-parallel cross-validation.
//! * `dev`: re-export internal modules for testing.
//!
//! ## License
//!
//! See the repository for license information and contribution guidelines.

#![allow(non_snake_case)]

// Layer 4: Evaluation - parallel bandwidth selection.
mod evaluation;

// High-level fluent API.
mod api;

// Input data handling.
mod input;

pub use api::{cross_validate, select_bandwidth_cv};
pub use input::RddInput;

// Standard fastRdd prelude.
pub mod prelude {
    pub use crate::api::{
        cross_validate, select_bandwidth_cv, BandwidthSelection, EffectEstimate, ErrorKind, ParallelRdd as Rdd,
        ParallelRddBuilder as RddBuilder, PlugInEstimate, Prediction, RddError, RddResult, Sample,
        SelectionMethod, WeightFunction,
        WeightFunction::{Epanechnikov, Triangle, Uniform},
    };
    pub use crate::input::RddInput;
}

// Internal modules for development and testing.
//
// This module re-exports internal modules for development and testing purposes.
// It is only available with the `dev` feature enabled.
#[cfg(feature = "dev")]
pub mod internals {
    pub mod evaluation {
        pub use crate::evaluation::*;
    }
    pub mod api {
        pub use crate::api::*;
    }
}
