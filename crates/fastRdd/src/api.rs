//! High-level API for regression discontinuity estimation with parallel
//! bandwidth selection.
//!
//! ## Purpose
//!
//! This module extends the `rdd` API with a builder whose cross-validation
//! scores the bandwidth grid on all available CPU cores, and with a fit method
//! that accepts ndarray columns.
//!
//! ## Design notes
//!
//! * **Fluent Integration**: Wraps the base `rdd` builder and delegates validation to it.
//! * **Parallel-First**: Parallel cross-validation is on by default.
//! * **Feature-Gated**: Without the `cpu` feature every run is sequential.
//!
//! ### Configuration Flow
//!
//! 1. Create a [`ParallelRddBuilder`] via `Rdd::new()`.
//! 2. Chain configuration methods (`.cutoff()`, `.cross_validation()`, etc.).
//! 3. Call `.build()`, then `.fit(&r, &y, d)` with slices, vectors or `Array1`.

// Feature-gated imports
#[cfg(feature = "cpu")]
use crate::evaluation::cv::cv_pass_parallel;
#[cfg(feature = "cpu")]
use rdd::internals::engine::executor::CVPassFn;

// External dependencies
use num_traits::Float;

// Export dependencies from rdd crate
use rdd::internals::algorithms::regression::WLSSolver;
use rdd::internals::api::RddBuilder;
use rdd::internals::engine::executor::{BandwidthSelector, RddExecutor};
use rdd::internals::engine::validator::Validator;

// Internal dependencies
use crate::input::RddInput;

// Publicly re-exported types
pub use rdd::internals::api::{
    BandwidthSelection, EffectEstimate, ErrorKind, PlugInEstimate, Prediction, RddError, RddResult, Sample,
    SelectionMethod, WeightFunction,
};

// ============================================================================
// Free Functions
// ============================================================================

/// Bandwidth minimizing the one-sided leave-one-out prediction error,
/// scoring the candidates in parallel.
pub fn select_bandwidth_cv<T>(
    sample: &Sample<'_, T>,
    cutoff: T,
    h_grid: &[T],
    min_num_obs: usize,
) -> Result<T, RddError>
where
    T: WLSSolver + Send + Sync,
{
    cross_validate(sample, cutoff, h_grid, min_num_obs).map(|selection| selection.bandwidth)
}

/// Parallel one-sided leave-one-out cross-validation with per-candidate scores.
pub fn cross_validate<T>(
    sample: &Sample<'_, T>,
    cutoff: T,
    h_grid: &[T],
    min_num_obs: usize,
) -> Result<BandwidthSelection<T>, RddError>
where
    T: WLSSolver + Send + Sync,
{
    Validator::validate_scalar(cutoff, "cutoff")?;
    let selector = BandwidthSelector::CrossValidation {
        grid: h_grid.to_vec(),
        min_num_obs,
    };

    let executor = RddExecutor::new(cutoff);
    #[cfg(feature = "cpu")]
    let executor = executor.custom_cv_pass(Some(cv_pass_parallel as CVPassFn<T>));

    executor.select_bandwidth(sample, &selector)
}

// ============================================================================
// Extended Builder
// ============================================================================

/// Builder for estimation runs with parallel bandwidth selection.
#[derive(Debug, Clone)]
pub struct ParallelRddBuilder<T: Float> {
    /// Base builder from the rdd crate
    pub base: RddBuilder<T>,

    /// Whether cross-validation runs in parallel.
    pub parallel: bool,
}

impl<T: Float> Default for ParallelRddBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> ParallelRddBuilder<T> {
    /// Create a new builder with default parameters.
    ///
    /// # Defaults
    ///
    /// * All base parameters from the rdd `RddBuilder`
    /// * parallel: true
    pub fn new() -> Self {
        Self {
            base: RddBuilder::new(),
            parallel: true,
        }
    }

    /// Set parallel execution mode.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    // ========================================================================
    // Shared Setters
    // ========================================================================

    /// Set the cutoff of the running variable.
    pub fn cutoff(mut self, cutoff: T) -> Self {
        self.base = self.base.cutoff(cutoff);
        self
    }

    /// Use a fixed bandwidth.
    pub fn bandwidth(mut self, bandwidth: T) -> Self {
        self.base = self.base.bandwidth(bandwidth);
        self
    }

    /// Select the bandwidth by one-sided leave-one-out cross-validation.
    pub fn cross_validation(mut self, grid: &[T], min_num_obs: usize) -> Self {
        self.base = self.base.cross_validation(grid, min_num_obs);
        self
    }

    /// Select the bandwidth by the Imbens–Kalyanaraman plug-in rule.
    pub fn rule_of_thumb(mut self) -> Self {
        self.base = self.base.rule_of_thumb();
        self
    }

    /// Cross-validate over a grid from half to twice the plug-in bandwidth.
    pub fn cross_validation_around_rule_of_thumb(mut self, min_num_obs: usize) -> Self {
        self.base = self.base.cross_validation_around_rule_of_thumb(min_num_obs);
        self
    }

    /// Set the significance level of the confidence interval.
    pub fn alpha(mut self, alpha: T) -> Self {
        self.base = self.base.alpha(alpha);
        self
    }

    /// Set the polynomial degree of the effect regression.
    pub fn degree(mut self, degree: usize) -> Self {
        self.base = self.base.degree(degree);
        self
    }

    /// Set the kernel of the effect regression.
    pub fn weight_function(mut self, weight_function: WeightFunction) -> Self {
        self.base = self.base.weight_function(weight_function);
        self
    }
}

impl<T: WLSSolver + Send + Sync> ParallelRddBuilder<T> {
    // ========================================================================
    // Build Method
    // ========================================================================

    /// Validate the configuration and build a runnable model.
    pub fn build(self) -> Result<ParallelRdd<T>, RddError> {
        let mut base = self.base;

        #[cfg(feature = "cpu")]
        {
            if self.parallel {
                base = base.custom_cv_pass(cv_pass_parallel);
            } else {
                base.custom_cv_pass = None;
            }
        }
        #[cfg(not(feature = "cpu"))]
        {
            base.custom_cv_pass = None;
        }

        // Validation is centralized in the rdd crate
        let model = base.build()?;
        Ok(ParallelRdd { model })
    }
}

// ============================================================================
// Extended Model
// ============================================================================

/// Estimation model with parallel bandwidth selection.
#[derive(Debug, Clone)]
pub struct ParallelRdd<T: Float> {
    model: rdd::internals::api::Rdd<T>,
}

impl<T: Float> ParallelRdd<T> {
    /// Start configuring a model.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> ParallelRddBuilder<T> {
        ParallelRddBuilder::new()
    }
}

impl<T: WLSSolver + Send + Sync> ParallelRdd<T> {
    /// Select the bandwidth, then estimate the effect at it.
    pub fn fit<I1, I2>(&self, r: &I1, y: &I2, d: Option<&[u8]>) -> Result<RddResult<T>, RddError>
    where
        I1: RddInput<T> + ?Sized,
        I2: RddInput<T> + ?Sized,
    {
        self.model.fit(r.as_rdd_slice()?, y.as_rdd_slice()?, d)
    }

    /// Select the bandwidth without estimating the effect.
    pub fn select_bandwidth<I1, I2>(&self, r: &I1, y: &I2) -> Result<BandwidthSelection<T>, RddError>
    where
        I1: RddInput<T> + ?Sized,
        I2: RddInput<T> + ?Sized,
    {
        self.model.select_bandwidth(r.as_rdd_slice()?, y.as_rdd_slice()?)
    }
}
