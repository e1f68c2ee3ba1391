//! High-level API for regression discontinuity estimation.
//!
//! ## Purpose
//!
//! This module provides the user-facing entry points: four free functions
//! covering the individual operations (local prediction, cross-validated and
//! plug-in bandwidth selection, effect estimation) and a fluent builder that
//! chains bandwidth selection into estimation.
//!
//! ## Design notes
//!
//! * **Ergonomic**: Fluent builder with sensible defaults for all parameters.
//! * **Validated**: Parameters are validated when `.build()` is called.
//! * **Type-Safe**: Generic over `Float` types for flexible precision.
//!
//! ## Key concepts
//!
//! ### Configuration Flow
//!
//! 1. Create an [`RddBuilder`] via `Rdd::new()`.
//! 2. Chain configuration methods (`.cutoff()`, `.rule_of_thumb()`, etc.).
//! 3. Call `.build()` to validate, then `.fit(r, y, d)` to run.
//!
//! ### Defaults
//!
//! * Bandwidth selector: rule of thumb.
//! * Degree: 1 (local linear).
//! * Kernel: triangle.
//! * Significance level: 0.05.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::{LocalPolynomial, WLSSolver};
use crate::engine::executor::{CVPassFn, RddExecutor};
use crate::engine::validator::Validator;
use crate::evaluation::effect::{EffectEstimator, DEFAULT_ALPHA};
use crate::evaluation::rule_of_thumb::rule_of_thumb as plug_in;

// Publicly re-exported types
pub use crate::algorithms::regression::Prediction;
pub use crate::engine::executor::{BandwidthSelector, RddConfig};
pub use crate::engine::output::{BandwidthSelection, EffectEstimate, RddResult, SelectionMethod};
pub use crate::evaluation::rule_of_thumb::PlugInEstimate;
pub use crate::math::kernel::WeightFunction;
pub use crate::primitives::errors::{ErrorKind, RddError};
pub use crate::primitives::sample::Sample;

// ============================================================================
// Free Functions
// ============================================================================

/// Local polynomial prediction at `x0` with the triangle kernel.
///
/// Returns [`Prediction::Undefined`] when fewer than `degree + 1` points have
/// positive weight.
pub fn predict_local<T: WLSSolver>(
    x: &[T],
    y: &[T],
    x0: T,
    degree: usize,
    bandwidth: T,
) -> Result<Prediction<T>, RddError> {
    LocalPolynomial::new(degree, WeightFunction::Triangle)?.predict(x, y, x0, bandwidth)
}

/// Bandwidth minimizing the one-sided leave-one-out prediction error.
pub fn select_bandwidth_cv<T: WLSSolver>(
    sample: &Sample<'_, T>,
    cutoff: T,
    h_grid: &[T],
    min_num_obs: usize,
) -> Result<T, RddError> {
    cross_validate(sample, cutoff, h_grid, min_num_obs).map(|selection| selection.bandwidth)
}

/// One-sided leave-one-out cross-validation with per-candidate scores.
pub fn cross_validate<T: WLSSolver>(
    sample: &Sample<'_, T>,
    cutoff: T,
    h_grid: &[T],
    min_num_obs: usize,
) -> Result<BandwidthSelection<T>, RddError> {
    Validator::validate_scalar(cutoff, "cutoff")?;
    let selector = BandwidthSelector::CrossValidation {
        grid: h_grid.to_vec(),
        min_num_obs,
    };
    RddExecutor::new(cutoff).select_bandwidth(sample, &selector)
}

/// Imbens–Kalyanaraman plug-in bandwidth.
pub fn select_bandwidth_rule_of_thumb<T: WLSSolver>(sample: &Sample<'_, T>, cutoff: T) -> Result<T, RddError> {
    rule_of_thumb(sample, cutoff).map(|estimate| estimate.bandwidth)
}

/// Imbens–Kalyanaraman plug-in bandwidth with every intermediate estimate.
pub fn rule_of_thumb<T: WLSSolver>(sample: &Sample<'_, T>, cutoff: T) -> Result<PlugInEstimate<T>, RddError> {
    let split = sample.split(cutoff)?;
    plug_in(&split)
}

/// Local linear treatment effect at `cutoff` with a `(1 - alpha)` interval.
pub fn estimate_effect_nonparametric<T: WLSSolver>(
    sample: &Sample<'_, T>,
    cutoff: T,
    bandwidth: T,
    alpha: T,
) -> Result<EffectEstimate<T>, RddError> {
    Validator::validate_alpha(alpha)?;
    let alpha = alpha.to_f64().unwrap_or(DEFAULT_ALPHA);
    EffectEstimator::new(1, WeightFunction::Triangle, alpha)?.estimate(sample, cutoff, bandwidth)
}

// ============================================================================
// Builder
// ============================================================================

/// Fluent builder for configuring an estimation run.
#[derive(Debug, Clone)]
pub struct RddBuilder<T> {
    /// Cutoff of the running variable (required).
    pub cutoff: Option<T>,

    /// Bandwidth selector.
    pub selector: Option<BandwidthSelector<T>>,

    /// Significance level of the confidence interval.
    pub alpha: Option<T>,

    /// Polynomial degree on each side.
    pub degree: Option<usize>,

    /// Kernel weight function of the effect regression.
    pub weight_function: Option<WeightFunction>,

    // ======================================
    // DEV
    // ======================================
    /// Custom cross-validation pass function.
    #[doc(hidden)]
    pub custom_cv_pass: Option<CVPassFn<T>>,

    /// Tracks if any parameter was set multiple times (for validation).
    #[doc(hidden)]
    pub duplicate_param: Option<&'static str>,
}

impl<T: Float> Default for RddBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Float> RddBuilder<T> {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            cutoff: None,
            selector: None,
            alpha: None,
            degree: None,
            weight_function: None,
            custom_cv_pass: None,
            duplicate_param: None,
        }
    }

    /// Set the cutoff of the running variable.
    pub fn cutoff(mut self, cutoff: T) -> Self {
        if self.cutoff.is_some() {
            self.duplicate_param = Some("cutoff");
        }
        self.cutoff = Some(cutoff);
        self
    }

    /// Use a fixed bandwidth.
    pub fn bandwidth(self, bandwidth: T) -> Self {
        self.selector(BandwidthSelector::Fixed(bandwidth))
    }

    /// Select the bandwidth by one-sided leave-one-out cross-validation.
    pub fn cross_validation(self, grid: &[T], min_num_obs: usize) -> Self {
        self.selector(BandwidthSelector::CrossValidation {
            grid: grid.to_vec(),
            min_num_obs,
        })
    }

    /// Select the bandwidth by the Imbens–Kalyanaraman plug-in rule.
    pub fn rule_of_thumb(self) -> Self {
        self.selector(BandwidthSelector::RuleOfThumb)
    }

    /// Cross-validate over a grid from half to twice the plug-in bandwidth.
    pub fn cross_validation_around_rule_of_thumb(self, min_num_obs: usize) -> Self {
        self.selector(BandwidthSelector::around_rule_of_thumb(min_num_obs))
    }

    /// Set the significance level of the confidence interval.
    pub fn alpha(mut self, alpha: T) -> Self {
        if self.alpha.is_some() {
            self.duplicate_param = Some("alpha");
        }
        self.alpha = Some(alpha);
        self
    }

    /// Set the polynomial degree of the effect regression.
    pub fn degree(mut self, degree: usize) -> Self {
        if self.degree.is_some() {
            self.duplicate_param = Some("degree");
        }
        self.degree = Some(degree);
        self
    }

    /// Set the kernel of the effect regression.
    pub fn weight_function(mut self, weight_function: WeightFunction) -> Self {
        if self.weight_function.is_some() {
            self.duplicate_param = Some("weight_function");
        }
        self.weight_function = Some(weight_function);
        self
    }

    fn selector(mut self, selector: BandwidthSelector<T>) -> Self {
        if self.selector.is_some() {
            self.duplicate_param = Some("bandwidth_selector");
        }
        self.selector = Some(selector);
        self
    }

    // ==========================
    // Development Options
    // ==========================

    /// Set a custom cross-validation pass function (only for dev)
    #[doc(hidden)]
    pub fn custom_cv_pass(mut self, pass: CVPassFn<T>) -> Self {
        self.custom_cv_pass = Some(pass);
        self
    }

    // ==========================
    // Build
    // ==========================

    /// Validate the configuration and build a runnable model.
    pub fn build(self) -> Result<Rdd<T>, RddError> {
        // Check for duplicate parameter configuration
        Validator::validate_no_duplicates(self.duplicate_param)?;

        let cutoff = self.cutoff.ok_or(RddError::MissingParameter { parameter: "cutoff" })?;

        let alpha = self.alpha.unwrap_or_else(|| T::from(DEFAULT_ALPHA).unwrap_or_else(T::nan));
        Validator::validate_alpha(alpha)?;

        let degree = self.degree.unwrap_or(1);
        Validator::validate_degree(degree)?;

        let estimator = EffectEstimator::new(
            degree,
            self.weight_function.unwrap_or_default(),
            alpha.to_f64().unwrap_or(DEFAULT_ALPHA),
        )?;

        let config = RddConfig {
            cutoff,
            selector: self.selector.unwrap_or_default(),
            estimator,
            custom_cv_pass: self.custom_cv_pass,
        };
        config.validate()?;

        Ok(Rdd { config })
    }
}

// ============================================================================
// Model
// ============================================================================

/// Validated estimation model produced by [`RddBuilder::build`].
#[derive(Debug, Clone)]
pub struct Rdd<T> {
    config: RddConfig<T>,
}

impl<T: Float> Rdd<T> {
    /// Start configuring a model.
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> RddBuilder<T> {
        RddBuilder::new()
    }
}

impl<T: WLSSolver> Rdd<T> {
    /// Validated configuration.
    pub fn config(&self) -> &RddConfig<T> {
        &self.config
    }

    /// Select the bandwidth, then estimate the effect at it.
    ///
    /// `d` is optional; when given it must equal `1{r >= cutoff}`.
    pub fn fit(&self, r: &[T], y: &[T], d: Option<&[u8]>) -> Result<RddResult<T>, RddError> {
        let sample = match d {
            Some(d) => Sample::with_treatment(r, y, d)?,
            None => Sample::new(r, y)?,
        };
        sample.check_sharp_assignment(self.config.cutoff)?;

        RddExecutor::from_config(&self.config).run(&sample, &self.config.selector)
    }

    /// Select the bandwidth without estimating the effect.
    pub fn select_bandwidth(&self, r: &[T], y: &[T]) -> Result<BandwidthSelection<T>, RddError> {
        let sample = Sample::new(r, y)?;
        RddExecutor::from_config(&self.config).select_bandwidth(&sample, &self.config.selector)
    }
}
