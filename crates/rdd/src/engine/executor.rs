//! Execution engine for regression discontinuity estimation.
//!
//! ## Purpose
//!
//! This module orchestrates a full estimation run: it splits the sample at
//! the cutoff, selects a bandwidth with the configured selector, and estimates
//! the treatment effect at that bandwidth.
//!
//! ## Design notes
//!
//! * Provides both configuration-based and parameter-based entry points.
//! * Bandwidth selection is pluggable: extension crates replace the
//!   sequential cross-validation pass through a hidden callback.
//! * Generic over `Float` types to support f32 and f64.
//!
//! ## Invariants
//!
//! * The split is computed once per run and shared by every selector.
//! * The estimate is always computed at the selected bandwidth.
//!
//! ## Non-goals
//!
//! * This module does not build grids from user input (handled by the builder).
//! * This module does not handle parallel execution directly (handled by `fastRdd`).

// External dependencies
use log::{debug, info};
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::WLSSolver;
use crate::engine::output::{BandwidthSelection, RddResult, SelectionMethod};
use crate::engine::validator::Validator;
use crate::evaluation::cv::{grid_around, score_grid, select_best, CandidateScore, DEFAULT_GRID_SIZE};
use crate::evaluation::effect::{EffectEstimate, EffectEstimator};
use crate::evaluation::rule_of_thumb::rule_of_thumb;
use crate::primitives::errors::RddError;
use crate::primitives::sample::{Sample, SideSplit};

// ============================================================================
// Type Definitions
// ============================================================================

/// Signature for custom cross-validation pass function
#[doc(hidden)]
pub type CVPassFn<T> = fn(
    &SideSplit<T>, // sample split at the cutoff
    &[T],          // candidate bandwidths
    usize,         // min_num_obs
) -> Vec<CandidateScore<T>>; // one score per candidate, in grid order

/// Strategy for choosing the bandwidth.
#[derive(Debug, Clone, PartialEq)]
pub enum BandwidthSelector<T> {
    /// Use the given bandwidth.
    Fixed(T),

    /// One-sided leave-one-out cross-validation over `grid`.
    CrossValidation {
        /// Candidate bandwidths.
        grid: Vec<T>,
        /// Minimum training-set size for a point to be scored.
        min_num_obs: usize,
    },

    /// Imbens–Kalyanaraman plug-in bandwidth.
    RuleOfThumb,

    /// Cross-validation over `num` candidates from half to twice the plug-in bandwidth.
    CrossValidationAroundRuleOfThumb {
        /// Number of candidates.
        num: usize,
        /// Minimum training-set size for a point to be scored.
        min_num_obs: usize,
    },
}

impl<T> Default for BandwidthSelector<T> {
    fn default() -> Self {
        BandwidthSelector::RuleOfThumb
    }
}

impl<T: Float> BandwidthSelector<T> {
    /// Cross-validation around the plug-in bandwidth with the default grid size.
    pub fn around_rule_of_thumb(min_num_obs: usize) -> Self {
        BandwidthSelector::CrossValidationAroundRuleOfThumb {
            num: DEFAULT_GRID_SIZE,
            min_num_obs,
        }
    }

    /// Check the selector parameters.
    pub fn validate(&self) -> Result<(), RddError> {
        match self {
            BandwidthSelector::Fixed(h) => Validator::validate_bandwidth(*h),
            BandwidthSelector::CrossValidation { grid, .. } => Validator::validate_grid(grid),
            BandwidthSelector::RuleOfThumb => Ok(()),
            BandwidthSelector::CrossValidationAroundRuleOfThumb { num, .. } => {
                Validator::validate_grid_size(*num)
            }
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a full estimation run.
#[derive(Debug, Clone)]
pub struct RddConfig<T> {
    /// Cutoff of the running variable.
    pub cutoff: T,

    /// Bandwidth selector.
    pub selector: BandwidthSelector<T>,

    /// Effect estimator (degree, kernel, significance level).
    pub estimator: EffectEstimator,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom cross-validation pass function.
    #[doc(hidden)]
    pub custom_cv_pass: Option<CVPassFn<T>>,
}

impl<T: Float> RddConfig<T> {
    /// Configuration with the default selector and estimator.
    pub fn new(cutoff: T) -> Self {
        Self {
            cutoff,
            selector: BandwidthSelector::default(),
            estimator: EffectEstimator::default(),
            custom_cv_pass: None,
        }
    }

    /// Check every parameter of the configuration.
    pub fn validate(&self) -> Result<(), RddError> {
        Validator::validate_scalar(self.cutoff, "cutoff")?;
        self.selector.validate()
    }
}

// ============================================================================
// Executor
// ============================================================================

/// Unified executor for bandwidth selection and effect estimation.
#[derive(Debug, Clone)]
pub struct RddExecutor<T> {
    /// Cutoff of the running variable.
    pub cutoff: T,

    /// Effect estimator.
    pub estimator: EffectEstimator,

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++
    /// Custom cross-validation pass function (e.g., for parallel execution).
    #[doc(hidden)]
    pub custom_cv_pass: Option<CVPassFn<T>>,
}

impl<T: WLSSolver> RddExecutor<T> {
    // ========================================================================
    // Constructor and Builder Methods
    // ========================================================================

    /// Create an executor with the default estimator.
    pub fn new(cutoff: T) -> Self {
        Self {
            cutoff,
            estimator: EffectEstimator::default(),
            custom_cv_pass: None,
        }
    }

    /// Create an executor from an `RddConfig`.
    pub fn from_config(config: &RddConfig<T>) -> Self {
        Self::new(config.cutoff)
            .estimator(config.estimator)
            .custom_cv_pass(config.custom_cv_pass)
    }

    /// Set the effect estimator.
    pub fn estimator(mut self, estimator: EffectEstimator) -> Self {
        self.estimator = estimator;
        self
    }

    // ++++++++++++++++++++++++++++++++++++++
    // +               DEV                  +
    // ++++++++++++++++++++++++++++++++++++++

    /// Set a custom cross-validation pass function.
    #[doc(hidden)]
    pub fn custom_cv_pass(mut self, cv_pass_fn: Option<CVPassFn<T>>) -> Self {
        self.custom_cv_pass = cv_pass_fn;
        self
    }

    // ========================================================================
    // Main Entry Points
    // ========================================================================

    /// Run selection and estimation using an `RddConfig` payload.
    pub fn run_with_config(sample: &Sample<'_, T>, config: &RddConfig<T>) -> Result<RddResult<T>, RddError> {
        config.validate()?;
        RddExecutor::from_config(config).run(sample, &config.selector)
    }

    /// Select a bandwidth with `selector`, then estimate the effect at it.
    pub fn run(
        &self,
        sample: &Sample<'_, T>,
        selector: &BandwidthSelector<T>,
    ) -> Result<RddResult<T>, RddError> {
        let selection = self.select_bandwidth(sample, selector)?;
        info!(
            "bandwidth selected by {}: h={:.6}",
            selection.method.name(),
            selection.bandwidth.to_f64().unwrap_or(f64::NAN)
        );

        let estimate = self.estimate(sample, selection.bandwidth)?;
        Ok(RddResult { selection, estimate })
    }

    /// Select a bandwidth without estimating the effect.
    pub fn select_bandwidth(
        &self,
        sample: &Sample<'_, T>,
        selector: &BandwidthSelector<T>,
    ) -> Result<BandwidthSelection<T>, RddError> {
        selector.validate()?;

        if let BandwidthSelector::Fixed(h) = selector {
            return Ok(BandwidthSelection::fixed(*h));
        }

        let split = sample.split(self.cutoff)?;
        debug!(
            "split at cutoff {:.6}: {} below, {} at or above",
            self.cutoff.to_f64().unwrap_or(f64::NAN),
            split.left.len(),
            split.right.len()
        );

        match selector {
            BandwidthSelector::Fixed(h) => Ok(BandwidthSelection::fixed(*h)),
            BandwidthSelector::CrossValidation { grid, min_num_obs } => {
                self.cross_validate(&split, grid.clone(), *min_num_obs, SelectionMethod::CrossValidation)
            }
            BandwidthSelector::RuleOfThumb => rule_of_thumb(&split).map(BandwidthSelection::from_plug_in),
            BandwidthSelector::CrossValidationAroundRuleOfThumb { num, min_num_obs } => {
                let plug_in = rule_of_thumb(&split)?;
                let grid = grid_around(plug_in.bandwidth, *num);
                let mut selection = self.cross_validate(
                    &split,
                    grid,
                    *min_num_obs,
                    SelectionMethod::CrossValidationAroundRuleOfThumb,
                )?;
                selection.plug_in = Some(plug_in);
                Ok(selection)
            }
        }
    }

    /// Estimate the effect at a given bandwidth.
    pub fn estimate(&self, sample: &Sample<'_, T>, bandwidth: T) -> Result<EffectEstimate<T>, RddError> {
        self.estimator.estimate(sample, self.cutoff, bandwidth)
    }

    // ========================================================================
    // Cross-Validation
    // ========================================================================

    fn cross_validate(
        &self,
        split: &SideSplit<T>,
        grid: Vec<T>,
        min_num_obs: usize,
        method: SelectionMethod,
    ) -> Result<BandwidthSelection<T>, RddError> {
        let scores = match self.custom_cv_pass {
            Some(callback) => callback(split, &grid, min_num_obs),
            None => score_grid(split, &grid, min_num_obs),
        };
        let outcome = select_best(&grid, scores)?;
        Ok(BandwidthSelection::from_cv(grid, outcome, method))
    }
}
