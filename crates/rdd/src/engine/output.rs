//! Output types and result structures.
//!
//! ## Purpose
//!
//! This module defines the records returned by the pipeline: the selected
//! bandwidth with its selection diagnostics ([`BandwidthSelection`]), the
//! treatment-effect estimate ([`EffectEstimate`]), and their combination
//! ([`RddResult`]).
//!
//! ## Design notes
//!
//! * **Optional diagnostics**: Selector-specific outputs use `Option`.
//! * **Ergonomics**: Implements `Display` for human-readable summaries.
//!
//! ## Invariants
//!
//! * `cv_scores` and `cv_comparisons`, when present, align with `grid`.
//! * A selected CV bandwidth is a member of `grid`.
//!
//! ## Non-goals
//!
//! * This module does not perform calculations; it only stores results.
//! * Serialization.

// External dependencies
use core::cmp::Ordering;
use core::fmt::{Display, Formatter, Result};
use num_traits::Float;

// Internal dependencies
use crate::evaluation::cv::CVOutcome;
use crate::evaluation::rule_of_thumb::PlugInEstimate;

pub use crate::evaluation::effect::EffectEstimate;

// ============================================================================
// Selection Method
// ============================================================================

/// How the bandwidth was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMethod {
    /// Supplied by the caller.
    Fixed,
    /// One-sided leave-one-out cross-validation over a user grid.
    CrossValidation,
    /// Imbens–Kalyanaraman plug-in.
    RuleOfThumb,
    /// Cross-validation over a grid spanning half to twice the plug-in bandwidth.
    CrossValidationAroundRuleOfThumb,
}

impl SelectionMethod {
    /// Human-readable name.
    pub const fn name(&self) -> &'static str {
        match self {
            SelectionMethod::Fixed => "Fixed",
            SelectionMethod::CrossValidation => "Cross-validation",
            SelectionMethod::RuleOfThumb => "Rule of thumb",
            SelectionMethod::CrossValidationAroundRuleOfThumb => "Cross-validation (rule-of-thumb grid)",
        }
    }
}

// ============================================================================
// Bandwidth Selection
// ============================================================================

/// Selected bandwidth and the diagnostics of its selector.
#[derive(Debug, Clone, PartialEq)]
pub struct BandwidthSelection<T> {
    /// Selected bandwidth.
    pub bandwidth: T,

    /// Selector that produced the bandwidth.
    pub method: SelectionMethod,

    /// Candidate grid (cross-validation only).
    pub grid: Option<Vec<T>>,

    /// MSE per candidate; `None` for candidates without comparisons.
    pub cv_scores: Option<Vec<Option<T>>>,

    /// Number of comparisons per candidate.
    pub cv_comparisons: Option<Vec<usize>>,

    /// Plug-in intermediates (rule of thumb only).
    pub plug_in: Option<PlugInEstimate<T>>,
}

impl<T: Float> BandwidthSelection<T> {
    /// Selection of a caller-supplied bandwidth.
    pub fn fixed(bandwidth: T) -> Self {
        Self {
            bandwidth,
            method: SelectionMethod::Fixed,
            grid: None,
            cv_scores: None,
            cv_comparisons: None,
            plug_in: None,
        }
    }

    /// Selection by the plug-in rule.
    pub fn from_plug_in(estimate: PlugInEstimate<T>) -> Self {
        Self {
            bandwidth: estimate.bandwidth,
            method: SelectionMethod::RuleOfThumb,
            grid: None,
            cv_scores: None,
            cv_comparisons: None,
            plug_in: Some(estimate),
        }
    }

    /// Selection by cross-validation over `grid`.
    pub fn from_cv(grid: Vec<T>, outcome: CVOutcome<T>, method: SelectionMethod) -> Self {
        Self {
            bandwidth: outcome.bandwidth,
            method,
            grid: Some(grid),
            cv_scores: Some(outcome.scores.iter().map(|s| s.mse()).collect()),
            cv_comparisons: Some(outcome.scores.iter().map(|s| s.comparisons).collect()),
            plug_in: None,
        }
    }

    /// Check if cross-validation was performed.
    pub fn has_cv_scores(&self) -> bool {
        self.cv_scores.is_some()
    }

    /// Smallest cross-validation MSE.
    pub fn best_cv_score(&self) -> Option<T> {
        self.cv_scores.as_ref().and_then(|scores| {
            scores
                .iter()
                .flatten()
                .copied()
                .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        })
    }
}

// ============================================================================
// Combined Result
// ============================================================================

/// Output of a full pipeline run: bandwidth selection then estimation.
#[derive(Debug, Clone, PartialEq)]
pub struct RddResult<T> {
    /// Bandwidth selection.
    pub selection: BandwidthSelection<T>,

    /// Treatment-effect estimate at the selected bandwidth.
    pub estimate: EffectEstimate<T>,
}

// ============================================================================
// Display Implementation
// ============================================================================

impl<T: Float + Display> Display for EffectEstimate<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let level = (T::one() - self.alpha) * T::from(100.0).unwrap_or_else(T::one);

        writeln!(f, "Treatment effect (local polynomial, degree {}):", self.degree)?;
        writeln!(f, "  Bandwidth:    {}", self.bandwidth)?;
        writeln!(
            f,
            "  Observations: {} ({} below, {} at or above)",
            self.n_effective, self.n_left, self.n_right
        )?;
        writeln!(f, "  Residual df:  {}", self.df_resid)?;
        writeln!(f)?;
        writeln!(
            f,
            "{:>12} {:>12} {:>10} {:>10} {:>12} {:>12}",
            "coef", "std err", "t", "P>|t|", "[lower", "upper]"
        )?;
        writeln!(f, "{:-<73}", "")?;
        writeln!(
            f,
            "{:>12.6} {:>12.6} {:>10.3} {:>10.4} {:>12.6} {:>12.6}",
            self.coef,
            self.se,
            self.t_stat,
            self.p_value,
            self.conf_int_lower,
            self.conf_int_upper
        )?;
        write!(f, "  ({:.1}% confidence interval)", level)
    }
}

impl<T: Float + Display> Display for BandwidthSelection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Bandwidth selection:")?;
        writeln!(f, "  Method:    {}", self.method.name())?;
        writeln!(f, "  Bandwidth: {}", self.bandwidth)?;

        if let Some(plug_in) = &self.plug_in {
            writeln!(f, "  Pilot h1:  {}", plug_in.pilot.bandwidth)?;
            writeln!(
                f,
                "  Curvature: m2 = ({}, {}), m3 = {}",
                plug_in.curvature.m2_left, plug_in.curvature.m2_right, plug_in.curvature.m3
            )?;
        }

        if let (Some(grid), Some(scores), Some(counts)) =
            (&self.grid, &self.cv_scores, &self.cv_comparisons)
        {
            writeln!(f, "  Candidates: {}", grid.len())?;
            if let Some(best) = self.best_cv_score() {
                writeln!(f, "  Best CV score: {}", best)?;
            }
            writeln!(f)?;
            writeln!(f, "{:>12} {:>14} {:>12}", "h", "MSE", "comparisons")?;
            writeln!(f, "{:-<40}", "")?;
            for ((h, score), n) in grid.iter().zip(scores).zip(counts) {
                match score {
                    Some(mse) => writeln!(f, "{:>12.6} {:>14.6} {:>12}", h, mse, n)?,
                    None => writeln!(f, "{:>12.6} {:>14} {:>12}", h, "-", n)?,
                }
            }
        }

        Ok(())
    }
}

impl<T: Float + Display> Display for RddResult<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Summary:")?;
        writeln!(f, "{}", self.selection)?;
        write!(f, "{}", self.estimate)
    }
}
