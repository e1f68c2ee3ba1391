//! Local polynomial treatment-effect estimation at the cutoff.
//!
//! ## Purpose
//!
//! This module estimates the jump of the conditional mean of `y` at the cutoff
//! by a single pooled, kernel-weighted regression, and reports the standard
//! error and a Student-t confidence interval of the jump.
//!
//! ## Design notes
//!
//! * **Pooled regression**: Regressors `[d, 1, c, ..., c^p, d*c, ..., d*c^p]`
//!   with `c = r - cutoff` let every polynomial coefficient differ across the
//!   cutoff; the coefficient on `d` is the effect at `c = 0`.
//! * **Pseudo-inverse OLS**: Rows are scaled by `sqrt(w)`; coefficients and
//!   their normalized covariance come from the Moore-Penrose pseudo-inverse.
//! * **Inference**: `se = sqrt(s2 * cov[0, 0])` with `s2 = RSS / df_resid` and
//!   `df_resid = n_effective - rank`. The interval uses the Student t quantile
//!   with `df_resid` degrees of freedom.
//!
//! ## Invariants
//!
//! * Only observations with positive kernel weight enter the regression.
//! * `conf_int_lower <= coef <= conf_int_upper`.
//!
//! ## Non-goals
//!
//! * Heteroskedasticity-robust or clustered standard errors.
//! * Fuzzy designs.

// External dependencies
use log::debug;
use num_traits::Float;
use statrs::distribution::{ContinuousCDF, StudentsT};

// Internal dependencies
use crate::algorithms::regression::check_degree;
use crate::math::kernel::{check_bandwidth, WeightFunction};
use crate::math::linalg::FloatLinalg;
use crate::primitives::errors::RddError;
use crate::primitives::sample::Sample;

/// Default significance level.
pub const DEFAULT_ALPHA: f64 = 0.05;

// ============================================================================
// Estimate
// ============================================================================

/// Treatment-effect estimate with inference.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectEstimate<T> {
    /// Estimated jump at the cutoff.
    pub coef: T,
    /// Standard error of `coef`.
    pub se: T,
    /// Lower bound of the `(1 - alpha)` confidence interval.
    pub conf_int_lower: T,
    /// Upper bound of the `(1 - alpha)` confidence interval.
    pub conf_int_upper: T,
    /// Significance level of the interval.
    pub alpha: T,
    /// Bandwidth of the kernel.
    pub bandwidth: T,
    /// Polynomial degree on each side.
    pub degree: usize,
    /// Observations with positive weight.
    pub n_effective: usize,
    /// Control observations with positive weight.
    pub n_left: usize,
    /// Treated observations with positive weight.
    pub n_right: usize,
    /// Residual degrees of freedom.
    pub df_resid: usize,
    /// `coef / se`.
    pub t_stat: T,
    /// Two-sided p-value of `coef = 0`.
    pub p_value: T,
}

impl<T: Float> EffectEstimate<T> {
    /// Returns `true` if the interval excludes zero.
    pub fn is_significant(&self) -> bool {
        self.conf_int_lower > T::zero() || self.conf_int_upper < T::zero()
    }

    /// Width of the confidence interval.
    pub fn interval_width(&self) -> T {
        self.conf_int_upper - self.conf_int_lower
    }
}

// ============================================================================
// Estimator
// ============================================================================

/// Configurable local polynomial effect estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectEstimator {
    degree: usize,
    weight_function: WeightFunction,
    alpha: f64,
}

impl Default for EffectEstimator {
    fn default() -> Self {
        Self {
            degree: 1,
            weight_function: WeightFunction::Triangle,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl EffectEstimator {
    /// Create an estimator; `1 <= degree <= MAX_DEGREE` and `0 < alpha < 1`.
    pub fn new(degree: usize, weight_function: WeightFunction, alpha: f64) -> Result<Self, RddError> {
        check_degree(degree)?;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(RddError::InvalidAlpha(alpha));
        }
        Ok(Self {
            degree,
            weight_function,
            alpha,
        })
    }

    /// Polynomial degree.
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Kernel.
    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Significance level.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Estimate the effect at `cutoff` with the given bandwidth.
    pub fn estimate<T: FloatLinalg>(
        &self,
        sample: &Sample<'_, T>,
        cutoff: T,
        bandwidth: T,
    ) -> Result<EffectEstimate<T>, RddError> {
        check_bandwidth(bandwidth)?;
        sample.check_sharp_assignment(cutoff)?;

        let r = sample.r();
        let y = sample.y();
        let p = self.degree;
        let cols = 2 * p + 2;

        let mut design = Vec::new();
        let mut target = Vec::new();
        let (mut n_left, mut n_right) = (0usize, 0usize);

        for i in 0..r.len() {
            let w = self.weight_function.weight_at(r[i], cutoff, bandwidth);
            if w <= T::zero() {
                continue;
            }

            let treated = sample.is_treated(i, cutoff);
            if treated {
                n_right += 1;
            } else {
                n_left += 1;
            }

            let sw = w.sqrt();
            let d = if treated { T::one() } else { T::zero() };
            let c = r[i] - cutoff;

            design.push(sw * d);
            let mut term = sw;
            for _ in 0..=p {
                design.push(term);
                term = term * c;
            }
            let mut term = sw * d * c;
            for _ in 0..p {
                design.push(term);
                term = term * c;
            }
            target.push(sw * y[i]);
        }

        let n_effective = n_left + n_right;
        if n_effective == 0 {
            return Err(RddError::EmptyKernel {
                at: to_f64(cutoff),
                bandwidth: to_f64(bandwidth),
            });
        }
        if n_left == 0 || n_right == 0 {
            return Err(RddError::OneSidedKernel { n_left, n_right });
        }

        let fit = T::ols(&design, &target, n_effective, cols).ok_or(RddError::EmptyKernel {
            at: to_f64(cutoff),
            bandwidth: to_f64(bandwidth),
        })?;

        let df_resid = n_effective.saturating_sub(fit.rank);
        if df_resid == 0 {
            return Err(RddError::NoResidualDegreesOfFreedom {
                n_obs: n_effective,
                rank: fit.rank,
            });
        }

        let coef = to_f64(fit.coefficients[0]);
        let scale = to_f64(fit.rss) / df_resid as f64;
        let se = (scale * to_f64(fit.normalized_variance(0))).max(0.0).sqrt();

        let dist = StudentsT::new(0.0, 1.0, df_resid as f64).map_err(|_| {
            RddError::NoResidualDegreesOfFreedom {
                n_obs: n_effective,
                rank: fit.rank,
            }
        })?;
        let q = dist.inverse_cdf(1.0 - self.alpha / 2.0);
        let t_stat = coef / se;
        let p_value = if t_stat.is_finite() {
            2.0 * (1.0 - dist.cdf(t_stat.abs()))
        } else if t_stat.is_nan() {
            f64::NAN
        } else {
            0.0
        };

        debug!(
            "effect estimate: coef={coef:.6}, se={se:.6}, df={df_resid}, n=({n_left}, {n_right}), h={:.6}",
            to_f64(bandwidth)
        );

        Ok(EffectEstimate {
            coef: fit.coefficients[0],
            se: from_f64(se),
            conf_int_lower: from_f64(coef - q * se),
            conf_int_upper: from_f64(coef + q * se),
            alpha: from_f64(self.alpha),
            bandwidth,
            degree: p,
            n_effective,
            n_left,
            n_right,
            df_resid,
            t_stat: from_f64(t_stat),
            p_value: from_f64(p_value),
        })
    }
}

#[inline]
fn to_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

#[inline]
fn from_f64<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}
