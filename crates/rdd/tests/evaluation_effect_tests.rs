#![cfg(feature = "dev")]
//! Tests for treatment-effect estimation.
//!
//! These tests verify the pooled local polynomial regression at the cutoff:
//! - Reference estimates and standard errors
//! - Student-t confidence intervals
//! - Degenerate kernel windows
//! - Treatment column checks
//!
//! ## Test Organization
//!
//! 1. **Reference Values** - Coefficient and standard error
//! 2. **Inference** - Interval width, t statistic, p-value
//! 3. **Exact Recovery** - Noiseless piecewise-linear data
//! 4. **Degenerate Windows** - Empty, one-sided, saturated
//! 5. **Validation** - Treatment column and parameters

use approx::assert_relative_eq;

use rdd::internals::algorithms::regression::MAX_DEGREE;
use rdd::internals::evaluation::effect::{EffectEstimator, DEFAULT_ALPHA};
use rdd::internals::math::kernel::WeightFunction;
use rdd::internals::primitives::errors::RddError;
use rdd::internals::primitives::sample::Sample;

fn noisy_sample() -> (Vec<f64>, Vec<f64>) {
    let r: Vec<f64> = (0..21).map(|k| k as f64 / 10.0).collect();
    let y: Vec<f64> = r
        .iter()
        .enumerate()
        .map(|(k, &ri)| 1.0 + 0.5 * ri + if ri >= 1.0 { 2.0 } else { 0.0 } + 0.1 * (k as f64 * 1.7).sin())
        .collect();
    (r, y)
}

// ============================================================================
// Reference Value Tests
// ============================================================================

/// Test the local linear estimate and its standard error.
#[test]
fn test_local_linear_reference() {
    let (r, y) = noisy_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let est = EffectEstimator::default().estimate(&sample, 1.0, 0.6).unwrap();

    assert_relative_eq!(est.coef, 1.8794656709934228, max_relative = 1e-9);
    assert_relative_eq!(est.se, 0.09107103650231907, max_relative = 1e-8);
    assert_eq!(est.n_effective, 11);
    assert_eq!((est.n_left, est.n_right), (5, 6));
    assert_eq!(est.df_resid, 7);
    assert_eq!(est.degree, 1);
}

/// Test the local quadratic estimate.
#[test]
fn test_local_quadratic_reference() {
    let (r, y) = noisy_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let estimator = EffectEstimator::new(2, WeightFunction::Triangle, DEFAULT_ALPHA).unwrap();
    let est = estimator.estimate(&sample, 1.0, 0.6).unwrap();

    assert_relative_eq!(est.coef, 1.7716855971074177, max_relative = 1e-8);
    assert_relative_eq!(est.se, 0.16474314916286192, max_relative = 1e-7);
    assert_eq!(est.df_resid, 5);
}

/// Test that an explicit, consistent treatment column gives the same estimate.
#[test]
fn test_explicit_treatment_column() {
    let (r, y) = noisy_sample();
    let d: Vec<u8> = r.iter().map(|&ri| u8::from(ri >= 1.0)).collect();

    let derived = EffectEstimator::default()
        .estimate(&Sample::new(&r, &y).unwrap(), 1.0, 0.6)
        .unwrap();
    let explicit = EffectEstimator::default()
        .estimate(&Sample::with_treatment(&r, &y, &d).unwrap(), 1.0, 0.6)
        .unwrap();

    assert_relative_eq!(derived.coef, explicit.coef, epsilon = 1e-12);
    assert_relative_eq!(derived.se, explicit.se, epsilon = 1e-12);
}

// ============================================================================
// Inference Tests
// ============================================================================

/// Test the Student-t interval.
///
/// With 7 residual degrees of freedom the 97.5% quantile is 2.364624.
#[test]
fn test_confidence_interval_quantile() {
    let (r, y) = noisy_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let est = EffectEstimator::default().estimate(&sample, 1.0, 0.6).unwrap();

    assert_relative_eq!(est.interval_width(), 2.0 * 2.364624 * est.se, max_relative = 1e-6);
    assert_relative_eq!(
        (est.conf_int_lower + est.conf_int_upper) / 2.0,
        est.coef,
        epsilon = 1e-12
    );
    assert_relative_eq!(est.t_stat, est.coef / est.se, epsilon = 1e-9);
    assert!(est.p_value < 1e-4);
    assert!(est.is_significant());
}

/// Test that a larger alpha narrows the interval.
#[test]
fn test_alpha_narrows_interval() {
    let (r, y) = noisy_sample();
    let sample = Sample::new(&r, &y).unwrap();

    let wide = EffectEstimator::new(1, WeightFunction::Triangle, 0.01).unwrap();
    let narrow = EffectEstimator::new(1, WeightFunction::Triangle, 0.2).unwrap();

    let a = wide.estimate(&sample, 1.0, 0.6).unwrap();
    let b = narrow.estimate(&sample, 1.0, 0.6).unwrap();

    assert!(a.interval_width() > b.interval_width());
    assert_relative_eq!(a.coef, b.coef, epsilon = 1e-12);
}

// ============================================================================
// Exact Recovery Tests
// ============================================================================

/// Test that the jump is recovered exactly on noiseless data.
#[test]
fn test_exact_jump_recovery() {
    let r: Vec<f64> = (0..40).map(|k| k as f64 / 4.0).collect();
    let y: Vec<f64> = r
        .iter()
        .map(|&ri| 1.0 + 0.5 * ri + if ri >= 5.0 { 2.0 } else { 0.0 })
        .collect();
    let sample = Sample::new(&r, &y).unwrap();

    for wf in [WeightFunction::Triangle, WeightFunction::Epanechnikov, WeightFunction::Uniform] {
        let estimator = EffectEstimator::new(1, wf, DEFAULT_ALPHA).unwrap();
        let est = estimator.estimate(&sample, 5.0, 3.0).unwrap();
        assert_relative_eq!(est.coef, 2.0, epsilon = 1e-9);
        assert!(est.se < 1e-7);
    }
}

/// Test that a kinked, continuous function has no jump.
#[test]
fn test_no_jump_with_slope_change() {
    let r: Vec<f64> = (0..40).map(|k| k as f64 / 4.0).collect();
    let y: Vec<f64> = r
        .iter()
        .map(|&ri| if ri >= 5.0 { 1.0 + 3.0 * (ri - 5.0) } else { 1.0 - 0.5 * (ri - 5.0) })
        .collect();
    let sample = Sample::new(&r, &y).unwrap();
    let est = EffectEstimator::default().estimate(&sample, 5.0, 2.0).unwrap();

    assert_relative_eq!(est.coef, 0.0, epsilon = 1e-9);
}

// ============================================================================
// Degenerate Window Tests
// ============================================================================

/// Test a kernel that matches no observation.
#[test]
fn test_empty_kernel() {
    let r = vec![2.0, 1.0, 1.75, 1.5, 3.0, 3.5, 4.0];
    let y = vec![3.0, 4.0, 3.0, 3.5, 6.0, 6.0, 7.0];
    let sample = Sample::new(&r, &y).unwrap();

    let err = EffectEstimator::default().estimate(&sample, -5.0, 1.0).unwrap_err();
    assert!(matches!(err, RddError::EmptyKernel { .. }));
    assert!(err.is_degenerate());
}

/// Test a kernel that covers only one side of the cutoff.
#[test]
fn test_one_sided_kernel() {
    let r = vec![0.0, 0.1, 0.2, 0.3, 5.0, 6.0];
    let y = vec![1.0, 1.1, 1.3, 1.2, 4.0, 4.5];
    let sample = Sample::new(&r, &y).unwrap();

    let err = EffectEstimator::default().estimate(&sample, 0.35, 0.5).unwrap_err();
    assert_eq!(err, RddError::OneSidedKernel { n_left: 4, n_right: 0 });
}

/// Test a saturated regression.
#[test]
fn test_no_residual_degrees_of_freedom() {
    let r = vec![0.8, 0.9, 1.0, 1.1];
    let y = vec![1.0, 1.2, 3.0, 3.1];
    let sample = Sample::new(&r, &y).unwrap();

    let err = EffectEstimator::default().estimate(&sample, 0.95, 1.0).unwrap_err();
    assert!(matches!(err, RddError::NoResidualDegreesOfFreedom { n_obs: 4, rank: 4 }));
}

// ============================================================================
// Validation Tests
// ============================================================================

/// Test a treatment column that is not a sharp assignment.
#[test]
fn test_inconsistent_treatment() {
    let r = vec![0.0, 1.0, 2.0, 3.0];
    let y = vec![0.0, 1.0, 2.0, 3.0];
    let d = vec![0u8, 1, 1, 1];
    let sample = Sample::with_treatment(&r, &y, &d).unwrap();

    let err = EffectEstimator::default().estimate(&sample, 1.5, 2.0).unwrap_err();
    assert_eq!(err, RddError::InvalidTreatment { index: 1, value: 1 });
}

/// Test parameter validation.
#[test]
fn test_estimator_parameters() {
    assert_eq!(
        EffectEstimator::new(0, WeightFunction::Triangle, 0.05),
        Err(RddError::InvalidDegree(0))
    );
    assert_eq!(
        EffectEstimator::new(usize::MAX, WeightFunction::Triangle, 0.05),
        Err(RddError::InvalidDegree(usize::MAX))
    );
    assert!(EffectEstimator::new(MAX_DEGREE, WeightFunction::Triangle, 0.05).is_ok());
    assert_eq!(
        EffectEstimator::new(1, WeightFunction::Triangle, 1.0),
        Err(RddError::InvalidAlpha(1.0))
    );

    let (r, y) = noisy_sample();
    let sample = Sample::new(&r, &y).unwrap();
    assert!(matches!(
        EffectEstimator::default().estimate(&sample, 1.0, -0.6),
        Err(RddError::InvalidBandwidth(_))
    ));
}
