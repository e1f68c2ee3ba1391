#![cfg(feature = "dev")]
//! Tests for the prelude module.
//!
//! These tests verify that the prelude exports all necessary types and
//! functions for convenient usage of the RDD API.
//!
//! ## Test Organization
//!
//! 1. **Import Verification** - All prelude exports are accessible
//! 2. **Type Usage** - Types can be used without qualification
//! 3. **Builder Pattern** - Complete workflows work with prelude imports

use rdd::prelude::*;

fn sample_data() -> (Vec<f64>, Vec<f64>) {
    let r: Vec<f64> = (0..21).map(|k| k as f64 / 10.0).collect();
    let y: Vec<f64> = r
        .iter()
        .map(|&ri| 1.0 + ri + if ri >= 1.0 { 1.5 } else { 0.0 })
        .collect();
    (r, y)
}

// ============================================================================
// Import Verification Tests
// ============================================================================

/// Test that the free functions are exported.
#[test]
fn test_prelude_free_functions() {
    let (r, y) = sample_data();
    let sample = Sample::new(&r, &y).unwrap();

    let prediction: Prediction<f64> = predict_local(&r, &y, 0.5, 1, 0.3).unwrap();
    assert!(prediction.is_defined());

    let effect: EffectEstimate<f64> = estimate_effect_nonparametric(&sample, 1.0, 0.6, 0.05).unwrap();
    assert!((effect.coef - 1.5).abs() < 1e-9);

    let selection: BandwidthSelection<f64> = cross_validate(&sample, 1.0, &[0.3, 0.6], 2).unwrap();
    assert!(selection.has_cv_scores());
    assert!(select_bandwidth_cv(&sample, 1.0, &[0.3, 0.6], 2).is_ok());
}

/// Test that WeightFunction variants are exported.
#[test]
fn test_prelude_weight_function() {
    let _ = Rdd::<f64>::new().weight_function(Triangle);
    let _ = Rdd::<f64>::new().weight_function(Epanechnikov);
    let _ = Rdd::<f64>::new().weight_function(Uniform);
}

/// Test that error types are exported.
#[test]
fn test_prelude_errors() {
    let err: RddError = Rdd::<f64>::new().build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

// ============================================================================
// Builder Pattern Tests
// ============================================================================

/// Test a complete workflow with prelude imports only.
#[test]
fn test_prelude_workflow() {
    let (r, y) = sample_data();
    let builder: RddBuilder<f64> = Rdd::new().cutoff(1.0).bandwidth(0.6);
    let result: RddResult<f64> = builder.build().unwrap().fit(&r, &y, None).unwrap();

    assert_eq!(result.selection.method, SelectionMethod::Fixed);
    assert!((result.estimate.coef - 1.5).abs() < 1e-9);
}
