#![cfg(feature = "dev")]
//! Tests for the execution engine.
//!
//! These tests verify orchestration of a full run:
//! - Every bandwidth selector
//! - The custom cross-validation hook
//! - Result formatting
//!
//! ## Test Organization
//!
//! 1. **Selectors** - Fixed, CV, rule of thumb, CV around the rule of thumb
//! 2. **Hooks** - Custom cross-validation pass
//! 3. **Output** - Display implementations

use approx::assert_relative_eq;

use rdd::internals::engine::executor::{BandwidthSelector, CVPassFn, RddConfig, RddExecutor};
use rdd::internals::engine::output::SelectionMethod;
use rdd::internals::evaluation::cv::{score_grid, CandidateScore};
use rdd::internals::primitives::errors::RddError;
use rdd::internals::primitives::sample::{Sample, SideSplit};

fn smooth_sample() -> (Vec<f64>, Vec<f64>) {
    let r: Vec<f64> = (0..101).map(|k| k as f64 / 20.0).collect();
    let y: Vec<f64> = r
        .iter()
        .enumerate()
        .map(|(k, &ri)| ri.sin() + if ri >= 2.5 { 0.5 } else { 0.0 } + 0.2 * (7.0 * k as f64).cos())
        .collect();
    (r, y)
}

// ============================================================================
// Selector Tests
// ============================================================================

/// Test a fixed bandwidth.
#[test]
fn test_fixed_selector() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let result = RddExecutor::new(2.5)
        .run(&sample, &BandwidthSelector::Fixed(1.0))
        .unwrap();

    assert_eq!(result.selection.method, SelectionMethod::Fixed);
    assert_eq!(result.selection.bandwidth, 1.0);
    assert_eq!(result.estimate.bandwidth, 1.0);
    assert!(!result.selection.has_cv_scores());
}

/// Test cross-validation through the executor.
#[test]
fn test_cv_selector() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let grid = vec![0.5, 1.0, 1.5];
    let selector = BandwidthSelector::CrossValidation {
        grid: grid.clone(),
        min_num_obs: 3,
    };
    let result = RddExecutor::new(2.5).run(&sample, &selector).unwrap();

    assert_eq!(result.selection.method, SelectionMethod::CrossValidation);
    assert!(grid.contains(&result.selection.bandwidth));
    assert_eq!(result.selection.cv_scores.as_ref().unwrap().len(), 3);
    assert_eq!(result.selection.cv_comparisons.as_ref().unwrap().len(), 3);
    assert_eq!(result.estimate.bandwidth, result.selection.bandwidth);
}

/// Test the rule of thumb through the executor.
#[test]
fn test_rule_of_thumb_selector() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let result = RddExecutor::new(2.5)
        .run(&sample, &BandwidthSelector::RuleOfThumb)
        .unwrap();

    assert_eq!(result.selection.method, SelectionMethod::RuleOfThumb);
    assert_relative_eq!(result.selection.bandwidth, 1.1116473903359025, max_relative = 1e-7);
    assert!(result.selection.plug_in.is_some());
}

/// Test cross-validation around the plug-in bandwidth.
#[test]
fn test_cv_around_rule_of_thumb_selector() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let selector = BandwidthSelector::around_rule_of_thumb(3);
    let selection = RddExecutor::new(2.5).select_bandwidth(&sample, &selector).unwrap();

    let pilot = selection.plug_in.as_ref().unwrap().bandwidth;
    let grid = selection.grid.as_ref().unwrap();
    assert_eq!(grid.len(), 32);
    assert_relative_eq!(grid[0], pilot / 2.0, epsilon = 1e-12);
    assert_relative_eq!(grid[31], pilot * 2.0, epsilon = 1e-12);
    assert!(grid.contains(&selection.bandwidth));
}

/// Test configuration validation.
#[test]
fn test_config_validation() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();

    let mut config = RddConfig::new(2.5);
    config.selector = BandwidthSelector::CrossValidation {
        grid: vec![1.0, -0.5],
        min_num_obs: 2,
    };
    assert_eq!(
        RddExecutor::run_with_config(&sample, &config).unwrap_err(),
        RddError::InvalidBandwidth(-0.5)
    );

    config.selector = BandwidthSelector::CrossValidation {
        grid: Vec::new(),
        min_num_obs: 2,
    };
    assert_eq!(
        RddExecutor::run_with_config(&sample, &config).unwrap_err(),
        RddError::EmptyGrid
    );

    config.selector = BandwidthSelector::RuleOfThumb;
    config.cutoff = f64::NAN;
    assert!(matches!(
        RddExecutor::run_with_config(&sample, &config),
        Err(RddError::InvalidNumericValue(_))
    ));
}

// ============================================================================
// Hook Tests
// ============================================================================

fn reversed_pass(split: &SideSplit<f64>, grid: &[f64], min_num_obs: usize) -> Vec<CandidateScore<f64>> {
    // Scores in reverse grid order; the executor must use them as returned
    let mut scores = score_grid(split, grid, min_num_obs);
    scores.reverse();
    scores
}

/// Test that a custom cross-validation pass replaces the sequential one.
#[test]
fn test_custom_cv_pass_is_used() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let selector = BandwidthSelector::CrossValidation {
        grid: vec![0.5, 1.0, 1.5],
        min_num_obs: 3,
    };

    let base = RddExecutor::new(2.5).select_bandwidth(&sample, &selector).unwrap();
    let hooked = RddExecutor::new(2.5)
        .custom_cv_pass(Some(reversed_pass as CVPassFn<f64>))
        .select_bandwidth(&sample, &selector)
        .unwrap();

    let mut expected = base.cv_comparisons.unwrap();
    expected.reverse();
    assert_eq!(hooked.cv_comparisons.unwrap(), expected);
}

// ============================================================================
// Output Tests
// ============================================================================

/// Test the summary produced by Display.
#[test]
fn test_result_display() {
    let (r, y) = smooth_sample();
    let sample = Sample::new(&r, &y).unwrap();
    let selector = BandwidthSelector::CrossValidation {
        grid: vec![0.5, 1.0],
        min_num_obs: 3,
    };
    let result = RddExecutor::new(2.5).run(&sample, &selector).unwrap();
    let text = result.to_string();

    assert!(text.contains("Summary:"));
    assert!(text.contains("Cross-validation"));
    assert!(text.contains("comparisons"));
    assert!(text.contains("std err"));
    assert!(text.contains("95.0% confidence interval"));
}
