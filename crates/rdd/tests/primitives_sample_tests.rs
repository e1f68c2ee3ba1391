#![cfg(feature = "dev")]
//! Tests for the sample data model.
//!
//! These tests verify sample construction and splitting:
//! - Column validation
//! - Treatment derivation and sharp-assignment checks
//! - Splitting at the cutoff
//!
//! ## Test Organization
//!
//! 1. **Construction** - Length, emptiness, finiteness, treatment values
//! 2. **Treatment** - Derived and explicit assignment
//! 3. **Splitting** - Sides, ordering, and out-of-range cutoffs

use rdd::internals::primitives::errors::{ErrorKind, RddError};
use rdd::internals::primitives::sample::Sample;

// ============================================================================
// Construction Tests
// ============================================================================

/// Test rejection of malformed columns.
#[test]
fn test_sample_construction_errors() {
    let empty: Vec<f64> = Vec::new();
    assert_eq!(Sample::new(&empty, &empty).unwrap_err(), RddError::EmptyInput);

    let r = vec![1.0, 2.0, 3.0];
    let y = vec![1.0, 2.0];
    assert!(matches!(
        Sample::new(&r, &y),
        Err(RddError::MismatchedInputs { expected: 3, got: 2, .. })
    ));

    let y_nan = vec![1.0, f64::NAN, 3.0];
    assert!(matches!(
        Sample::new(&r, &y_nan),
        Err(RddError::InvalidNumericValue(_))
    ));

    let y = vec![1.0, 2.0, 3.0];
    assert!(matches!(
        Sample::with_treatment(&r, &y, &[0, 1]),
        Err(RddError::MismatchedInputs { column: "d", .. })
    ));
    assert_eq!(
        Sample::with_treatment(&r, &y, &[0, 2, 1]).unwrap_err(),
        RddError::InvalidTreatment { index: 1, value: 2 }
    );
}

/// Test error classification.
#[test]
fn test_error_kinds() {
    assert_eq!(RddError::EmptyGrid.kind(), ErrorKind::InvalidArgument);
    assert_eq!(
        RddError::NoValidComparisons { candidates: 3 }.kind(),
        ErrorKind::DegenerateResult
    );
    assert!(RddError::EmptyInput.to_string().contains("empty"));
}

// ============================================================================
// Treatment Tests
// ============================================================================

/// Test the derived treatment indicator.
#[test]
fn test_derived_treatment() {
    let r = vec![0.5, 1.0, 1.5];
    let y = vec![0.0, 0.0, 0.0];
    let sample = Sample::new(&r, &y).unwrap();

    assert!(!sample.is_treated(0, 1.0));
    assert!(sample.is_treated(1, 1.0));
    assert!(sample.is_treated(2, 1.0));
    assert!(sample.check_sharp_assignment(1.0).is_ok());
    assert!(sample.treatment().is_none());
}

/// Test the explicit treatment column.
#[test]
fn test_explicit_treatment() {
    let r = vec![0.5, 1.0, 1.5];
    let y = vec![0.0, 0.0, 0.0];
    let d = vec![0u8, 1, 1];
    let sample = Sample::with_treatment(&r, &y, &d).unwrap();

    assert!(sample.check_sharp_assignment(1.0).is_ok());
    assert_eq!(
        sample.check_sharp_assignment(1.2).unwrap_err(),
        RddError::InvalidTreatment { index: 1, value: 1 }
    );
    assert!(matches!(
        sample.check_sharp_assignment(f64::NAN),
        Err(RddError::InvalidNumericValue(_))
    ));
}

// ============================================================================
// Splitting Tests
// ============================================================================

/// Test the strict split and per-side ordering.
#[test]
fn test_split_sides() {
    let r = vec![3.0, 1.0, 2.0, 2.5, 0.5];
    let y = vec![30.0, 10.0, 20.0, 25.0, 5.0];
    let split = Sample::new(&r, &y).unwrap().split(2.0).unwrap();

    assert_eq!(split.left.x, vec![0.5, 1.0]);
    assert_eq!(split.left.y, vec![5.0, 10.0]);
    assert_eq!(split.right.x, vec![2.0, 2.5, 3.0]);
    assert_eq!(split.right.y, vec![20.0, 25.0, 30.0]);
    assert_eq!(split.len(), 5);
}

/// Test that tied running-variable values keep their input order.
#[test]
fn test_split_ties_stable() {
    let r = vec![1.0, 0.5, 1.0, 0.25, 1.0];
    let y = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let split = Sample::new(&r, &y).unwrap().split(0.75).unwrap();

    assert_eq!(split.left.x, vec![0.25, 0.5]);
    assert_eq!(split.left.y, vec![4.0, 2.0]);
    assert_eq!(split.right.x, vec![1.0, 1.0, 1.0]);
    assert_eq!(split.right.y, vec![1.0, 3.0, 5.0]);
}

/// Test cutoffs that leave a side empty.
#[test]
fn test_split_out_of_range() {
    let r = vec![1.0, 2.0, 3.0];
    let y = vec![1.0, 2.0, 3.0];
    let sample = Sample::new(&r, &y).unwrap();

    assert_eq!(
        sample.split(1.0).unwrap_err(),
        RddError::CutoffOutOfRange {
            cutoff: 1.0,
            n_left: 0,
            n_right: 3
        }
    );
    assert!(matches!(
        sample.split(3.5),
        Err(RddError::CutoffOutOfRange { n_right: 0, .. })
    ));
}
