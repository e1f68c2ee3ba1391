//! Imbens–Kalyanaraman rule-of-thumb bandwidth.
//!
//! ## Purpose
//!
//! This module computes the closed-form, MSE-optimal bandwidth for local-linear
//! estimation at the cutoff under the triangle kernel (Imbens and Kalyanaraman,
//! 2009). Unknown quantities of the asymptotic MSE are replaced by simple
//! plug-in estimates obtained in three stages.
//!
//! ## Key concepts
//!
//! 1. **Pilot**: A Silverman-type bandwidth `h1` yields the density of `r` at
//!    the cutoff (`f`) and the pooled conditional variance of `y` (`sigma2`).
//! 2. **Curvature**: A global cubic with a jump, fitted on the halves of each
//!    side adjacent to the cutoff, gives the third derivative `m3`. It sets
//!    side-specific reference bandwidths `h2` over which quadratics estimate
//!    the second derivatives `m2`.
//! 3. **Final**: Regularization terms `R` keep the curvature difference away
//!    from zero; the optimal bandwidth follows from the plug-in formula.
//!
//! ## Invariants
//!
//! * `h1`, `f`, `sigma2`, both `h2` and the result are finite and strictly
//!   positive, otherwise the stage fails with
//!   [`RddError::NonPositiveQuantity`].
//! * All regressions are unweighted minimum-norm least squares.
//!
//! ## Non-goals
//!
//! * Kernels other than the triangle kernel.
//! * Bias-corrected or coverage-optimal bandwidths.

// External dependencies
use log::{debug, warn};
use num_traits::Float;

// Internal dependencies
use crate::algorithms::regression::PolynomialFit;
use crate::math::kernel::WeightFunction;
use crate::math::linalg::FloatLinalg;
use crate::math::moments::{median_sorted, sample_std, sum_squared_deviations};
use crate::primitives::errors::RddError;
use crate::primitives::sample::SideSplit;

// ============================================================================
// Constants
// ============================================================================

/// Silverman-type constant of the pilot bandwidth.
const PILOT_CONSTANT: f64 = 1.84;

/// Constant of the curvature reference bandwidths.
const CURVATURE_CONSTANT: f64 = 3.56;

/// Lower bound of the squared third derivative.
const M3_SQUARED_FLOOR: f64 = 0.01;

/// Regularization constant for local-linear estimation.
const REGULARIZATION_CONSTANT: f64 = 720.0;

// ============================================================================
// Result Types
// ============================================================================

/// Density and variance estimates from the pilot stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotStage<T> {
    /// Pilot bandwidth `h1`.
    pub bandwidth: T,
    /// Density of `r` at the cutoff.
    pub density: T,
    /// Pooled conditional variance of `y` at the cutoff.
    pub variance: T,
    /// Control observations within `h1`.
    pub n_left: usize,
    /// Treated observations within `h1`.
    pub n_right: usize,
}

/// Curvature estimates on each side of the cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvatureStage<T> {
    /// Third derivative of the regression function.
    pub m3: T,
    /// Whether `m3^2` was raised to its floor.
    pub m3_floored: bool,
    /// Reference bandwidth on the control side.
    pub h2_left: T,
    /// Reference bandwidth on the treated side.
    pub h2_right: T,
    /// Control observations within `h2_left`.
    pub n_left: usize,
    /// Treated observations within `h2_right`.
    pub n_right: usize,
    /// Second derivative on the control side.
    pub m2_left: T,
    /// Second derivative on the treated side.
    pub m2_right: T,
}

/// Rule-of-thumb bandwidth together with every intermediate estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlugInEstimate<T> {
    /// Pilot stage.
    pub pilot: PilotStage<T>,
    /// Curvature stage.
    pub curvature: CurvatureStage<T>,
    /// Regularization term on the control side.
    pub regularization_left: T,
    /// Regularization term on the treated side.
    pub regularization_right: T,
    /// Optimal bandwidth.
    pub bandwidth: T,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the three plug-in stages on a split sample.
pub fn rule_of_thumb<T: FloatLinalg>(split: &SideSplit<T>) -> Result<PlugInEstimate<T>, RddError> {
    let n = split.len();
    let pilot = pilot_stage(split)?;
    let curvature = curvature_stage(split, &pilot)?;

    let c = constant::<T>(REGULARIZATION_CONSTANT);
    let sigma2 = pilot.variance;
    let regularization = |n_h2: usize, h2: T| c * sigma2 / (count::<T>(n_h2) * h2.powi(4));
    let regularization_left = regularization(curvature.n_left, curvature.h2_left);
    let regularization_right = regularization(curvature.n_right, curvature.h2_right);

    let two = constant::<T>(2.0);
    let jump = curvature.m2_right - curvature.m2_left;
    let denominator = pilot.density * (jump * jump + regularization_left + regularization_right);
    let bandwidth = constant::<T>(WeightFunction::Triangle.boundary_constant())
        * (two * sigma2 / denominator).powf(constant(0.2))
        * count::<T>(n).powf(constant(-0.2));
    let bandwidth = positive("h_opt", bandwidth)?;

    debug!(
        "rule of thumb final: r_left={:.6e}, r_right={:.6e}, h_opt={:.6}",
        as_f64(regularization_left),
        as_f64(regularization_right),
        as_f64(bandwidth)
    );

    Ok(PlugInEstimate {
        pilot,
        curvature,
        regularization_left,
        regularization_right,
        bandwidth,
    })
}

/// Stage 1: pilot bandwidth, density and conditional variance.
pub fn pilot_stage<T: FloatLinalg>(split: &SideSplit<T>) -> Result<PilotStage<T>, RddError> {
    let cutoff = split.cutoff;
    let n = split.len();

    let mut r_all = Vec::with_capacity(n);
    r_all.extend_from_slice(&split.left.x);
    r_all.extend_from_slice(&split.right.x);
    let sd = sample_std(&r_all).unwrap_or_else(T::zero);

    let h1 = constant::<T>(PILOT_CONSTANT) * sd * count::<T>(n).powf(constant(-0.2));
    let h1 = positive("h_pilot", h1)?;

    let y_left = window_outcomes(&split.left.x, &split.left.y, |r| r >= cutoff - h1);
    let y_right = window_outcomes(&split.right.x, &split.right.y, |r| r <= cutoff + h1);
    let n_window = y_left.len() + y_right.len();

    let density = count::<T>(n_window) / (constant::<T>(2.0) * count::<T>(n) * h1);
    let density = positive("density", density)?;

    // An empty side contributes nothing to the pooled sum of squares
    let variance =
        (sum_squared_deviations(&y_left) + sum_squared_deviations(&y_right)) / count::<T>(n_window);
    let variance = positive("conditional_variance", variance)?;

    debug!(
        "rule of thumb pilot: h1={:.6}, f={:.6}, sigma2={:.6}, window=({}, {})",
        as_f64(h1),
        as_f64(density),
        as_f64(variance),
        y_left.len(),
        y_right.len()
    );

    Ok(PilotStage {
        bandwidth: h1,
        density,
        variance,
        n_left: y_left.len(),
        n_right: y_right.len(),
    })
}

/// Stage 2: third derivative, reference bandwidths and second derivatives.
pub fn curvature_stage<T: FloatLinalg>(
    split: &SideSplit<T>,
    pilot: &PilotStage<T>,
) -> Result<CurvatureStage<T>, RddError> {
    let cutoff = split.cutoff;

    // Halves of each side adjacent to the cutoff
    let median_left = median_sorted(&split.left.x).unwrap_or(cutoff);
    let median_right = median_sorted(&split.right.x).unwrap_or(cutoff);

    let mut r_inner = Vec::new();
    let mut y_inner = Vec::new();
    let mut d_inner = Vec::new();
    for (&r, &y) in split.left.x.iter().zip(&split.left.y) {
        if r > median_left {
            r_inner.push(r);
            y_inner.push(y);
            d_inner.push(T::zero());
        }
    }
    for (&r, &y) in split.right.x.iter().zip(&split.right.y) {
        if r < median_right {
            r_inner.push(r);
            y_inner.push(y);
            d_inner.push(T::one());
        }
    }

    let cubic = PolynomialFit::fit(&r_inner, &y_inner, cutoff, 3, Some(d_inner.as_slice())).ok_or(
        RddError::NonPositiveQuantity {
            quantity: "n_curvature",
            value: 0.0,
        },
    )?;
    let m3 = constant::<T>(6.0) * cubic.coefficient(3);

    let floor = constant::<T>(M3_SQUARED_FLOOR);
    let m3_floored = m3 * m3 < floor;
    if m3_floored {
        warn!(
            "rule of thumb: m3^2={:.3e} is below {}; using the floor",
            as_f64(m3 * m3),
            M3_SQUARED_FLOOR
        );
    }
    let m3_squared = (m3 * m3).max(floor);

    let scale = constant::<T>(CURVATURE_CONSTANT)
        * (pilot.variance / (pilot.density * m3_squared)).powf(constant(1.0 / 7.0));
    let h2_left = positive(
        "h2_left",
        scale * count::<T>(split.left.len()).powf(constant(-1.0 / 7.0)),
    )?;
    let h2_right = positive(
        "h2_right",
        scale * count::<T>(split.right.len()).powf(constant(-1.0 / 7.0)),
    )?;

    let (m2_left, n_left) = side_curvature(
        &split.left.x,
        &split.left.y,
        cutoff,
        h2_left,
        "left",
        |r| r >= cutoff - h2_left,
    )?;
    let (m2_right, n_right) = side_curvature(
        &split.right.x,
        &split.right.y,
        cutoff,
        h2_right,
        "right",
        |r| r <= cutoff + h2_right,
    )?;

    debug!(
        "rule of thumb curvature: m3={:.6}, h2=({:.6}, {:.6}), m2=({:.6}, {:.6}), window=({}, {})",
        as_f64(m3),
        as_f64(h2_left),
        as_f64(h2_right),
        as_f64(m2_left),
        as_f64(m2_right),
        n_left,
        n_right
    );

    Ok(CurvatureStage {
        m3,
        m3_floored,
        h2_left,
        h2_right,
        n_left,
        n_right,
        m2_left,
        m2_right,
    })
}

/// Quadratic fit within a side's reference window; returns `(m2, n_window)`.
fn side_curvature<T, F>(
    r: &[T],
    y: &[T],
    cutoff: T,
    bandwidth: T,
    side: &'static str,
    mut in_window: F,
) -> Result<(T, usize), RddError>
where
    T: FloatLinalg,
    F: FnMut(T) -> bool,
{
    let (r_window, y_window): (Vec<T>, Vec<T>) = r
        .iter()
        .zip(y)
        .filter(|&(&ri, _)| in_window(ri))
        .map(|(&ri, &yi)| (ri, yi))
        .unzip();

    let empty = RddError::EmptyReferenceWindow {
        side,
        bandwidth: as_f64(bandwidth),
    };
    if r_window.is_empty() {
        return Err(empty);
    }

    let quadratic = PolynomialFit::fit(&r_window, &y_window, cutoff, 2, None).ok_or(empty)?;
    Ok((constant::<T>(2.0) * quadratic.coefficient(2), r_window.len()))
}

// ============================================================================
// Helpers
// ============================================================================

fn window_outcomes<T: Float, F: FnMut(T) -> bool>(r: &[T], y: &[T], mut in_window: F) -> Vec<T> {
    r.iter()
        .zip(y)
        .filter(|&(&ri, _)| in_window(ri))
        .map(|(_, &yi)| yi)
        .collect()
}

fn positive<T: Float>(quantity: &'static str, value: T) -> Result<T, RddError> {
    if value.is_finite() && value > T::zero() {
        Ok(value)
    } else {
        Err(RddError::NonPositiveQuantity {
            quantity,
            value: as_f64(value),
        })
    }
}

#[inline]
fn constant<T: Float>(value: f64) -> T {
    T::from(value).unwrap_or_else(T::nan)
}

#[inline]
fn count<T: Float>(n: usize) -> T {
    T::from(n).unwrap_or_else(T::nan)
}

#[inline]
fn as_f64<T: Float>(value: T) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}
