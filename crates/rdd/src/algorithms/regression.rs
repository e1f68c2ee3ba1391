//! Local and global polynomial regression.
//!
//! ## Purpose
//!
//! This module provides the local polynomial predictor used by bandwidth
//! cross-validation, together with the unweighted polynomial fits used by the
//! plug-in bandwidth:
//! - [`LocalPolynomial`]: kernel-weighted fit evaluated at a single point.
//! - SIMD-optimized accumulation for the local-linear closed form.
//! - [`PolynomialFit`]: unweighted fit on centred monomials, optionally with a
//!   treatment indicator column.
//!
//! ## Design notes
//!
//! * Rows and targets are scaled by `sqrt(w)` so that an ordinary least-squares
//!   solve yields the weighted fit.
//! * Rank-deficient designs take the minimum-norm solution (SVD backend).
//! * Degree 1 with non-degenerate weighted spread is solved in closed form,
//!   accumulated around `x0` to limit cancellation. It agrees with the SVD
//!   solution whenever the design has full rank.
//!
//! ## Invariants
//!
//! * Points with weight `<= WEIGHT_TOLERANCE` never enter a fit.
//! * A local fit with fewer than `degree + 1` retained points is
//!   [`Prediction::Undefined`], never an error.

// External dependencies
use num_traits::Float;
use wide::{f32x8, f64x4};

// Internal dependencies
use crate::math::kernel::{check_bandwidth, WeightFunction};
use crate::math::linalg::FloatLinalg;
use crate::primitives::buffer::FitBuffer;
use crate::primitives::errors::RddError;

/// Points whose kernel weight does not exceed this value are dropped from a fit.
pub const WEIGHT_TOLERANCE: f64 = 1e-10;

/// Largest supported polynomial degree.
pub const MAX_DEGREE: usize = 20;

/// Reject degrees outside `1..=MAX_DEGREE`.
#[inline]
pub fn check_degree(degree: usize) -> Result<(), RddError> {
    if (1..=MAX_DEGREE).contains(&degree) {
        Ok(())
    } else {
        Err(RddError::InvalidDegree(degree))
    }
}

// ============================================================================
// Prediction
// ============================================================================

/// Result of a local prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Prediction<T> {
    /// Fitted value at the evaluation point.
    Value(T),

    /// Too few points carried positive weight to identify the polynomial.
    Undefined,
}

impl<T: Float> Prediction<T> {
    /// The fitted value, if defined.
    #[inline]
    pub fn value(self) -> Option<T> {
        match self {
            Prediction::Value(v) => Some(v),
            Prediction::Undefined => None,
        }
    }

    /// Returns `true` if a value was produced.
    #[inline]
    pub fn is_defined(&self) -> bool {
        matches!(self, Prediction::Value(_))
    }

    /// The fitted value, or NaN when undefined.
    #[inline]
    pub fn unwrap_or_nan(self) -> T {
        self.value().unwrap_or_else(T::nan)
    }
}

// ============================================================================
// Weighted Accumulation
// ============================================================================

/// Weighted sums `(Σw, Σw·dx, Σw·y, Σw·dx², Σw·dx·y)` with `dx = x - origin`.
pub type WeightedSums<T> = (T, T, T, T, T);

/// Scalar accumulation of weighted sums (generic Float).
#[inline]
pub fn accumulate_wls_scalar<T: Float>(x: &[T], y: &[T], weights: &[T], origin: T) -> WeightedSums<T> {
    let zero = T::zero();
    x.iter().zip(y).zip(weights).fold(
        (zero, zero, zero, zero, zero),
        |(s_w, s_wx, s_wy, s_wxx, s_wxy), ((&xi, &yi), &w)| {
            let dx = xi - origin;
            let wx = w * dx;
            (s_w + w, s_wx + wx, s_wy + w * yi, s_wxx + wx * dx, s_wxy + wx * yi)
        },
    )
}

/// SIMD accumulation of weighted sums (f64, four lanes).
pub fn accumulate_wls_simd_f64(x: &[f64], y: &[f64], weights: &[f64], origin: f64) -> WeightedSums<f64> {
    let lanes = 4;
    let x_chunks = x.chunks_exact(lanes);
    let y_chunks = y.chunks_exact(lanes);
    let w_chunks = weights.chunks_exact(lanes);

    let (x_tail, y_tail, w_tail) = (x_chunks.remainder(), y_chunks.remainder(), w_chunks.remainder());

    let o = f64x4::splat(origin);
    let mut s_w = f64x4::splat(0.0);
    let mut s_wx = f64x4::splat(0.0);
    let mut s_wy = f64x4::splat(0.0);
    let mut s_wxx = f64x4::splat(0.0);
    let mut s_wxy = f64x4::splat(0.0);

    for ((xc, yc), wc) in x_chunks.zip(y_chunks).zip(w_chunks) {
        let dx = f64x4::new([xc[0], xc[1], xc[2], xc[3]]) - o;
        let yv = f64x4::new([yc[0], yc[1], yc[2], yc[3]]);
        let w = f64x4::new([wc[0], wc[1], wc[2], wc[3]]);

        let wx = w * dx;
        s_w += w;
        s_wx += wx;
        s_wy += w * yv;
        s_wxx += wx * dx;
        s_wxy += wx * yv;
    }

    let (t_w, t_wx, t_wy, t_wxx, t_wxy) = accumulate_wls_scalar(x_tail, y_tail, w_tail, origin);

    (
        s_w.reduce_add() + t_w,
        s_wx.reduce_add() + t_wx,
        s_wy.reduce_add() + t_wy,
        s_wxx.reduce_add() + t_wxx,
        s_wxy.reduce_add() + t_wxy,
    )
}

/// SIMD accumulation of weighted sums (f32, eight lanes).
pub fn accumulate_wls_simd_f32(x: &[f32], y: &[f32], weights: &[f32], origin: f32) -> WeightedSums<f32> {
    let lanes = 8;
    let x_chunks = x.chunks_exact(lanes);
    let y_chunks = y.chunks_exact(lanes);
    let w_chunks = weights.chunks_exact(lanes);

    let (x_tail, y_tail, w_tail) = (x_chunks.remainder(), y_chunks.remainder(), w_chunks.remainder());

    let load = |c: &[f32]| f32x8::new([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]);

    let o = f32x8::splat(origin);
    let mut s_w = f32x8::splat(0.0);
    let mut s_wx = f32x8::splat(0.0);
    let mut s_wy = f32x8::splat(0.0);
    let mut s_wxx = f32x8::splat(0.0);
    let mut s_wxy = f32x8::splat(0.0);

    for ((xc, yc), wc) in x_chunks.zip(y_chunks).zip(w_chunks) {
        let dx = load(xc) - o;
        let yv = load(yc);
        let w = load(wc);

        let wx = w * dx;
        s_w += w;
        s_wx += wx;
        s_wy += w * yv;
        s_wxx += wx * dx;
        s_wxy += wx * yv;
    }

    let (t_w, t_wx, t_wy, t_wxx, t_wxy) = accumulate_wls_scalar(x_tail, y_tail, w_tail, origin);

    (
        s_w.reduce_add() + t_w,
        s_wx.reduce_add() + t_wx,
        s_wy.reduce_add() + t_wy,
        s_wxx.reduce_add() + t_wxx,
        s_wxy.reduce_add() + t_wxy,
    )
}

// ============================================================================
// Solver Trait
// ============================================================================

/// Trait for type-specific weighted least squares accumulation and solving.
pub trait WLSSolver: FloatLinalg {
    /// Accumulate weighted sums around `origin`.
    #[inline]
    fn accumulate_wls(x: &[Self], y: &[Self], weights: &[Self], origin: Self) -> WeightedSums<Self> {
        accumulate_wls_scalar(x, y, weights, origin)
    }

    /// Value of the weighted linear fit at `origin`.
    ///
    /// Returns `None` when the weighted spread of `x` does not exceed `tol`.
    #[inline]
    fn solve_linear_at_origin(sums: WeightedSums<Self>, tol: Self) -> Option<Self> {
        let (sum_w, sum_wx, sum_wy, sum_wxx, sum_wxy) = sums;
        if sum_w <= Self::zero() {
            return None;
        }

        let x_mean = sum_wx / sum_w;
        let y_mean = sum_wy / sum_w;
        let variance = sum_wxx - sum_wx * x_mean;

        if variance <= tol {
            return None;
        }

        let covariance = sum_wxy - sum_wx * y_mean;
        let slope = covariance / variance;

        Some(y_mean - slope * x_mean)
    }
}

impl WLSSolver for f64 {
    #[inline]
    fn accumulate_wls(x: &[f64], y: &[f64], weights: &[f64], origin: f64) -> WeightedSums<f64> {
        accumulate_wls_simd_f64(x, y, weights, origin)
    }
}

impl WLSSolver for f32 {
    #[inline]
    fn accumulate_wls(x: &[f32], y: &[f32], weights: &[f32], origin: f32) -> WeightedSums<f32> {
        accumulate_wls_simd_f32(x, y, weights, origin)
    }
}

// ============================================================================
// Local Polynomial Predictor
// ============================================================================

/// Kernel-weighted polynomial fit evaluated at a single point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPolynomial {
    degree: usize,
    weight_function: WeightFunction,
}

impl Default for LocalPolynomial {
    fn default() -> Self {
        Self {
            degree: 1,
            weight_function: WeightFunction::Triangle,
        }
    }
}

impl LocalPolynomial {
    /// Create a predictor of the given degree (`1..=MAX_DEGREE`) and kernel.
    pub fn new(degree: usize, weight_function: WeightFunction) -> Result<Self, RddError> {
        check_degree(degree)?;
        Ok(Self {
            degree,
            weight_function,
        })
    }

    /// Polynomial degree.
    #[inline]
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Kernel.
    #[inline]
    pub fn weight_function(&self) -> WeightFunction {
        self.weight_function
    }

    /// Predict the conditional mean of `y` at `x0`.
    pub fn predict<T: WLSSolver>(
        &self,
        x: &[T],
        y: &[T],
        x0: T,
        bandwidth: T,
    ) -> Result<Prediction<T>, RddError> {
        check_bandwidth(bandwidth)?;

        if x.len() != y.len() {
            return Err(RddError::MismatchedInputs {
                column: "y",
                expected: x.len(),
                got: y.len(),
            });
        }

        if !x0.is_finite() {
            return Err(RddError::InvalidNumericValue(format!(
                "x0={}",
                x0.to_f64().unwrap_or(f64::NAN)
            )));
        }

        let mut buffer = FitBuffer::with_capacity(x.len());
        Ok(self.predict_with_buffer(x, y, x0, bandwidth, &mut buffer))
    }

    /// Predict at `x0` reusing caller-owned scratch space.
    ///
    /// Arguments are not validated; `bandwidth` must be positive and finite.
    pub fn predict_with_buffer<T: WLSSolver>(
        &self,
        x: &[T],
        y: &[T],
        x0: T,
        bandwidth: T,
        buffer: &mut FitBuffer<T>,
    ) -> Prediction<T> {
        buffer.clear();

        let tolerance = T::from(WEIGHT_TOLERANCE).unwrap_or_else(T::epsilon);
        for (&xi, &yi) in x.iter().zip(y) {
            let w = self.weight_function.weight_at(xi, x0, bandwidth);
            if w > tolerance {
                buffer.weights.push(w);
                buffer.x.push(xi);
                buffer.y.push(yi);
            }
        }

        let n_coeffs = self.degree + 1;
        if buffer.x.len() < n_coeffs {
            return Prediction::Undefined;
        }

        if self.degree == 1 {
            let sums = T::accumulate_wls(&buffer.x, &buffer.y, &buffer.weights, x0);
            let abs_tol = T::from(1e-7).unwrap_or_else(T::epsilon);
            let rel_tol = T::epsilon() * bandwidth * bandwidth;
            if let Some(value) = T::solve_linear_at_origin(sums, abs_tol.max(rel_tol)) {
                return Prediction::Value(value);
            }
        }

        self.solve_weighted(x0, buffer)
    }

    /// Minimum-norm weighted fit on raw monomials, evaluated at `x0`.
    fn solve_weighted<T: WLSSolver>(&self, x0: T, buffer: &mut FitBuffer<T>) -> Prediction<T> {
        let n_coeffs = self.degree + 1;
        let n = buffer.x.len();

        for i in 0..n {
            let sw = buffer.weights[i].sqrt();
            let xi = buffer.x[i];
            let mut term = sw;
            for _ in 0..n_coeffs {
                buffer.design.push(term);
                term = term * xi;
            }
            buffer.target.push(sw * buffer.y[i]);
        }

        match T::lstsq(&buffer.design, &buffer.target, n, n_coeffs) {
            Some(beta) => Prediction::Value(horner(&beta, x0)),
            None => Prediction::Undefined,
        }
    }
}

/// Evaluate `Σ beta[k] x^k`.
#[inline]
fn horner<T: Float>(beta: &[T], x: T) -> T {
    beta.iter().rev().fold(T::zero(), |acc, &b| acc * x + b)
}

// ============================================================================
// Unweighted Polynomial Fit
// ============================================================================

/// Unweighted polynomial fit on `c = x - center`, optionally with a leading
/// indicator column.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit<T: Float> {
    /// Coefficient of the indicator column, if one was included.
    pub indicator: Option<T>,

    /// Coefficients of `c^0, c^1, ..., c^degree`.
    pub coefficients: Vec<T>,
}

impl<T: FloatLinalg> PolynomialFit<T> {
    /// Minimum-norm OLS of `y` on `[indicator, 1, c, ..., c^degree]`.
    ///
    /// Returns `None` when there are no observations.
    pub fn fit(
        x: &[T],
        y: &[T],
        center: T,
        degree: usize,
        indicator: Option<&[T]>,
    ) -> Option<Self> {
        let n = x.len();
        if n == 0 {
            return None;
        }

        let offset = usize::from(indicator.is_some());
        let cols = offset + degree + 1;

        let mut design = Vec::with_capacity(n * cols);
        for (i, &xi) in x.iter().enumerate() {
            if let Some(d) = indicator {
                design.push(d[i]);
            }
            let c = xi - center;
            let mut term = T::one();
            for _ in 0..=degree {
                design.push(term);
                term = term * c;
            }
        }

        let beta = T::lstsq(&design, y, n, cols)?;
        Some(Self {
            indicator: indicator.map(|_| beta[0]),
            coefficients: beta[offset..].to_vec(),
        })
    }

    /// Coefficient of `c^power` (zero beyond the fitted degree).
    #[inline]
    pub fn coefficient(&self, power: usize) -> T {
        self.coefficients.get(power).copied().unwrap_or_else(T::zero)
    }
}
