//! Kernel functions for local regression at a cutoff.
//!
//! ## Purpose
//!
//! This module turns the distance between an observation and an evaluation
//! point into a weight. The triangle kernel is the default and the only
//! kernel used by cross-validation and the plug-in bandwidth; Epanechnikov
//! and Uniform are available to the predictor and the effect estimator.
//!
//! ## Key concepts
//!
//! * **Scaled distance**: `u = (x - x0) / h`; every kernel vanishes for `|u| >= 1`.
//! * **Boundary constant**: the constant `C_K` of the MSE-optimal bandwidth of
//!   a local linear fit at a boundary point (Imbens and Kalyanaraman, Table 1).
//!
//! ## Invariants
//!
//! * Weights are non-negative and symmetric in `u`.
//! * A bandwidth is accepted only if positive and finite.
//!
//! ## Non-goals
//!
//! * Kernels with unbounded support.
//! * Normalizing weights to sum to one.

// External dependencies
use num_traits::Float;

// Internal dependencies
use crate::primitives::errors::RddError;

/// Kernel used to weight observations around an evaluation point.
///
/// | Kernel       | K(u)      | mu_2 | R(K) | C_K    |
/// |--------------|-----------|------|------|--------|
/// | Triangle     | 1 - \|u\| | 1/6  | 2/3  | 3.4375 |
/// | Epanechnikov | 3/4 (1 - u^2) | 1/5 | 3/5 | 3.1999 |
/// | Uniform      | 1/2       | 1/3  | 1/2  | 5.4000 |
///
/// Moments refer to the kernels normalized to integrate to one. Weights are
/// returned unnormalized since every fit is invariant to a constant factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WeightFunction {
    /// `1 - |u|`.
    #[default]
    Triangle,

    /// `1 - u^2`.
    Epanechnikov,

    /// `1`.
    Uniform,
}

impl WeightFunction {
    /// Display name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        match self {
            WeightFunction::Triangle => "Triangle",
            WeightFunction::Epanechnikov => "Epanechnikov",
            WeightFunction::Uniform => "Uniform",
        }
    }

    /// Support in units of the bandwidth.
    #[inline]
    pub fn support(&self) -> (f64, f64) {
        (-1.0, 1.0)
    }

    /// Second moment `mu_2 = ∫ u² K(u) du` of the normalized kernel.
    #[inline]
    pub fn second_moment(&self) -> f64 {
        match self {
            WeightFunction::Triangle => 1.0 / 6.0,
            WeightFunction::Epanechnikov => 1.0 / 5.0,
            WeightFunction::Uniform => 1.0 / 3.0,
        }
    }

    /// Roughness `R(K) = ∫ K(u)² du` of the normalized kernel.
    #[inline]
    pub fn roughness(&self) -> f64 {
        match self {
            WeightFunction::Triangle => 2.0 / 3.0,
            WeightFunction::Epanechnikov => 3.0 / 5.0,
            WeightFunction::Uniform => 1.0 / 2.0,
        }
    }

    /// Constant of the MSE-optimal boundary bandwidth of a local linear fit.
    #[inline]
    pub fn boundary_constant(&self) -> f64 {
        match self {
            WeightFunction::Triangle => 3.4375,
            WeightFunction::Epanechnikov => 3.1999,
            WeightFunction::Uniform => 5.4,
        }
    }

    /// Interior AMISE efficiency relative to Epanechnikov (which scores 1).
    ///
    /// ```text
    /// C(K) = R(K)^(4/5) * mu_2(K)^(2/5),  efficiency = C(K_E) / C(K)
    /// ```
    pub fn efficiency(&self) -> f64 {
        let amise = |k: &WeightFunction| k.roughness().powf(0.8) * k.second_moment().powf(0.4);
        amise(&WeightFunction::Epanechnikov) / amise(self)
    }

    /// Unnormalized kernel value at scaled distance `u`.
    #[inline]
    pub fn compute_weight<T: Float>(&self, u: T) -> T {
        let u = u.abs();
        if u >= T::one() {
            return T::zero();
        }

        match self {
            WeightFunction::Triangle => T::one() - u,
            WeightFunction::Epanechnikov => T::one() - u * u,
            WeightFunction::Uniform => T::one(),
        }
    }

    /// Weight of the point `xi` for a kernel centred at `x0`.
    ///
    /// The bandwidth is not checked here.
    #[inline]
    pub fn weight_at<T: Float>(&self, xi: T, x0: T, bandwidth: T) -> T {
        self.compute_weight((xi - x0) / bandwidth)
    }

    /// Weights of every point of `x` for a kernel centred at `x0`.
    pub fn weights<T: Float>(&self, x: &[T], x0: T, bandwidth: T) -> Result<Vec<T>, RddError> {
        check_bandwidth(bandwidth)?;
        Ok(x.iter().map(|&xi| self.weight_at(xi, x0, bandwidth)).collect())
    }
}

/// Reject non-positive or non-finite bandwidths.
#[inline]
pub fn check_bandwidth<T: Float>(bandwidth: T) -> Result<(), RddError> {
    if bandwidth.is_finite() && bandwidth > T::zero() {
        Ok(())
    } else {
        Err(RddError::InvalidBandwidth(bandwidth.to_f64().unwrap_or(f64::NAN)))
    }
}
