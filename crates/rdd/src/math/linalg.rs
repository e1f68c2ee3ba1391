//! Dense least-squares backend.
//!
//! ## Purpose
//!
//! This module bridges generic `Float` code to nalgebra's singular value
//! decomposition. Every regression in the crate (local polynomial fits,
//! plug-in curvature fits, the pooled treatment-effect regression) is solved
//! here.
//!
//! ## Design notes
//!
//! * Matrices cross the boundary as row-major slices plus a shape.
//! * SVD is used throughout so that rank-deficient designs yield the
//!   minimum-norm solution instead of an error.
//! * Singular values at or below `rcond * sigma_max` are treated as zero.
//!   [`FloatLinalg::lstsq`] uses `rcond = eps * max(rows, cols)`;
//!   [`FloatLinalg::ols`] uses `rcond = 1e-15` for the pseudo-inverse and
//!   `eps * max(rows, cols)` for the rank.
//!
//! ## Invariants
//!
//! * `a.len() == rows * cols` and `b.len() == rows`.
//!
//! ## Non-goals
//!
//! * Sparse or iterative solvers.

// External dependencies
use num_traits::Float;

// ============================================================================
// OLS Fit
// ============================================================================

/// Ordinary least-squares fit computed through the pseudo-inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit<T> {
    /// Coefficients `pinv(X) y`.
    pub coefficients: Vec<T>,
    /// `pinv(X) pinv(X)^T`, row-major `cols x cols`.
    pub normalized_cov: Vec<T>,
    /// Numerical rank of `X`.
    pub rank: usize,
    /// Residual sum of squares.
    pub rss: T,
}

impl<T: Copy> OlsFit<T> {
    /// Number of coefficients.
    #[inline]
    pub fn n_coefficients(&self) -> usize {
        self.coefficients.len()
    }

    /// Diagonal entry `i` of the normalized covariance.
    #[inline]
    pub fn normalized_variance(&self, i: usize) -> T {
        let k = self.coefficients.len();
        self.normalized_cov[i * k + i]
    }
}

// ============================================================================
// FloatLinalg Trait
// ============================================================================

/// Helper trait to bridge generic Float types to the nalgebra backend.
pub trait FloatLinalg: Float + 'static {
    /// Minimum-norm least-squares solution of `A beta = b`.
    fn lstsq(a: &[Self], b: &[Self], rows: usize, cols: usize) -> Option<Vec<Self>>;

    /// Pseudo-inverse OLS with rank and residual sum of squares.
    fn ols(a: &[Self], b: &[Self], rows: usize, cols: usize) -> Option<OlsFit<Self>>;
}

macro_rules! impl_float_linalg {
    ($t:ty) => {
        impl FloatLinalg for $t {
            #[inline]
            fn lstsq(a: &[Self], b: &[Self], rows: usize, cols: usize) -> Option<Vec<Self>> {
                let rcond = <$t>::EPSILON * rows.max(cols) as $t;
                nalgebra_backend::lstsq(a, b, rows, cols, rcond)
            }

            #[inline]
            fn ols(a: &[Self], b: &[Self], rows: usize, cols: usize) -> Option<OlsFit<Self>> {
                let rank_rcond = <$t>::EPSILON * rows.max(cols) as $t;
                nalgebra_backend::ols(a, b, rows, cols, 1e-15, rank_rcond)
            }
        }
    };
}

impl_float_linalg!(f64);
impl_float_linalg!(f32);

// ============================================================================
// Nalgebra Backend Implementation
// ============================================================================

/// Nalgebra-based linear algebra operations.
pub mod nalgebra_backend {
    use super::OlsFit;
    use nalgebra::{DMatrix, DVector, RealField};

    /// Minimum-norm least squares through the SVD.
    pub fn lstsq<T: RealField + Copy>(
        a: &[T],
        b: &[T],
        rows: usize,
        cols: usize,
        rcond: T,
    ) -> Option<Vec<T>> {
        if rows == 0 || cols == 0 {
            return None;
        }

        let x = DMatrix::from_row_slice(rows, cols, a);
        let y = DVector::from_column_slice(b);

        let svd = x.svd(true, true);
        let cutoff = rcond * largest(svd.singular_values.as_slice());

        svd.solve(&y, cutoff)
            .ok()
            .map(|beta: DVector<T>| beta.as_slice().to_vec())
    }

    /// OLS through the Moore-Penrose pseudo-inverse.
    pub fn ols<T: RealField + Copy>(
        a: &[T],
        b: &[T],
        rows: usize,
        cols: usize,
        pinv_rcond: T,
        rank_rcond: T,
    ) -> Option<OlsFit<T>> {
        if rows == 0 || cols == 0 {
            return None;
        }

        let x = DMatrix::from_row_slice(rows, cols, a);
        let y = DVector::from_column_slice(b);

        let svd = x.clone().svd(true, true);
        let sigma_max = largest(svd.singular_values.as_slice());
        let rank = svd.rank(rank_rcond * sigma_max);

        let pinv: DMatrix<T> = svd.pseudo_inverse(pinv_rcond * sigma_max).ok()?;
        let beta = &pinv * &y;
        let cov = &pinv * pinv.transpose();

        let residuals = &y - &x * &beta;
        let rss = residuals.norm_squared();

        let normalized_cov = (0..cols)
            .flat_map(|i| (0..cols).map(move |j| (i, j)))
            .map(|(i, j)| cov[(i, j)])
            .collect();

        Some(OlsFit {
            coefficients: beta.as_slice().to_vec(),
            normalized_cov,
            rank,
            rss,
        })
    }

    fn largest<T: RealField + Copy>(values: &[T]) -> T {
        values
            .iter()
            .fold(nalgebra::zero(), |m: T, &s| if s > m { s } else { m })
    }
}
