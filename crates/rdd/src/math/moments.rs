//! Sample moments used by the plug-in bandwidth.

// External dependencies
use num_traits::Float;

/// Arithmetic mean. Returns `None` for an empty slice.
pub fn mean<T: Float>(values: &[T]) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let n = T::from(values.len())?;
    Some(values.iter().fold(T::zero(), |acc, &v| acc + v) / n)
}

/// Sum of squared deviations from the mean.
pub fn sum_squared_deviations<T: Float>(values: &[T]) -> T {
    match mean(values) {
        Some(m) => values
            .iter()
            .fold(T::zero(), |acc, &v| acc + (v - m) * (v - m)),
        None => T::zero(),
    }
}

/// Sample variance with an `n - 1` divisor. Returns `None` for fewer than two values.
pub fn sample_variance<T: Float>(values: &[T]) -> Option<T> {
    if values.len() < 2 {
        return None;
    }
    let dof = T::from(values.len() - 1)?;
    Some(sum_squared_deviations(values) / dof)
}

/// Sample standard deviation with an `n - 1` divisor.
#[inline]
pub fn sample_std<T: Float>(values: &[T]) -> Option<T> {
    sample_variance(values).map(Float::sqrt)
}

/// Median of an ascending slice; even counts average the two middle values.
pub fn median_sorted<T: Float>(sorted: &[T]) -> Option<T> {
    let n = sorted.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        Some(sorted[mid])
    } else {
        let two = T::one() + T::one();
        Some((sorted[mid - 1] + sorted[mid]) / two)
    }
}
