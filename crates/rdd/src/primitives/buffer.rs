//! Reusable scratch memory for local fits and cross-validation.
//!
//! ## Purpose
//!
//! Cross-validation issues one local prediction per evaluation point and per
//! candidate bandwidth. This module provides workspaces that are allocated once
//! and recycled across those predictions, so the inner loop does not allocate.
//!
//! ## Design notes
//!
//! * **Explicit ownership**: Buffers are passed by `&mut`, which lets parallel
//!   callers hold one buffer per worker.
//! * **Lazy Expansion**: Buffers grow on demand and are never shrunk.
//!
//! ## Key concepts
//!
//! * **FitBuffer**: Kernel weights and the retained subset of a single local fit.
//! * **CVBuffer**: Training subset for one leave-one-out prediction plus the
//!   fit workspace used to score it.
//!
//! ## Invariants
//!
//! * Buffers are only logically cleared between uses, never deallocated.
//!
//! ## Non-goals
//!
//! * Thread-local caching.

// ============================================================================
// Fit Buffer
// ============================================================================

/// Scratch space for a single local polynomial fit.
#[derive(Debug, Clone)]
pub struct FitBuffer<T> {
    /// Kernel weights of the retained points.
    pub weights: Vec<T>,
    /// Retained x-values.
    pub x: Vec<T>,
    /// Retained y-values.
    pub y: Vec<T>,
    /// Row-major weighted design matrix.
    pub design: Vec<T>,
    /// Weighted targets.
    pub target: Vec<T>,
}

impl<T> Default for FitBuffer<T> {
    fn default() -> Self {
        Self {
            weights: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            design: Vec::new(),
            target: Vec::new(),
        }
    }
}

impl<T> FitBuffer<T> {
    /// Create a buffer pre-allocated for `n` points.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            weights: Vec::with_capacity(n),
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
            design: Vec::new(),
            target: Vec::with_capacity(n),
        }
    }

    /// Clear all slots (preserves capacity).
    pub fn clear(&mut self) {
        self.weights.clear();
        self.x.clear();
        self.y.clear();
        self.design.clear();
        self.target.clear();
    }
}

// ============================================================================
// CV Buffers
// ============================================================================

/// Buffers used during cross-validation to hold the training subset.
#[derive(Debug, Clone)]
pub struct CVBuffer<T> {
    /// Training subset x-values.
    pub train_x: Vec<T>,
    /// Training subset y-values.
    pub train_y: Vec<T>,
    /// Workspace for the local fit on the training subset.
    pub fit: FitBuffer<T>,
}

impl<T> Default for CVBuffer<T> {
    fn default() -> Self {
        Self {
            train_x: Vec::new(),
            train_y: Vec::new(),
            fit: FitBuffer::default(),
        }
    }
}

impl<T> CVBuffer<T> {
    /// Create a new, empty CV buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure sufficient capacity for a side of `n_side` points.
    pub fn ensure_capacity(&mut self, n_side: usize) {
        if self.train_x.capacity() < n_side {
            self.train_x.reserve(n_side - self.train_x.len());
        }
        if self.train_y.capacity() < n_side {
            self.train_y.reserve(n_side - self.train_y.len());
        }
    }

    /// Clear the training subset (preserves capacity).
    pub fn clear(&mut self) {
        self.train_x.clear();
        self.train_y.clear();
    }
}
