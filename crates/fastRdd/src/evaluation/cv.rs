//! Parallel cross-validation for bandwidth selection.
//!
//! ## Purpose
//!
//! This module scores the candidate bandwidths of the one-sided
//! leave-one-out cross-validation concurrently, one candidate per task.
//!
//! ## Design notes
//!
//! * **Parallelism**: Uses `rayon` to evaluate candidates in parallel.
//! * **Integration**: Plugs into the executor via the `CVPassFn` hook.
//! * **Buffers**: Each worker thread owns one `CVBuffer`, reused across the
//!   candidates it scores.
//!
//! ## Invariants
//!
//! * Scores are returned in grid order, so the argmin (and its tie-break)
//!   matches the sequential pass exactly.
//!
//! ## Non-goals
//!
//! * This module does not implement the scoring logic (delegated to `rdd`).
//! * This module does not select the bandwidth (delegated to `rdd`).

// External dependencies
use log::debug;
use rayon::prelude::*;

// Export dependencies from rdd crate
use rdd::internals::algorithms::regression::WLSSolver;
use rdd::internals::evaluation::cv::{score_candidate, CandidateScore};
use rdd::internals::primitives::buffer::CVBuffer;
use rdd::internals::primitives::sample::SideSplit;

/// Score every candidate bandwidth in parallel.
pub fn cv_pass_parallel<T>(split: &SideSplit<T>, grid: &[T], min_num_obs: usize) -> Vec<CandidateScore<T>>
where
    T: WLSSolver + Send + Sync,
{
    debug!(
        "parallel cv: {} candidates on {} threads",
        grid.len(),
        rayon::current_num_threads()
    );

    grid.par_iter()
        .map_init(CVBuffer::new, |buffer, &h| {
            score_candidate(split, h, min_num_obs, buffer)
        })
        .collect()
}
