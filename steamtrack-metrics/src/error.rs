//! Reducer errors.
//!
//! These never leave the crate: [`compute_metric`](crate::compute_metric)
//! turns them into a cleared result.

use steamtrack_core::CoreError;
use steamtrack_fetch::FetchError;
use thiserror::Error;

/// Why a reducer could not produce a result.
#[derive(Debug, Error)]
pub enum ReduceError {
    /// The metric's primary gateway call failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Attributes could not be assembled.
    #[error(transparent)]
    Core(#[from] CoreError),
}
