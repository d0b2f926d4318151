//! Independent runs executed side by side.
//!
//! A single chain is strictly sequential. Separate runs share nothing, so a
//! parameter grid is spread over a bounded worker pool.

use rayon::{ThreadPoolBuilder, prelude::*};
use tracing::info;

use crate::error::{Error, Result};

/// Run `f` on every task using at most `max_workers` threads.
/// Results come back in task order.
pub fn run_sweep<T, R, F>(tasks: &[T], max_workers: usize, f: F) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync,
{
    if max_workers == 0 {
        return Err(Error::config("max_workers", max_workers, "must be at least 1"));
    }

    let workers = max_workers.min(tasks.len().max(1));
    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|err| Error::config("max_workers", max_workers, err.to_string()))?;

    info!(tasks = tasks.len(), workers, "starting sweep");
    Ok(pool.install(|| tasks.par_iter().map(&f).collect()))
}
