//! Rate-limited fan-out of per-item requests.
//!
//! Items are split into consecutive chunks of `requests_per_window`. Each
//! chunk is issued concurrently and awaited as a whole; the coordinator then
//! sleeps for `window` before starting the next chunk. There is no pause after
//! the final chunk and no queue between calls.
//!
//! A failed request fails the whole call: partial results are discarded.

use std::future::Future;
use std::time::Duration;

use futures::future::join_all;
use log::debug;

use crate::config::{DEFAULT_BATCH_PAUSE, DEFAULT_BATCH_SIZE};

/// Pacing of batched provider requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Requests issued concurrently per window (values below 1 are treated as 1)
    pub requests_per_window: usize,
    /// Pause between the end of one chunk and the start of the next
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(requests_per_window: usize, window: Duration) -> Self {
        Self {
            requests_per_window,
            window,
        }
    }

    fn chunk_size(&self) -> usize {
        self.requests_per_window.max(1)
    }

    /// Number of chunks `total` items are split into.
    pub fn chunk_count(&self, total: usize) -> usize {
        total.div_ceil(self.chunk_size())
    }
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            requests_per_window: DEFAULT_BATCH_SIZE,
            window: DEFAULT_BATCH_PAUSE,
        }
    }
}

/// Runs `fetch` for every item under `policy` and concatenates the results.
///
/// Results keep chunk order, and input order inside a chunk. Every request of a
/// chunk is allowed to settle before the first error (in input order) is
/// returned.
pub async fn run_in_batches<T, R, E, F, Fut>(
    items: &[T],
    policy: &RateLimitPolicy,
    mut fetch: F,
) -> Result<Vec<R>, E>
where
    F: FnMut(&T) -> Fut,
    Fut: Future<Output = Result<Vec<R>, E>>,
{
    let chunk_size = policy.chunk_size();
    let total_chunks = policy.chunk_count(items.len());
    let mut all_results = Vec::new();

    for (index, chunk) in items.chunks(chunk_size).enumerate() {
        debug!(
            "Starting batch {}/{} ({} requests)",
            index + 1,
            total_chunks,
            chunk.len()
        );

        let settled = join_all(chunk.iter().map(&mut fetch)).await;
        for result in settled {
            all_results.extend(result?);
        }

        if index + 1 < total_chunks {
            tokio::time::sleep(policy.window).await;
        }
    }

    Ok(all_results)
}
