//! Bounded-concurrency batch resolution.
//!
//! A fixed pool of worker tasks pulls indices from a shared cursor over the
//! input list, so at most `concurrency_limit` resolutions are in flight and
//! each result lands in the slot of its input. The first failure aborts the
//! remaining workers and fails the whole batch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info};

use super::{Resolution, Resolver};
use crate::config::{BatchConfig, DEFAULT_CONCURRENCY_LIMIT};
use crate::error::{Error, Result};
use crate::providers::{SpatialLookup, TextLookup};

#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Maximum resolutions in flight. Zero is treated as one.
    pub concurrency_limit: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
        }
    }
}

impl From<&BatchConfig> for BatchOptions {
    fn from(config: &BatchConfig) -> Self {
        Self {
            concurrency_limit: config.concurrency_limit,
        }
    }
}

/// Resolve every address in `addresses`, returning results in input order.
///
/// Dropping the returned future aborts all outstanding lookups.
pub async fn resolve_many<T, S>(
    resolver: Arc<Resolver<T, S>>,
    addresses: &[String],
    options: BatchOptions,
) -> Result<Vec<Resolution>>
where
    T: TextLookup + 'static,
    S: SpatialLookup + 'static,
{
    if addresses.is_empty() {
        return Ok(Vec::new());
    }

    let tasks: Arc<[String]> = Arc::from(addresses);
    let cursor = Arc::new(AtomicUsize::new(0));
    let workers = options.concurrency_limit.max(1).min(tasks.len());

    info!(
        "Resolving {} addresses with {} workers",
        tasks.len(),
        workers
    );

    let mut pool = JoinSet::new();
    for worker in 0..workers {
        let resolver = Arc::clone(&resolver);
        let tasks = Arc::clone(&tasks);
        let cursor = Arc::clone(&cursor);

        pool.spawn(async move {
            let mut finished = Vec::new();
            loop {
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(address) = tasks.get(index) else {
                    break;
                };
                debug!("worker {} resolving #{}: {}", worker, index, address);
                finished.push((index, resolver.resolve(address).await?));
            }
            Ok::<_, Error>(finished)
        });
    }

    let mut slots: Vec<Option<Resolution>> = std::iter::repeat_with(|| None)
        .take(tasks.len())
        .collect();

    while let Some(joined) = pool.join_next().await {
        let finished = match joined {
            Ok(Ok(finished)) => finished,
            Ok(Err(e)) => {
                pool.abort_all();
                return Err(e);
            }
            Err(e) => {
                pool.abort_all();
                return Err(Error::Worker(e.to_string()));
            }
        };

        for (index, resolution) in finished {
            slots[index] = Some(resolution);
        }
    }

    info!("Resolved {} addresses", tasks.len());

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| slot.ok_or_else(|| Error::Worker(format!("no result for address #{}", i))))
        .collect()
}
