//! Request throttling for the HTTP fetcher
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore
//! - Per-host concurrency limiting
//! - Respecting the minimum delay between requests to one host

use crate::config::CrawlerConfig;
use crate::state::DomainState;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Permits held for the duration of one request
///
/// Dropping it releases both the host slot and the global slot.
pub struct ScheduledFetch {
    _host_permit: OwnedSemaphorePermit,
    _global_permit: OwnedSemaphorePermit,
}

/// Per-host throttle
struct HostSlot {
    permits: Arc<Semaphore>,
    state: Mutex<DomainState>,
}

/// Scheduler gates every outgoing request
///
/// The scheduler coordinates:
/// - Global concurrency limits (requests in flight)
/// - Per-host concurrency limits
/// - Per-host politeness delay (minimum time between request starts)
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    global: Arc<Semaphore>,

    /// Per-host throttles, created on first use
    hosts: Mutex<HashMap<String, Arc<HostSlot>>>,

    /// Concurrent requests allowed per host
    per_host: usize,

    /// Minimum spacing between request starts on one host
    delay: Duration,
}

impl Scheduler {
    /// Creates a new scheduler from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        Self::with_limits(
            config.concurrent_requests as usize,
            config.concurrent_requests_per_domain as usize,
            config.download_delay(),
        )
    }

    /// Creates a scheduler with explicit limits
    pub fn with_limits(global: usize, per_host: usize, delay: Duration) -> Self {
        Self {
            global: Arc::new(Semaphore::new(global.max(1))),
            hosts: Mutex::new(HashMap::new()),
            per_host: per_host.max(1),
            delay,
        }
    }

    /// Waits until a request to `host` may start
    ///
    /// Order matters: the host slot is taken first, then the politeness delay
    /// is reserved and slept off, and only then a global slot is taken, so a
    /// request sleeping on a slow host never blocks requests to other hosts.
    ///
    /// # Returns
    ///
    /// * `Some(ScheduledFetch)` - Permits for one request
    /// * `None` - The scheduler's semaphores were closed
    pub async fn acquire(&self, host: &str) -> Option<ScheduledFetch> {
        let slot = self.slot(host);
        let host_permit = Arc::clone(&slot.permits).acquire_owned().await.ok()?;

        let wait = {
            let mut state = slot.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.reserve_slot(self.delay, Instant::now())
        };
        if !wait.is_zero() {
            tracing::trace!("Waiting {:?} before next request to {}", wait, host);
            tokio::time::sleep(wait).await;
        }

        let global_permit = Arc::clone(&self.global).acquire_owned().await.ok()?;

        Some(ScheduledFetch {
            _host_permit: host_permit,
            _global_permit: global_permit,
        })
    }

    /// Number of requests started against `host` so far
    pub fn requests_made(&self, host: &str) -> u32 {
        let hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        hosts
            .get(host)
            .map(|slot| {
                slot.state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .request_count
            })
            .unwrap_or(0)
    }

    fn slot(&self, host: &str) -> Arc<HostSlot> {
        let mut hosts = self.hosts.lock().unwrap_or_else(PoisonError::into_inner);
        let slot = hosts.entry(host.to_string()).or_insert_with(|| {
            Arc::new(HostSlot {
                permits: Arc::new(Semaphore::new(self.per_host)),
                state: Mutex::new(DomainState::new()),
            })
        });
        Arc::clone(slot)
    }
}
