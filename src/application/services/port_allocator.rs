//! Shared port pool allocation.
//!
//! The pool is the set of currently allocated ports, persisted through a
//! [`PortStateStore`] so every orchestrator process observes the same state.
//! Allocation serializes the draw-check-mark sequence through a mutex so two
//! concurrent callers can never observe the same port as free.

use std::time::Duration;

use rand::Rng as _;
use tokio::sync::Mutex;

use crate::application::ports::PortStateStore;
use crate::domain::config::PortRange;
use crate::domain::error::PortPoolError;

/// Bound on allocation attempts before reporting pool exhaustion.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 64;

/// Delay between rejected draws.
const RETRY_DELAY: Duration = Duration::from_millis(50);

/// Hands out and reclaims ports from a configured range.
pub struct PortAllocator<S> {
    store: S,
    range: PortRange,
    max_attempts: u32,
    lock: Mutex<()>,
}

impl<S: PortStateStore> PortAllocator<S> {
    pub fn new(store: S, range: PortRange) -> Self {
        Self {
            store,
            range,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            lock: Mutex::new(()),
        }
    }

    /// Override the attempt budget (tests use small pools).
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draw a free port from the range, mark it allocated, and return it.
    ///
    /// # Errors
    ///
    /// Fails with [`PortPoolError::Exhausted`] when no free candidate is
    /// found within the attempt budget, or [`PortPoolError::Store`] when the
    /// shared set cannot be read or written.
    pub async fn allocate(&self) -> Result<u16, PortPoolError> {
        let _guard = self.lock.lock().await;
        for attempt in 1..=self.max_attempts {
            let candidate = self.draw();
            let mut ports = self.load().await?;
            if !ports.contains(&candidate) {
                ports.insert(candidate);
                self.save(&ports).await?;
                tracing::debug!(port = candidate, "allocated port");
                return Ok(candidate);
            }
            tracing::debug!(port = candidate, attempt, "port taken, redrawing");
            tokio::time::sleep(RETRY_DELAY).await;
        }
        Err(PortPoolError::Exhausted {
            min: self.range.min,
            max: self.range.max,
            attempts: self.max_attempts,
        })
    }

    /// Return a port to the pool. Releasing an untracked port is a no-op.
    ///
    /// # Errors
    ///
    /// Fails with [`PortPoolError::Store`] when the shared set cannot be
    /// read or written.
    pub async fn release(&self, port: u16) -> Result<(), PortPoolError> {
        let _guard = self.lock.lock().await;
        let mut ports = self.load().await?;
        if ports.remove(&port) {
            self.save(&ports).await?;
            tracing::debug!(port, "released port");
        }
        Ok(())
    }

    /// Whether `port` is currently free.
    ///
    /// # Errors
    ///
    /// Fails with [`PortPoolError::Store`] when the shared set cannot be
    /// read.
    pub async fn is_available(&self, port: u16) -> Result<bool, PortPoolError> {
        Ok(!self.load().await?.contains(&port))
    }

    fn draw(&self) -> u16 {
        rand::thread_rng().gen_range(self.range.min..=self.range.max)
    }

    async fn load(&self) -> Result<std::collections::BTreeSet<u16>, PortPoolError> {
        self.store
            .load()
            .await
            .map_err(|e| PortPoolError::Store(format!("{e:#}")))
    }

    async fn save(&self, ports: &std::collections::BTreeSet<u16>) -> Result<(), PortPoolError> {
        self.store
            .save(ports)
            .await
            .map_err(|e| PortPoolError::Store(format!("{e:#}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;
    use std::sync::Arc;

    use anyhow::Result;

    use super::*;

    #[derive(Default)]
    struct MemoryStore(std::sync::Mutex<BTreeSet<u16>>);

    impl PortStateStore for MemoryStore {
        async fn load(&self) -> Result<BTreeSet<u16>> {
            Ok(self.0.lock().expect("lock").clone())
        }
        async fn save(&self, ports: &BTreeSet<u16>) -> Result<()> {
            *self.0.lock().expect("lock") = ports.clone();
            Ok(())
        }
    }

    fn allocator(range: PortRange) -> PortAllocator<MemoryStore> {
        PortAllocator::new(MemoryStore::default(), range)
    }

    #[tokio::test(start_paused = true)]
    async fn allocated_port_is_in_range_and_no_longer_available() {
        let pool = allocator(PortRange {
            min: 9000,
            max: 9010,
        });
        let port = pool.allocate().await.expect("allocate");
        assert!((9000..=9010).contains(&port));
        assert!(!pool.is_available(port).await.expect("is_available"));
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_allocations_are_pairwise_distinct() {
        let pool = Arc::new(allocator(PortRange {
            min: 9000,
            max: 9063,
        }));
        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let pool = Arc::clone(&pool);
            tasks.spawn(async move { pool.allocate().await.expect("allocate") });
        }
        let mut seen = BTreeSet::new();
        while let Some(port) = tasks.join_next().await {
            let port = port.expect("join");
            assert!((9000..=9063).contains(&port));
            assert!(seen.insert(port), "port {port} handed out twice");
        }
        assert_eq!(seen.len(), 32);
    }

    #[tokio::test(start_paused = true)]
    async fn release_makes_the_port_eligible_again() {
        // A single-port range forces the allocator to hand the same port
        // back after release.
        let pool = allocator(PortRange {
            min: 9000,
            max: 9000,
        });
        let port = pool.allocate().await.expect("allocate");
        assert_eq!(port, 9000);
        pool.release(port).await.expect("release");
        assert!(pool.is_available(port).await.expect("is_available"));
        assert_eq!(pool.allocate().await.expect("re-allocate"), 9000);
        assert!(!pool.is_available(port).await.expect("is_available"));
    }

    #[tokio::test(start_paused = true)]
    async fn releasing_an_untracked_port_is_a_no_op() {
        let pool = allocator(PortRange {
            min: 9000,
            max: 9010,
        });
        pool.release(9005).await.expect("release");
        assert!(pool.is_available(9005).await.expect("is_available"));
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_pool_fails_after_the_attempt_budget() {
        let pool = allocator(PortRange {
            min: 9000,
            max: 9000,
        })
        .with_max_attempts(8);
        pool.allocate().await.expect("allocate");
        let err = pool.allocate().await.expect_err("expected Err");
        assert!(
            matches!(err, PortPoolError::Exhausted { attempts: 8, .. }),
            "{err}"
        );
    }
}
