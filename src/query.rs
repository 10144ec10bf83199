//! Query cache - holds the latest fetched collection per logical key.
//!
//! Each key moves through loading → ready/failed. Cached data is served
//! until it is older than the staleness window or explicitly invalidated;
//! nothing refreshes in the background.
//!
//! Every fetch takes a ticket from a monotonic counter. A response is only
//! applied when its ticket is newer than the one already applied, so when
//! two refetches for the same key overlap, the one issued last wins no
//! matter which completes first.

use crate::errors::Result;
use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, trace, warn};

/// Point-in-time view of one cached query.
#[derive(Debug)]
pub struct QuerySnapshot<T> {
    /// A request newer than the applied data is still in flight
    pub loading: bool,
    /// Last successfully fetched records
    pub data: Option<Arc<Vec<T>>>,
    /// Message of the last failed fetch, cleared by the next success
    pub error: Option<String>,
}

impl<T> Default for QuerySnapshot<T> {
    fn default() -> Self {
        Self {
            loading: false,
            data: None,
            error: None,
        }
    }
}

impl<T> Clone for QuerySnapshot<T> {
    fn clone(&self) -> Self {
        Self {
            loading: self.loading,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

struct Entry<T> {
    latest_issued: u64,
    applied: u64,
    data: Option<Arc<Vec<T>>>,
    error: Option<String>,
    fetched_at: Option<Instant>,
}

impl<T> Entry<T> {
    const fn new() -> Self {
        Self {
            latest_issued: 0,
            applied: 0,
            data: None,
            error: None,
            fetched_at: None,
        }
    }

    fn snapshot(&self) -> QuerySnapshot<T> {
        QuerySnapshot {
            loading: self.latest_issued > self.applied,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }

    fn is_fresh(&self, stale_after: Duration) -> bool {
        self.data.is_some() && self.fetched_at.is_some_and(|at| at.elapsed() < stale_after)
    }
}

/// Per-key cache of fetched collections.
pub struct QueryCache<T> {
    entries: RwLock<HashMap<String, Entry<T>>>,
    next_ticket: AtomicU64,
    stale_after: Duration,
}

impl<T> QueryCache<T> {
    /// Creates an empty cache whose entries go stale after `stale_after`.
    #[must_use]
    pub fn new(stale_after: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            next_ticket: AtomicU64::new(0),
            stale_after,
        }
    }

    /// Current state for `key` without fetching.
    pub async fn snapshot(&self, key: &str) -> QuerySnapshot<T> {
        self.entries
            .read()
            .await
            .get(key)
            .map(Entry::snapshot)
            .unwrap_or_default()
    }

    /// Returns fresh cached data for `key`, fetching only when the entry is
    /// missing, stale or invalidated.
    pub async fn get<F, Fut>(&self, key: &str, fetcher: F) -> QuerySnapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key).filter(|e| e.is_fresh(self.stale_after)) {
                trace!("Serving '{}' from cache", key);
                return entry.snapshot();
            }
        }
        self.refetch(key, fetcher).await
    }

    /// Re-runs the fetch for `key` and applies the result unless a newer
    /// request has already been applied.
    pub async fn refetch<F, Fut>(&self, key: &str, fetcher: F) -> QuerySnapshot<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        let ticket = self.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let mut entries = self.entries.write().await;
            let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
            entry.latest_issued = entry.latest_issued.max(ticket);
        }

        let result = fetcher().await;

        let mut entries = self.entries.write().await;
        let entry = entries.entry(key.to_string()).or_insert_with(Entry::new);
        if ticket > entry.applied {
            entry.applied = ticket;
            match result {
                Ok(rows) => {
                    debug!("Query '{}' refreshed with {} rows", key, rows.len());
                    entry.data = Some(Arc::new(rows));
                    entry.error = None;
                    entry.fetched_at = Some(Instant::now());
                }
                Err(e) => {
                    warn!("Query '{}' failed: {}", key, e);
                    entry.error = Some(e.to_string());
                }
            }
        } else {
            debug!(
                "Discarding response {} for '{}', {} already applied",
                ticket, key, entry.applied
            );
        }
        entry.snapshot()
    }

    /// Marks `key` stale so the next [`QueryCache::get`] fetches again.
    pub async fn invalidate(&self, key: &str) {
        if let Some(entry) = self.entries.write().await.get_mut(key) {
            entry.fetched_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::errors::Error;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn test_first_fetch_populates_entry() {
        let cache: QueryCache<i32> = QueryCache::new(Duration::from_secs(60));
        assert!(cache.snapshot("badges").await.data.is_none());

        let snapshot = cache.get("badges", || async { Ok(vec![1, 2, 3]) }).await;
        assert!(!snapshot.loading);
        assert_eq!(*snapshot.data.unwrap(), vec![1, 2, 3]);
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_get_serves_fresh_data_without_fetching() {
        let cache: QueryCache<i32> = QueryCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .get("users", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![7])
                })
                .await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        cache.invalidate("users").await;
        cache
            .get("users", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(vec![8])
            })
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_entry_is_refetched() {
        let cache: QueryCache<i32> = QueryCache::new(Duration::ZERO);
        cache.get("trips", || async { Ok(vec![1]) }).await;
        let snapshot = cache.get("trips", || async { Ok(vec![2]) }).await;
        assert_eq!(*snapshot.data.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn test_failed_refetch_keeps_previous_data() {
        let cache: QueryCache<i32> = QueryCache::new(Duration::from_secs(60));
        cache.refetch("badges", || async { Ok(vec![1]) }).await;

        let snapshot = cache
            .refetch("badges", || async { Err(Error::Database("offline".to_string())) })
            .await;
        assert_eq!(*snapshot.data.unwrap(), vec![1]);
        assert_eq!(snapshot.error.as_deref(), Some("Database error: offline"));

        let snapshot = cache.refetch("badges", || async { Ok(vec![2]) }).await;
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_later_request_wins_over_slower_earlier_one() {
        let cache: Arc<QueryCache<i32>> = Arc::new(QueryCache::new(Duration::from_secs(60)));
        let (slow_tx, slow_rx) = oneshot::channel::<Vec<i32>>();

        let slow = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                cache
                    .refetch("certificates", || async move { Ok(slow_rx.await.unwrap()) })
                    .await
            })
        };
        // Let the slow request take its ticket and block on the channel.
        tokio::task::yield_now().await;
        assert!(cache.snapshot("certificates").await.loading);

        let fast = cache
            .refetch("certificates", || async { Ok(vec![2]) })
            .await;
        assert!(!fast.loading);
        assert_eq!(*fast.data.unwrap(), vec![2]);

        slow_tx.send(vec![1]).unwrap();
        let slow_snapshot = slow.await.unwrap();
        assert_eq!(*slow_snapshot.data.unwrap(), vec![2]);
        assert_eq!(
            *cache.snapshot("certificates").await.data.unwrap(),
            vec![2]
        );
    }
}
