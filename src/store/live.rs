//! Long-lived query state with stale-response protection.
//!
//! `LiveQuery` is the read-side state machine for data that outlives one
//! request: last good rows, last error and an in-flight flag. A failed
//! refetch keeps the previous rows visible alongside the error, and every
//! issued request carries a sequence number so a slow stale response can
//! never overwrite a fresher one.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use super::query::Query;
use super::{Store, StoreError};

/// Point-in-time view of a live query.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    /// `None` until the first successful load completes; never reset to
    /// `None` by later failures.
    pub data: Option<Vec<T>>,
    pub error: Option<String>,
    pub loading: bool,
}

#[derive(Debug)]
struct State<T> {
    data: Option<Vec<T>>,
    error: Option<String>,
    applied_seq: u64,
}

#[derive(Debug)]
pub struct LiveQuery<T> {
    collection: String,
    query: Query,
    issued: AtomicU64,
    state: RwLock<State<T>>,
}

impl<T> LiveQuery<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(collection: &str, query: Query) -> Self {
        Self {
            collection: collection.to_string(),
            query,
            issued: AtomicU64::new(0),
            state: RwLock::new(State {
                data: None,
                error: None,
                applied_seq: 0,
            }),
        }
    }

    /// Issue one real fetch; there is no caching short-circuit. The newest
    /// issued request wins regardless of completion order.
    pub async fn refetch(&self, store: &Store) {
        let seq = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        let result = store.select::<T>(&self.collection, &self.query).await;
        let mut state = self.state.write().await;
        apply(&mut state, seq, result);
    }

    pub async fn snapshot(&self) -> Snapshot<T> {
        let state = self.state.read().await;
        Snapshot {
            data: state.data.clone(),
            error: state.error.clone(),
            loading: self.issued.load(Ordering::SeqCst) > state.applied_seq,
        }
    }
}

/// Apply one response to the state. Separated out so the ordering rules are
/// testable without a server: responses older than the last applied one are
/// dropped, errors keep stale data.
fn apply<T>(state: &mut State<T>, seq: u64, result: Result<Vec<T>, StoreError>) {
    if seq <= state.applied_seq {
        return;
    }
    state.applied_seq = seq;
    match result {
        Ok(rows) => {
            state.data = Some(rows);
            state.error = None;
        }
        Err(e) => {
            state.error = Some(e.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> State<u32> {
        State {
            data: None,
            error: None,
            applied_seq: 0,
        }
    }

    fn query_error(message: &str) -> StoreError {
        StoreError::Request(message.to_string())
    }

    #[test]
    fn test_data_is_none_before_first_success() {
        let mut state = fresh();
        apply(&mut state, 1, Err(query_error("boom")));
        assert!(state.data.is_none());
        assert!(state.error.is_some());
    }

    #[test]
    fn test_failed_refetch_keeps_stale_data_and_sets_error() {
        let mut state = fresh();
        apply(&mut state, 1, Ok(vec![1, 2, 3]));
        apply(&mut state, 2, Err(query_error("store down")));
        assert_eq!(state.data, Some(vec![1, 2, 3]));
        assert_eq!(
            state.error.as_deref(),
            Some("store request failed: store down")
        );
    }

    #[test]
    fn test_success_clears_previous_error() {
        let mut state = fresh();
        apply(&mut state, 1, Err(query_error("blip")));
        apply(&mut state, 2, Ok(vec![9]));
        assert_eq!(state.data, Some(vec![9]));
        assert!(state.error.is_none());
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut state = fresh();
        // Request 2 resolves first; the slow response for request 1 must
        // not overwrite it.
        apply(&mut state, 2, Ok(vec![20]));
        apply(&mut state, 1, Ok(vec![10]));
        assert_eq!(state.data, Some(vec![20]));
    }

    #[test]
    fn test_stale_error_cannot_clobber_fresh_data() {
        let mut state = fresh();
        apply(&mut state, 2, Ok(vec![20]));
        apply(&mut state, 1, Err(query_error("late failure")));
        assert_eq!(state.data, Some(vec![20]));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_new_live_query_snapshot_is_idle_and_empty() {
        let live: LiveQuery<u32> = LiveQuery::new("site_settings", Query::new());
        let snapshot = live.snapshot().await;
        assert!(snapshot.data.is_none());
        assert!(snapshot.error.is_none());
        assert!(!snapshot.loading);
    }
}
