//! Request deduplication
//!
//! Pages that need overlapping data (several dashboards list rooms, for
//! example) go through one [`RequestCache`]. Concurrent fetches of the same
//! endpoint with the same token share a single in-flight request, and
//! successful responses are reused until the TTL runs out.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use super::error::{ClientError, ClientResult};
use super::Backend;

type SharedFetch = Shared<BoxFuture<'static, ClientResult<Arc<Value>>>>;

/// Responses are only ever shared between callers holding the same token
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    endpoint: String,
    token: Option<String>,
}

#[derive(Default)]
struct CacheState {
    next_id: u64,
    in_flight: HashMap<CacheKey, (u64, SharedFetch)>,
    ready: HashMap<CacheKey, (Instant, Arc<Value>)>,
    stats: CacheStats,
}

impl CacheState {
    fn is_current(&self, key: &CacheKey, id: u64) -> bool {
        self.in_flight.get(key).map(|(current, _)| *current) == Some(id)
    }
}

/// One caller waiting on an in-flight request
///
/// Dropping the last waiter before the request finishes retires the request,
/// so a later fetch of the same key starts afresh instead of joining a
/// request nobody is polling.
struct Waiter<'a> {
    cache: &'a RequestCache,
    key: CacheKey,
    id: u64,
    request: Option<SharedFetch>,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        // Release our handle before counting the remaining ones
        drop(self.request.take());

        let mut state = self.cache.state();
        if !state.is_current(&self.key, self.id) {
            return;
        }
        let abandoned = state
            .in_flight
            .get(&self.key)
            .and_then(|(_, request)| request.strong_count())
            == Some(1);
        if abandoned {
            state.in_flight.remove(&self.key);
            tracing::debug!(endpoint = %self.key.endpoint, "Abandoned request dropped");
        }
    }
}

/// Counters for cache behaviour
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Served from a retained response
    pub hits: u64,
    /// Joined a request already in flight
    pub joined: u64,
    /// Sent a new request to the backend
    pub misses: u64,
}

/// Deduplicating front for a [`Backend`]
pub struct RequestCache {
    backend: Arc<dyn Backend>,
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl RequestCache {
    /// `ttl` of zero disables retention; in-flight sharing still applies
    pub fn new(backend: Arc<dyn Backend>, ttl: Duration) -> Self {
        Self {
            backend,
            ttl,
            state: Mutex::new(CacheState::default()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        &self.backend
    }

    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch `endpoint`, sharing work with identical concurrent requests
    pub async fn fetch(&self, endpoint: &str, token: Option<&str>) -> ClientResult<Arc<Value>> {
        let key = CacheKey {
            endpoint: endpoint.to_string(),
            token: token.map(str::to_string),
        };

        let (id, request) = {
            let mut state = self.state();

            if let Some((stored_at, value)) = state.ready.get(&key) {
                if stored_at.elapsed() < self.ttl {
                    let value = Arc::clone(value);
                    state.stats.hits += 1;
                    return Ok(value);
                }
            }

            if let Some((id, request)) = state.in_flight.get(&key) {
                let joined = (*id, request.clone());
                state.stats.joined += 1;
                joined
            } else {
                let backend = Arc::clone(&self.backend);
                let owned = key.clone();
                let request = async move {
                    backend
                        .fetch(&owned.endpoint, owned.token.as_deref())
                        .await
                        .map(Arc::new)
                }
                .boxed()
                .shared();

                let id = state.next_id;
                state.next_id += 1;
                state.in_flight.insert(key.clone(), (id, request.clone()));
                state.stats.misses += 1;
                (id, request)
            }
        };

        let mut waiter = Waiter {
            cache: self,
            key,
            id,
            request: Some(request),
        };
        let result = match waiter.request.as_mut() {
            Some(request) => request.await,
            None => Err(ClientError::Cancelled),
        };

        let mut state = self.state();
        // Only the request we joined may be retired; invalidate() may have
        // dropped it and a newer one taken its place.
        if state.is_current(&waiter.key, id) {
            state.in_flight.remove(&waiter.key);
            if let Ok(value) = &result {
                if !self.ttl.is_zero() {
                    let ttl = self.ttl;
                    state.ready.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
                    state
                        .ready
                        .insert(waiter.key.clone(), (Instant::now(), Arc::clone(value)));
                }
            }
        }

        result
    }

    /// Forget retained responses and detach in-flight requests
    pub fn invalidate(&self) {
        let mut state = self.state();
        state.in_flight.clear();
        state.ready.clear();
        tracing::debug!("Request cache invalidated");
    }

    pub fn stats(&self) -> CacheStats {
        self.state().stats
    }
}
