/* This file is part of the learnvid project
*
*  Copyright (C) 2026 the learnvid contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{collections::HashMap, fmt::Display, sync::{atomic::{AtomicU64, Ordering::Relaxed}, Arc}, time::{Duration, Instant}};

use cloneable_errors::ErrorContext;
use futures::{future::{BoxFuture, Shared}, lock::Mutex, FutureExt};
use learnvid_api::RcStr;
use log::{debug, warn};

/// Identifies one cached request, e.g. `videoStatus/<user>/<video>`
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct QueryKey(Box<[RcStr]>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> QueryKey
    where I: IntoIterator<Item = S>,
          S: Into<RcStr>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len() && self.0.iter().zip(prefix).all(|(seg, pre)| **seg == **pre)
    }
}

impl Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("/"))
    }
}

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, ErrorContext>>>;

#[derive(Clone)]
enum FetchState<V> {
    Pending {
        /// distinguishes this fetch from any later one for the same key
        generation: u64,
        future: SharedFetch<V>,
    },
    Ready {
        value: V,
        fetched_at: Instant,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub total: usize,
    pub pending: usize,
    pub fresh: usize,
    pub stale: usize,
}

/// Request cache shared between all clones
///
/// Values are served until they are older than the freshness window, concurrent requests for
/// the same key share a single fetch, and failed fetches are never stored.
pub struct QueryCache<V> {
    inner: Arc<InnerCache<V>>,
}

struct InnerCache<V> {
    entries: Mutex<HashMap<QueryKey, FetchState<V>>>,
    freshness: Duration,
    next_generation: AtomicU64,
}

impl<V> Clone for QueryCache<V> {
    fn clone(&self) -> Self {
        QueryCache { inner: self.inner.clone() }
    }
}

impl<V> QueryCache<V>
where V: Clone + Send + Sync + 'static,
{
    pub fn new(freshness: Duration) -> QueryCache<V> {
        QueryCache {
            inner: Arc::new(InnerCache {
                entries: Mutex::default(),
                freshness,
                next_generation: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the cached value for `key`, or runs `fetch` if there is no fresh one
    ///
    /// `fetch` is not called when another request for the same key is already in flight.
    pub async fn get_or_fetch<F>(&self, key: QueryKey, fetch: F) -> Result<V, ErrorContext>
    where F: FnOnce() -> BoxFuture<'static, Result<V, ErrorContext>>,
    {
        let future = {
            let mut entries = self.inner.entries.lock().await;
            match entries.get(&key) {
                Some(FetchState::Ready { value, fetched_at }) if fetched_at.elapsed() < self.inner.freshness => {
                    debug!("Query cache hit for {key}");
                    return Ok(value.clone());
                },
                Some(FetchState::Pending { future, .. }) => {
                    debug!("Joining in-flight request for {key}");
                    future.clone()
                },
                _ => {
                    debug!("Fetching {key}");
                    let generation = self.inner.next_generation.fetch_add(1, Relaxed);
                    let future = self.clone()
                        .fetch_and_store(key.clone(), generation, fetch())
                        .boxed()
                        .shared();
                    entries.insert(key, FetchState::Pending { generation, future: future.clone() });
                    future
                },
            }
        };
        future.await
    }

    /// Internal function that awaits a fetch and records the result if the entry is still ours
    async fn fetch_and_store(self, key: QueryKey, generation: u64, fetch: BoxFuture<'static, Result<V, ErrorContext>>) -> Result<V, ErrorContext> {
        let result = fetch.await;
        let mut entries = self.inner.entries.lock().await;
        let still_current = matches!(entries.get(&key), Some(FetchState::Pending { generation: g, .. }) if *g == generation);
        if !still_current {
            debug!("Discarding result for {key}, it was invalidated while in flight");
            return result;
        }
        match result {
            Ok(ref value) => {
                entries.insert(key, FetchState::Ready { value: value.clone(), fetched_at: Instant::now() });
            },
            Err(ref err) => {
                warn!("Request for {key} failed: {err}");
                entries.remove(&key);
            },
        }
        result
    }

    /// Returns the stored value for `key` regardless of its age
    pub async fn cached(&self, key: &QueryKey) -> Option<V> {
        match self.inner.entries.lock().await.get(key) {
            Some(FetchState::Ready { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }

    /// Drops every entry whose key starts with `prefix`, including in-flight ones
    ///
    /// Returns the number of dropped entries
    pub async fn invalidate(&self, prefix: &[&str]) -> usize {
        let mut entries = self.inner.entries.lock().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        debug!("Invalidated {removed} entries under {}", prefix.join("/"));
        removed
    }

    /// Clears all cached entries, except pending requests
    ///
    /// Returns the number of cleared entries
    pub async fn clear(&self) -> usize {
        let mut entries = self.inner.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, v| matches!(v, FetchState::Pending { .. }));
        before - entries.len()
    }

    pub async fn stats(&self) -> CacheStats {
        let freshness = self.inner.freshness;
        self.inner.entries.lock().await.values().fold(CacheStats::default(), |mut stats, v| {
            stats.total += 1;
            match v {
                FetchState::Pending { .. } => stats.pending += 1,
                FetchState::Ready { fetched_at, .. } if fetched_at.elapsed() < freshness => stats.fresh += 1,
                FetchState::Ready { .. } => stats.stale += 1,
            }
            stats
        })
    }
}
