//! Server-State Query Cache
//!
//! Responses are cached as JSON under a [`QueryKey`] for the configured
//! stale time. Mutations invalidate a key prefix; the version signal bumps
//! so every mounted query re-runs, and only the dropped keys hit the
//! network again.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::{ActivityQuery, ApiError};
use crate::cache::{Clock, SystemClock, TtlCache};
use crate::models::{AuditLogQuery, ItemQuery, ProcurementQuery};

const SEPARATOR: &str = "\u{1f}";

// ========================
// Keys
// ========================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn with(mut self, segment: impl Into<String>) -> Self {
        self.0.push(segment.into());
        self
    }

    /// Append parameters as one JSON segment
    pub fn with_params<P: Serialize>(self, params: &P) -> Self {
        let segment = serde_json::to_string(params).unwrap_or_default();
        self.with(segment)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    fn cache_key(&self) -> String {
        self.0.join(SEPARATOR)
    }
}

fn key_matches(cache_key: &str, prefix: &QueryKey) -> bool {
    let parsed = QueryKey::new(cache_key.split(SEPARATOR));
    parsed.starts_with(prefix)
}

/// Keys used across the app
pub mod keys {
    use super::*;

    pub fn items() -> QueryKey {
        QueryKey::new(["items"])
    }

    pub fn items_list(query: &ItemQuery) -> QueryKey {
        items().with("list").with_params(query)
    }

    pub fn stale_items(days: u32, page: u64, limit: u64) -> QueryKey {
        items().with("stale").with_params(&(days, page, limit))
    }

    pub fn item_statistics() -> QueryKey {
        items().with("statistics")
    }

    pub fn logs() -> QueryKey {
        QueryKey::new(["logs"])
    }

    pub fn activity_logs(query: &ActivityQuery) -> QueryKey {
        logs().with("activity").with_params(query)
    }

    pub fn audit_logs(query: &AuditLogQuery) -> QueryKey {
        logs().with("audit").with_params(query)
    }

    pub fn resource_logs(resource: &str, id: &str) -> QueryKey {
        logs().with("resource").with(resource).with(id)
    }

    pub fn users() -> QueryKey {
        QueryKey::new(["users"])
    }

    pub fn admin_stats() -> QueryKey {
        users().with("stats")
    }

    pub fn groups() -> QueryKey {
        QueryKey::new(["groups"])
    }

    pub fn orders() -> QueryKey {
        QueryKey::new(["procurement"])
    }

    pub fn orders_list(query: &ProcurementQuery) -> QueryKey {
        orders().with("list").with_params(query)
    }

    pub fn analytics() -> QueryKey {
        QueryKey::new(["analytics"])
    }

    pub fn dashboard() -> QueryKey {
        analytics().with("dashboard")
    }

    pub fn activity_stats(days: u32) -> QueryKey {
        analytics().with("activity").with(days.to_string())
    }

    pub fn item_project_stats(catalog_number: &str) -> QueryKey {
        analytics().with("item").with(catalog_number)
    }

    pub fn timeline(days: u32, catalog_number: Option<&str>) -> QueryKey {
        analytics()
            .with("timeline")
            .with_params(&(days, catalog_number))
    }
}

// ========================
// Cache
// ========================

/// Typed view over a [`TtlCache`] keyed by [`QueryKey`]
pub struct QueryCache<C: Clock = SystemClock> {
    cache: TtlCache<C>,
}

impl QueryCache<SystemClock> {
    pub fn new(stale_ms: u64, max_bytes: usize) -> Self {
        Self {
            cache: TtlCache::new(stale_ms, max_bytes),
        }
    }
}

impl<C: Clock> QueryCache<C> {
    pub fn with_cache(cache: TtlCache<C>) -> Self {
        Self { cache }
    }

    /// Fresh cached value, if it still decodes as `T`
    pub fn get<T: DeserializeOwned>(&mut self, key: &QueryKey) -> Option<T> {
        let value = self.cache.get(&key.cache_key())?;
        serde_json::from_value(value).ok()
    }

    pub fn set<T: Serialize>(&mut self, key: &QueryKey, data: &T) {
        match serde_json::to_value(data) {
            Ok(value) => self.cache.set(&key.cache_key(), value, None),
            Err(e) => log::warn!("[Query] not caching {:?}: {}", key.segments(), e),
        }
    }

    /// Drop every entry under `prefix`
    pub fn remove(&mut self, prefix: &QueryKey) -> usize {
        self.cache.invalidate_by_pattern(|k| key_matches(k, prefix))
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

// ========================
// Client
// ========================

/// Shared query cache plus the version signal mounted queries track
#[derive(Clone)]
pub struct QueryClient {
    cache: Rc<RefCell<QueryCache>>,
    version: RwSignal<u64>,
}

impl QueryClient {
    pub fn new(stale_ms: u64, max_bytes: usize) -> Self {
        Self {
            cache: Rc::new(RefCell::new(QueryCache::new(stale_ms, max_bytes))),
            version: RwSignal::new(0),
        }
    }

    /// Cached value when fresh, otherwise run `fetcher` and cache the result
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.cache.borrow_mut().get::<T>(key) {
            return Ok(hit);
        }
        let data = fetcher().await?;
        self.cache.borrow_mut().set(key, &data);
        Ok(data)
    }

    pub fn set_data<T: Serialize>(&self, key: &QueryKey, data: &T) {
        self.cache.borrow_mut().set(key, data);
    }

    /// Drop matching entries and make mounted queries refetch
    pub fn invalidate(&self, prefix: &QueryKey) {
        let removed = self.cache.borrow_mut().remove(prefix);
        log::debug!("[Query] invalidated {:?} ({} entries)", prefix.segments(), removed);
        self.version.update(|v| *v += 1);
    }

    /// Drop matching entries without triggering refetches
    pub fn remove(&self, prefix: &QueryKey) {
        self.cache.borrow_mut().remove(prefix);
    }

    /// Forget everything user-scoped on logout
    pub fn on_logout(&self) {
        for prefix in [keys::items(), keys::users(), keys::logs()] {
            self.remove(&prefix);
        }
    }

    pub fn version(&self) -> ReadSignal<u64> {
        self.version.read_only()
    }
}

pub fn provide_query_client(client: QueryClient) {
    provide_context(StoredValue::new_local(client));
}

pub fn use_query_client() -> QueryClient {
    expect_context::<StoredValue<QueryClient, LocalStorage>>().get_value()
}

// ========================
// Hook
// ========================

/// Reactive result of [`use_query`]. Previous data stays visible while a
/// refetch is in flight.
pub struct QueryState<T: Send + Sync + 'static> {
    pub data: RwSignal<Option<T>>,
    pub loading: RwSignal<bool>,
    pub error: RwSignal<Option<ApiError>>,
    trigger: RwSignal<u64>,
}

impl<T: Send + Sync + 'static> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Send + Sync + 'static> Copy for QueryState<T> {}

impl<T: Send + Sync + 'static> QueryState<T> {
    fn new() -> Self {
        Self {
            data: RwSignal::new(None),
            loading: RwSignal::new(true),
            error: RwSignal::new(None),
            trigger: RwSignal::new(0),
        }
    }

    /// Re-run the query, bypassing its cached entry
    pub fn refetch(&self) {
        self.trigger.update(|v| *v += 1);
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.get().map(|e| e.user_message())
    }
}

/// Run `fetch` whenever `source` or the client version changes.
///
/// `source` is read reactively; `key` turns it into the cache key and
/// `fetch` into the request.
pub fn use_query<S, T, Src, K, F, Fut>(source: Src, key: K, fetch: F) -> QueryState<T>
where
    S: Clone + 'static,
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
    Src: Fn() -> Option<S> + 'static,
    K: Fn(&S) -> QueryKey + 'static,
    F: Fn(S) -> Fut + Clone + 'static,
    Fut: Future<Output = Result<T, ApiError>> + 'static,
{
    let client = use_query_client();
    let state = QueryState::<T>::new();
    let version = client.version();

    Effect::new(move |prev_trigger: Option<u64>| {
        version.track();
        let trigger = state.trigger.get();
        let Some(input) = source() else {
            state.loading.set(false);
            return trigger;
        };
        let query_key = key(&input);
        if prev_trigger.is_some_and(|prev| prev != trigger) {
            client.remove(&query_key);
        }
        let client = client.clone();
        let fetch = fetch.clone();
        state.loading.set(true);
        spawn_local(async move {
            match client.fetch(&query_key, move || fetch(input)).await {
                Ok(data) => {
                    state.data.set(Some(data));
                    state.error.set(None);
                }
                Err(err) => {
                    log::warn!("[Query] {:?} failed: {}", query_key.segments(), err);
                    state.error.set(Some(err));
                }
            }
            state.loading.set(false);
        });
        trigger
    });

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockTransport;
    use crate::api::retry::RetryPolicy;
    use crate::api::ApiClient;
    use crate::models::{Item, ItemPage};
    use serde_json::json;

    fn cache() -> QueryCache {
        QueryCache::new(60_000, 1 << 20)
    }

    #[test]
    fn test_prefix_matching() {
        let list = keys::items_list(&ItemQuery::page(1, 25));
        assert!(list.starts_with(&keys::items()));
        assert!(!list.starts_with(&keys::users()));
        assert!(!keys::items().starts_with(&list));
        assert!(!QueryKey::new(["itemsX"]).starts_with(&keys::items()));
    }

    #[test]
    fn test_remove_by_prefix() {
        let mut c = cache();
        c.set(&keys::items_list(&ItemQuery::page(1, 25)), &json!(1));
        c.set(&keys::items_list(&ItemQuery::page(2, 25)), &json!(2));
        c.set(&keys::users(), &json!(3));
        c.set(&keys::dashboard(), &json!(4));

        assert_eq!(c.remove(&keys::items()), 2);
        assert_eq!(c.get::<i32>(&keys::users()), Some(3));
        assert_eq!(c.get::<i32>(&keys::dashboard()), Some(4));
        assert_eq!(c.get::<i32>(&keys::items_list(&ItemQuery::page(1, 25))), None);
    }

    #[test]
    fn test_typed_round_trip_of_cached_page() {
        let mut c = cache();
        let page = ItemPage {
            items: vec![Item {
                id: "a1".into(),
                ..Default::default()
            }],
            total: 1,
            page: 1,
            limit: 25,
            pages: 1,
        };
        let key = keys::items_list(&ItemQuery::page(1, 25));
        c.set(&key, &page);
        assert_eq!(c.get::<ItemPage>(&key), Some(page));
    }

    #[test]
    fn test_params_distinguish_keys() {
        let mut q = ItemQuery::page(1, 25);
        let a = keys::items_list(&q);
        q.search = Some("cable".into());
        let b = keys::items_list(&q);
        assert_ne!(a, b);
        assert_eq!(a.segments()[..2], b.segments()[..2]);
    }

    #[tokio::test]
    async fn test_fetch_recovers_from_transient_server_error() {
        let mock = MockTransport::new();
        mock.reply(503, json!({"detail": "Service Unavailable"}));
        mock.reply(200, json!({"username": "dana", "role": "user", "permissions": []}));
        let api = ApiClient::new(mock.clone()).with_retry(RetryPolicy {
            max_attempts: 2,
            initial_delay_ms: 0,
            backoff_multiplier: 2,
        });
        let client = QueryClient::new(60_000, 1 << 20);

        let user = client.fetch(&keys::users(), || api.me()).await.unwrap();
        assert_eq!(user.username, "dana");
        assert_eq!(mock.requests().len(), 2);

        let cached = client.fetch(&keys::users(), || api.me()).await.unwrap();
        assert_eq!(cached.username, "dana");
        assert_eq!(mock.requests().len(), 2);
    }
}
