//! Cached reads of the backend collections.
//!
//! [`QueryClient`] fronts the four list endpoints with a [`QueryCache`]:
//! fresh reference data is served from memory, concurrent reads of the
//! same key share one request, and failures degrade to empty (or last
//! known) data plus an error message instead of failing the caller.

pub mod cache;

use std::future::Future;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use cache::{QueryCache, QueryKey};

use crate::error::normalize_error;
use crate::http::HttpError;
use crate::model::{Developer, Skill, Status, Task};
use crate::services::Services;

/// Snapshot of one read, shaped for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct Query<T> {
    /// Loaded data; empty before the first successful load.
    pub data: Vec<T>,
    /// Whether a load is outstanding.
    pub is_loading: bool,
    /// Human-readable error from the last load, if it failed.
    pub error: Option<String>,
}

impl<T> Query<T> {
    /// A read that has not completed yet.
    #[must_use]
    pub fn loading() -> Self {
        Self { data: Vec::new(), is_loading: true, error: None }
    }

    /// A successful read.
    #[must_use]
    pub fn ready(data: Vec<T>) -> Self {
        Self { data, is_loading: false, error: None }
    }

    /// A failed read with fallback data.
    #[must_use]
    pub fn failed(data: Vec<T>, error: impl Into<String>) -> Self {
        Self { data, is_loading: false, error: Some(error.into()) }
    }
}

/// Cached access to tasks, statuses, developers and skills.
#[derive(Clone)]
pub struct QueryClient {
    cache: Arc<QueryCache>,
    services: Services,
}

impl QueryClient {
    /// Creates a client over an injected cache and services.
    #[must_use]
    pub fn new(cache: Arc<QueryCache>, services: Services) -> Self {
        Self { cache, services }
    }

    /// The shared cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// What a reader of `key` can show before its fetch resolves: cached
    /// data when there is some, otherwise the loading state.
    #[must_use]
    pub fn peek<T: DeserializeOwned>(&self, key: QueryKey) -> Query<T> {
        self.cache.get(key).map_or_else(Query::loading, Query::ready)
    }

    /// Task list. Always refetched.
    pub async fn tasks(&self) -> Query<Task> {
        let service = &self.services.tasks;
        self.fetch(QueryKey::Tasks, "Unknown error", || service.get_all_tasks()).await
    }

    /// Status reference list.
    pub async fn statuses(&self) -> Query<Status> {
        let service = &self.services.statuses;
        self.fetch(QueryKey::Statuses, "Unable to load statuses.", || service.get_all_statuses())
            .await
    }

    /// Developer reference list (unfiltered).
    pub async fn developers(&self) -> Query<Developer> {
        let service = &self.services.developers;
        self.fetch(QueryKey::Developers, "Unable to load developers.", || {
            service.get_developers(&[])
        })
        .await
    }

    /// Skill reference list.
    pub async fn skills(&self) -> Query<Skill> {
        let service = &self.services.skills;
        self.fetch(QueryKey::Skills, "Unable to load skills. Please try again later.", || {
            service.get_skills()
        })
        .await
    }

    async fn fetch<T, F, Fut>(&self, key: QueryKey, fallback: &str, fetcher: F) -> Query<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, HttpError>>,
    {
        if self.cache.is_fresh(key) {
            if let Some(data) = self.cache.get(key) {
                debug!(key = ?key.segments(), "serving fresh cache entry");
                return Query::ready(data);
            }
        }

        let observed = self.cache.completed_fetches(key);
        let _guard = self.cache.fetch_lock(key).lock().await;
        if self.cache.completed_fetches(key) != observed {
            // Another reader finished a fetch while we waited.
            debug!(key = ?key.segments(), "reusing concurrent fetch");
            let data = self.cache.get(key).unwrap_or_default();
            return match self.cache.last_fetch_error(key) {
                Some(message) => Query::failed(data, message),
                None => Query::ready(data),
            };
        }
        // Readers started alongside this one queue on the lock before the request goes out.
        tokio::task::yield_now().await;

        match fetcher().await {
            Ok(data) => {
                self.cache.set(key, &data);
                self.cache.record_fetch(key, None);
                Query::ready(data)
            }
            Err(err) => {
                let message = normalize_error(&err, fallback);
                warn!(key = ?key.segments(), error = %message, "read failed");
                self.cache.record_fetch(key, Some(message.clone()));
                Query::failed(self.cache.get(key).unwrap_or_default(), message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::Clock;
    use crate::test_support::{ok, server_error, Backend};
    use chrono::Duration;
    use serde_json::json;

    fn client(backend: &Backend) -> QueryClient {
        let cache = Arc::new(QueryCache::new(Arc::clone(&backend.clock) as Arc<dyn Clock>));
        QueryClient::new(cache, Services::new(&backend.ctx.http))
    }

    #[tokio::test]
    async fn reference_data_is_served_from_cache_while_fresh() {
        let backend = Backend::new(vec![
            ok(json!([{"statusId": 1, "statusName": "Open"}])),
            ok(json!([{"statusId": 1, "statusName": "Open"}, {"statusId": 2, "statusName": "Done"}])),
        ]);
        let client = client(&backend);

        assert_eq!(client.statuses().await.data.len(), 1);
        assert_eq!(client.statuses().await.data.len(), 1);
        assert_eq!(backend.requests().len(), 1);

        backend.clock.advance(Duration::minutes(6));
        assert_eq!(client.statuses().await.data.len(), 2);
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn tasks_refetch_every_time() {
        let backend = Backend::new(vec![ok(json!([])), ok(json!([]))]);
        let client = client(&backend);
        client.tasks().await;
        client.tasks().await;
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_first_read_is_empty_with_message() {
        let backend = Backend::new(vec![server_error()]);
        let query = client(&backend).skills().await;
        assert!(query.data.is_empty());
        assert!(!query.is_loading);
        assert_eq!(query.error.as_deref(), Some("500 Internal Server Error"));
    }

    #[tokio::test]
    async fn failed_refetch_keeps_last_known_data() {
        let backend = Backend::new(vec![
            ok(json!([{"taskId": "t-1", "title": "One", "skills": []}])),
            server_error(),
        ]);
        let client = client(&backend);
        client.tasks().await;

        let query = client.tasks().await;
        assert_eq!(query.data.len(), 1);
        assert!(query.error.is_some());
    }

    #[tokio::test]
    async fn concurrent_reads_share_a_failure() {
        let backend = Backend::new(vec![server_error(), ok(json!([{"skillId": 1, "skillName": "Rust"}]))]);
        let client = client(&backend);

        let (first, second) = tokio::join!(client.skills(), client.skills());
        assert_eq!(first.error.as_deref(), Some("500 Internal Server Error"));
        assert_eq!(first, second);
        assert_eq!(backend.requests().len(), 1);

        // A later read tries again.
        assert_eq!(client.skills().await.data.len(), 1);
        assert_eq!(backend.requests().len(), 2);
    }

    #[tokio::test]
    async fn peek_is_loading_until_first_read() {
        let backend = Backend::new(vec![ok(json!([{"taskId": "t-1", "title": "One", "skills": []}]))]);
        let client = client(&backend);

        let before: Query<Task> = client.peek(QueryKey::Tasks);
        assert_eq!(before, Query::loading());

        client.tasks().await;
        let after: Query<Task> = client.peek(QueryKey::Tasks);
        assert!(!after.is_loading);
        assert_eq!(after.data.len(), 1);
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_reads_share_one_request() {
        let backend = Backend::new(vec![ok(json!([{"skillId": 1, "skillName": "Rust"}]))]);
        let client = client(&backend);

        let (first, second) = tokio::join!(client.skills(), client.skills());
        assert_eq!(first, second);
        assert_eq!(backend.requests().len(), 1);
    }
}
