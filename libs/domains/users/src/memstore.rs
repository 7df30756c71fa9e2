use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::SearchConfig;
use crate::error::StoreError;
use crate::models::User;
use crate::store::{UserStore, UserStream};

/// In-memory implementation of [`UserStore`].
///
/// All access to the map goes through one mutex. A search holds that mutex
/// for its whole scan, so writers wait until the scan completes, is
/// cancelled, or gives up on a stalled consumer after
/// [`SearchConfig::send_timeout`]. Results therefore reflect live data, not a
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserStore {
    users: Arc<Mutex<HashMap<Uuid, User>>>,
    search: SearchConfig,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(search: SearchConfig) -> Self {
        Self {
            users: Arc::new(Mutex::new(HashMap::new())),
            search,
        }
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), StoreError> {
    if cancel.is_cancelled() {
        Err(StoreError::Cancelled)
    } else {
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, cancel: &CancellationToken, user: User) -> Result<Uuid, StoreError> {
        let mut users = self.users.lock().await;
        ensure_active(cancel)?;

        let id = user.id;
        users.insert(id, user);

        tracing::info!(user_id = %id, "Created user");
        Ok(id)
    }

    async fn read(&self, cancel: &CancellationToken, id: Uuid) -> Result<User, StoreError> {
        let users = self.users.lock().await;
        ensure_active(cancel)?;

        users.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn delete(&self, cancel: &CancellationToken, id: Uuid) -> Result<(), StoreError> {
        let mut users = self.users.lock().await;
        ensure_active(cancel)?;

        if users.remove(&id).is_some() {
            tracing::info!(user_id = %id, "Deleted user");
        }
        Ok(())
    }

    async fn search_users(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<UserStream, StoreError> {
        {
            let _users = self.users.lock().await;
            ensure_active(cancel)?;
        }

        let (tx, rx) = mpsc::channel(self.search.buffer);
        let users = Arc::clone(&self.users);
        let cancel = cancel.clone();
        let query = query.to_owned();
        let send_timeout = self.search.send_timeout;
        let span = tracing::debug_span!("user_scan", query = %query);

        // tx is dropped on every return, which closes the stream
        tokio::spawn(
            async move {
                let users = tokio::select! {
                    _ = cancel.cancelled() => return,
                    guard = users.lock_owned() => guard,
                };

                let mut sent = 0usize;
                for user in users.values().filter(|u| u.name.contains(query.as_str())) {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            tracing::debug!(sent, "Search cancelled");
                            return;
                        }
                        res = tx.send(user.clone()) => {
                            if res.is_err() {
                                tracing::debug!(sent, "Search consumer went away");
                                return;
                            }
                            sent += 1;
                        }
                        _ = tokio::time::sleep(send_timeout) => {
                            tracing::warn!(sent, timeout = ?send_timeout, "Search consumer stalled, abandoning scan");
                            return;
                        }
                    }
                }

                tracing::debug!(sent, "Search completed");
            }
            .instrument(span),
        );

        Ok(ReceiverStream::new(rx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use futures::StreamExt;
    use std::collections::HashSet;
    use std::time::Duration;

    fn user(name: &str) -> User {
        User::new(Uuid::new_v4(), NewUser::new(name, "data"))
    }

    async fn seed(store: &InMemoryUserStore, names: &[&str]) -> Vec<User> {
        let cancel = CancellationToken::new();
        let mut users = Vec::new();
        for name in names {
            let u = user(name);
            store.create(&cancel, u.clone()).await.unwrap();
            users.push(u);
        }
        users
    }

    #[tokio::test]
    async fn test_create_and_read_user() {
        let store = InMemoryUserStore::new();
        let cancel = CancellationToken::new();
        let u = user("alice");

        let id = store.create(&cancel, u.clone()).await.unwrap();
        assert_eq!(id, u.id);

        let fetched = store.read(&cancel, id).await.unwrap();
        assert_eq!(fetched, u);
    }

    #[tokio::test]
    async fn test_read_missing_user_is_not_found() {
        let store = InMemoryUserStore::new();
        let id = Uuid::new_v4();

        let result = store.read(&CancellationToken::new(), id).await;
        assert_eq!(result, Err(StoreError::NotFound(id)));
    }

    #[tokio::test]
    async fn test_create_overwrites_same_id() {
        let store = InMemoryUserStore::new();
        let cancel = CancellationToken::new();
        let mut u = user("first");
        store.create(&cancel, u.clone()).await.unwrap();

        u.name = "second".to_string();
        store.create(&cancel, u.clone()).await.unwrap();

        assert_eq!(store.read(&cancel, u.id).await.unwrap().name, "second");
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = InMemoryUserStore::new();
        let cancel = CancellationToken::new();
        let [u] = <[User; 1]>::try_from(seed(&store, &["bob"]).await).unwrap();

        store.delete(&cancel, u.id).await.unwrap();
        assert_eq!(
            store.read(&cancel, u.id).await,
            Err(StoreError::NotFound(u.id))
        );
        store.delete(&cancel, u.id).await.unwrap();
        store.delete(&cancel, Uuid::new_v4()).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_token_prevents_mutation() {
        let store = InMemoryUserStore::new();
        let live = CancellationToken::new();
        let [existing] = <[User; 1]>::try_from(seed(&store, &["carol"]).await).unwrap();

        let cancelled = CancellationToken::new();
        cancelled.cancel();

        let u = user("dave");
        assert_eq!(
            store.create(&cancelled, u.clone()).await,
            Err(StoreError::Cancelled)
        );
        assert_eq!(
            store.read(&live, u.id).await,
            Err(StoreError::NotFound(u.id))
        );

        assert_eq!(
            store.delete(&cancelled, existing.id).await,
            Err(StoreError::Cancelled)
        );
        assert!(store.read(&live, existing.id).await.is_ok());

        assert_eq!(
            store.read(&cancelled, existing.id).await,
            Err(StoreError::Cancelled)
        );
        assert!(matches!(
            store.search_users(&cancelled, "").await,
            Err(StoreError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_all_stored() {
        let store = InMemoryUserStore::new();
        let cancel = CancellationToken::new();
        let users: Vec<User> = (0..64).map(|i| user(&format!("user-{i}"))).collect();

        let results = futures::future::join_all(users.iter().cloned().map(|u| {
            let store = store.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { store.create(&cancel, u).await })
        }))
        .await;

        for result in results {
            assert!(result.unwrap().is_ok());
        }
        for u in &users {
            assert_eq!(&store.read(&cancel, u.id).await.unwrap(), u);
        }
    }

    #[tokio::test]
    async fn test_search_filters_by_substring() {
        let store = InMemoryUserStore::new();
        let cancel = CancellationToken::new();
        let users = seed(&store, &["alice", "malice", "Alice", "bob"]).await;

        let found: HashSet<Uuid> = store
            .search_users(&cancel, "lice")
            .await
            .unwrap()
            .map(|u| u.id)
            .collect()
            .await;

        let expected: HashSet<Uuid> = users
            .iter()
            .filter(|u| u.name.contains("lice"))
            .map(|u| u.id)
            .collect();
        assert_eq!(found, expected);
        assert_eq!(found.len(), 3);

        let case_sensitive: Vec<User> = store
            .search_users(&cancel, "Ali")
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(case_sensitive.len(), 1);
        assert_eq!(case_sensitive[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_search_empty_query_matches_all() {
        let store = InMemoryUserStore::new();
        seed(&store, &["a", "b", "c"]).await;

        let found: Vec<User> = store
            .search_users(&CancellationToken::new(), "")
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(found.len(), 3);
    }

    #[tokio::test]
    async fn test_closed_stream_stays_closed() {
        let store = InMemoryUserStore::new();
        seed(&store, &["only"]).await;

        let mut stream = store
            .search_users(&CancellationToken::new(), "only")
            .await
            .unwrap();
        assert!(stream.next().await.is_some());
        assert!(stream.next().await.is_none());
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_search_cancellation_closes_stream() {
        let store = InMemoryUserStore::with_config(SearchConfig::new(Duration::from_secs(30), 1));
        seed(&store, &["x1", "x2", "x3", "x4"]).await;

        let cancel = CancellationToken::new();
        let stream = store.search_users(&cancel, "x").await.unwrap();
        cancel.cancel();

        let items: Vec<User> = tokio::time::timeout(Duration::from_secs(1), stream.collect::<Vec<User>>())
            .await
            .expect("stream should close after cancellation");
        assert!(items.len() <= 1);

        // Lock released
        tokio::time::timeout(
            Duration::from_secs(1),
            store.create(&CancellationToken::new(), user("after")),
        )
        .await
        .unwrap()
        .unwrap();
    }

    #[tokio::test]
    async fn test_stalled_consumer_times_out_and_releases_lock() {
        let store =
            InMemoryUserStore::with_config(SearchConfig::new(Duration::from_millis(50), 1));
        seed(&store, &["s1", "s2", "s3"]).await;

        let stream = store
            .search_users(&CancellationToken::new(), "s")
            .await
            .unwrap();

        tokio::time::timeout(
            Duration::from_secs(1),
            store.create(&CancellationToken::new(), user("writer")),
        )
        .await
        .expect("writer blocked by abandoned scan")
        .unwrap();
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Only the buffered item made it before the scan gave up
        let items: Vec<User> = stream.collect().await;
        assert_eq!(items.len(), 1);
        assert!(items[0].name.starts_with('s'));
    }

    #[tokio::test]
    async fn test_dropped_consumer_releases_lock() {
        let store = InMemoryUserStore::with_config(SearchConfig::new(Duration::from_secs(30), 1));
        seed(&store, &["d1", "d2", "d3"]).await;

        let stream = store
            .search_users(&CancellationToken::new(), "d")
            .await
            .unwrap();
        drop(stream);

        tokio::time::timeout(
            Duration::from_secs(1),
            store.create(&CancellationToken::new(), user("writer")),
        )
        .await
        .expect("writer blocked after consumer dropped")
        .unwrap();
    }
}
