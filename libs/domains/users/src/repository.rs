use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, instrument};
use uuid::Uuid;

use crate::error::{Operation, UserError, UserResult};
use crate::models::{DEFAULT_PERMISSIONS, NewUser, User};
use crate::store::{UserStore, UserStream};

/// Capacity of the stream handed to search callers
pub const SEARCH_RELAY_BUFFER: usize = 100;

/// Business layer for users.
///
/// Assigns identity, owns the `permissions` policy for search results and
/// annotates store errors with the failing operation. Holds no state of its
/// own besides the store handle.
pub struct UserRepository<S: UserStore> {
    store: Arc<S>,
}

impl<S: UserStore> Clone for UserRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: UserStore + 'static> UserRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Create a user under a freshly generated id
    #[instrument(skip(self, cancel, input), fields(name = %input.name))]
    pub async fn create(&self, cancel: &CancellationToken, input: NewUser) -> UserResult<User> {
        let mut user = User::new(Uuid::new_v4(), input);

        let id = self
            .store
            .create(cancel, user.clone())
            .await
            .map_err(UserError::store(Operation::Create))?;

        user.id = id;
        Ok(user)
    }

    /// Get a user by id
    pub async fn read(&self, cancel: &CancellationToken, id: Uuid) -> UserResult<User> {
        self.store
            .read(cancel, id)
            .await
            .map_err(UserError::store(Operation::Read))
    }

    /// Delete a user, returning its last known state.
    ///
    /// Nothing is deleted when the user cannot be read first.
    #[instrument(skip(self, cancel), fields(user_id = %id))]
    pub async fn delete(&self, cancel: &CancellationToken, id: Uuid) -> UserResult<User> {
        // TODO: run read and delete in one unit of work once a transactional store exists
        let user = self
            .store
            .read(cancel, id)
            .await
            .map_err(UserError::store(Operation::Delete))?;

        self.store
            .delete(cancel, id)
            .await
            .map_err(UserError::store(Operation::Delete))?;

        Ok(user)
    }

    /// Stream users whose name contains `query`, with permissions set to
    /// [`DEFAULT_PERMISSIONS`].
    ///
    /// The relay closes its stream when the store stream ends, when `cancel`
    /// fires, or when the caller drops the returned stream.
    pub async fn search_users(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> UserResult<UserStream> {
        let mut inbound = self
            .store
            .search_users(cancel, query)
            .await
            .map_err(UserError::store(Operation::Search))?;

        let (tx, rx) = mpsc::channel(SEARCH_RELAY_BUFFER);
        let cancel = cancel.clone();

        tokio::spawn(
            async move {
                loop {
                    let mut user = tokio::select! {
                        _ = cancel.cancelled() => break,
                        next = inbound.next() => match next {
                            Some(user) => user,
                            None => break,
                        },
                    };

                    user.permissions = DEFAULT_PERMISSIONS;

                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        res = tx.send(user) => {
                            if res.is_err() {
                                break;
                            }
                        }
                    }
                }
                tracing::debug!("Search relay closed");
            }
            .instrument(tracing::debug_span!("user_search_relay", query = %query)),
        );

        Ok(ReceiverStream::new(rx))
    }
}
