use async_trait::async_trait;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::User;

/// Lazily delivered search results. The producer closes the stream when it is
/// done for any reason; errors are reported before the stream exists.
pub type UserStream = ReceiverStream<User>;

/// Storage port for users.
///
/// Every operation takes the caller's cancellation token. `read` reports an
/// absent id as [`StoreError::NotFound`]; `delete` of an absent id succeeds.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Store a user under its id, returning that id
    async fn create(&self, cancel: &CancellationToken, user: User) -> Result<Uuid, StoreError>;

    /// Get a copy of the user with the given id
    async fn read(&self, cancel: &CancellationToken, id: Uuid) -> Result<User, StoreError>;

    /// Remove the user with the given id, if present
    async fn delete(&self, cancel: &CancellationToken, id: Uuid) -> Result<(), StoreError>;

    /// Stream every user whose name contains `query`
    async fn search_users(
        &self,
        cancel: &CancellationToken,
        query: &str,
    ) -> Result<UserStream, StoreError>;
}
