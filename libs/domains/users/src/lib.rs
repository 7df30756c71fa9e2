//! Users Domain
//!
//! A user-registration service laid out as ports and adapters.
//!
//! # Features
//!
//! - Create, read and delete users
//! - Streaming substring search over user names
//! - Cooperative cancellation through every layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, JSON, streamed search body
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Identity assignment, permissions policy, search relay
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │  UserStore  │  ← Storage port (trait) + in-memory adapter
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{handlers, InMemoryUserStore, UserRepository};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = InMemoryUserStore::new();
//! let repository = UserRepository::new(store);
//!
//! let router = handlers::router(repository, CancellationToken::new());
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod memstore;
pub mod models;
pub mod repository;
pub mod store;

// Re-export commonly used types
pub use config::SearchConfig;
pub use error::{Operation, StoreError, UserError, UserResult};
pub use memstore::InMemoryUserStore;
pub use models::{DEFAULT_PERMISSIONS, NewUser, SearchQuery, User, UserIdQuery};
pub use repository::UserRepository;
pub use store::{UserStore, UserStream};
