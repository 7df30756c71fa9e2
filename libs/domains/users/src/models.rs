use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

/// Permissions assigned to every user handed out by search (octal 0755).
pub const DEFAULT_PERMISSIONS: u32 = 0o755;

/// User entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Unique identifier, assigned by the repository
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Opaque payload
    pub data: String,
    /// Permission bits, owned by business logic rather than storage
    pub permissions: u32,
}

impl User {
    /// Build a user from creation input under a freshly assigned id.
    pub fn new(id: Uuid, input: NewUser) -> Self {
        Self {
            id,
            name: input.name,
            data: input.data,
            permissions: input.permissions,
        }
    }
}

/// DTO for creating a new user
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub data: String,
    /// Never read from request bodies; stored users start at 0
    #[serde(skip)]
    pub(crate) permissions: u32,
}

impl NewUser {
    pub fn new(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
            permissions: 0,
        }
    }
}

/// `?uid=` query for read and delete
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserIdQuery {
    pub uid: Uuid,
}

/// `?q=` query for search; a missing query matches every user
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}
