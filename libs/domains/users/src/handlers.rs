use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use axum_helpers::{QueryParams, ValidatedJson};
use futures::StreamExt;
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;

use crate::error::UserResult;
use crate::models::{NewUser, SearchQuery, User, UserIdQuery};
use crate::repository::UserRepository;
use crate::store::UserStore;

/// Shared handler state
pub struct UsersState<S: UserStore> {
    repository: UserRepository<S>,
    /// Parent of every per-request cancellation token
    shutdown: CancellationToken,
}

impl<S: UserStore> Clone for UsersState<S> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
            shutdown: self.shutdown.clone(),
        }
    }
}

/// Create the users router with all HTTP endpoints.
///
/// Requests get a child of `shutdown`, so cancelling it aborts in-flight
/// operations and open search streams.
pub fn router<S: UserStore + 'static>(
    repository: UserRepository<S>,
    shutdown: CancellationToken,
) -> Router {
    Router::new()
        .route("/create", post(create_user))
        .route("/read", get(read_user))
        .route("/delete", delete(delete_user))
        .route("/search", get(search_users))
        .with_state(UsersState {
            repository,
            shutdown,
        })
}

/// Create a new user
///
/// POST /create
#[utoipa::path(
    post,
    path = "/create",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid credentials")
    ),
    security(("basic_auth" = []))
)]
pub async fn create_user<S: UserStore + 'static>(
    State(state): State<UsersState<S>>,
    ValidatedJson(input): ValidatedJson<NewUser>,
) -> UserResult<impl IntoResponse> {
    let cancel = state.shutdown.child_token();
    let user = state.repository.create(&cancel, input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by id
///
/// GET /read?uid=<uuid>
#[utoipa::path(
    get,
    path = "/read",
    tag = "users",
    params(UserIdQuery),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 400, description = "Invalid uid"),
        (status = 404, description = "User not found")
    ),
    security(("basic_auth" = []))
)]
pub async fn read_user<S: UserStore + 'static>(
    State(state): State<UsersState<S>>,
    QueryParams(query): QueryParams<UserIdQuery>,
) -> UserResult<Json<User>> {
    let cancel = state.shutdown.child_token();
    let user = state.repository.read(&cancel, query.uid).await?;
    Ok(Json(user))
}

/// Delete a user, returning its last state
///
/// DELETE /delete?uid=<uuid>
#[utoipa::path(
    delete,
    path = "/delete",
    tag = "users",
    params(UserIdQuery),
    responses(
        (status = 200, description = "User deleted", body = User),
        (status = 400, description = "Invalid uid"),
        (status = 404, description = "User not found")
    ),
    security(("basic_auth" = []))
)]
pub async fn delete_user<S: UserStore + 'static>(
    State(state): State<UsersState<S>>,
    QueryParams(query): QueryParams<UserIdQuery>,
) -> UserResult<Json<User>> {
    let cancel = state.shutdown.child_token();
    let user = state.repository.delete(&cancel, query.uid).await?;
    Ok(Json(user))
}

/// Search users by name substring
///
/// GET /search?q=<substring>
///
/// The body is a JSON array written element by element as results arrive.
/// Dropping the response (client disconnect) cancels the search.
#[utoipa::path(
    get,
    path = "/search",
    tag = "users",
    params(SearchQuery),
    responses(
        (status = 200, description = "Streamed JSON array of matching users", body = [User])
    ),
    security(("basic_auth" = []))
)]
pub async fn search_users<S: UserStore + 'static>(
    State(state): State<UsersState<S>>,
    QueryParams(query): QueryParams<SearchQuery>,
) -> UserResult<Response> {
    let cancel = state.shutdown.child_token();
    let mut users = state.repository.search_users(&cancel, &query.q).await?;
    let guard = cancel.drop_guard();

    let body = async_stream::stream! {
        let _guard = guard;
        yield Ok::<_, Infallible>("[".to_string());

        let mut first = true;
        while let Some(user) = users.next().await {
            match serde_json::to_string(&user) {
                Ok(json) => {
                    let sep = if first { "" } else { "," };
                    first = false;
                    yield Ok(format!("{}{}", sep, json));
                }
                Err(e) => tracing::error!(user_id = %user.id, "Failed to encode user: {}", e),
            }
        }

        yield Ok("]".to_string());
    };

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        Body::from_stream(body),
    )
        .into_response())
}
