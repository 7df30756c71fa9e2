use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        domain_users::handlers::create_user,
        domain_users::handlers::read_user,
        domain_users::handlers::delete_user,
        domain_users::handlers::search_users,
    ),
    components(
        schemas(
            domain_users::User,
            domain_users::NewUser,
            axum_helpers::ErrorResponse
        )
    ),
    modifiers(&BasicAuthScheme),
    info(
        title = "Reguser API",
        version = "0.1.0",
        description = "User registration service: create, read, delete and stream-search users"
    ),
    tags((name = "users", description = "User registration"))
)]
pub struct ApiDoc;

/// Registers the `basic_auth` scheme referenced by the user endpoints.
struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "basic_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}
