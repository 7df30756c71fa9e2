use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{create_cors_layer, parse_origins, security_headers};
use axum::{Router, http::StatusCode, middleware};
use core_config::server::ServerConfig;
use std::io;
use tokio::task::JoinError;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};
use utoipa_swagger_ui::SwaggerUi;

/// Wraps API routes with documentation and the common middleware stack.
///
/// This function sets up:
/// - OpenAPI documentation (Swagger UI at `/swagger-ui`, Scalar at `/scalar`)
/// - API routes merged at the root
/// - Tracing, security headers, compression and a request timeout
/// - CORS when `cors_allowed_origin` is configured
/// - JSON 404 fallback
///
/// Routes must already have their state and auth layers applied.
///
/// # Example
/// ```ignore
/// #[derive(OpenApi)]
/// #[openapi(paths(/* your paths */))]
/// struct ApiDoc;
///
/// let api_routes = Router::new()
///     .route("/example", get(handler))
///     .with_state(my_state);
///
/// let router = create_router::<ApiDoc>(api_routes, &ServerConfig::default());
/// ```
pub fn create_router<T>(apis: Router, server_config: &ServerConfig) -> Router
where
    T: OpenApi + 'static,
{
    let mut router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server_config.request_timeout,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers));

    if let Some(origins) = server_config.cors_allowed_origin.as_deref() {
        let allowed = parse_origins(origins);
        if allowed.is_empty() {
            warn!("CORS_ALLOWED_ORIGIN has no valid origins, CORS stays disabled");
        } else {
            info!("CORS configured with allowed origins: {}", origins);
            router = router.layer(create_cors_layer(allowed));
        }
    }

    router.layer(CompressionLayer::new())
}

/// Production server with coordinated shutdown and cleanup.
///
/// When a signal arrives (or `coordinator.shutdown()` is called) the root
/// token is cancelled, so in-flight operations holding child tokens stop.
/// The server then gets `shutdown_timeout` to drain connections and
/// `cleanup` gets the same budget afterwards.
///
/// # Example
/// ```ignore
/// let coordinator = ShutdownCoordinator::new();
/// let routes = users::router(repository, coordinator.token());
///
/// create_production_app(router, &config, coordinator, async {
///     info!("Store released");
/// })
/// .await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    coordinator: ShutdownCoordinator,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown_timeout = server_config.shutdown_timeout;
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let graceful = coordinator.token();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router.into_make_service())
            .with_graceful_shutdown(async move { graceful.cancelled().await })
            .await
    });

    let serve_result = tokio::select! {
        joined = &mut server => flatten(joined),
        _ = coordinator.wait_for_signal() => {
            match tokio::time::timeout(shutdown_timeout, &mut server).await {
                Ok(joined) => flatten(joined),
                Err(_) => {
                    warn!(
                        "Connections still open after {:?}, forcing shutdown",
                        shutdown_timeout
                    );
                    server.abort();
                    Ok(())
                }
            }
        }
    };

    // The server may have stopped on its own; release everything regardless
    coordinator.shutdown();

    info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed successfully"),
        Err(_) => warn!(
            "Cleanup exceeded timeout of {:?}, forcing shutdown",
            shutdown_timeout
        ),
    }

    serve_result.inspect_err(|e| {
        tracing::error!("Server encountered an error: {:?}", e);
    })
}

fn flatten(joined: Result<io::Result<()>, JoinError>) -> io::Result<()> {
    joined.map_err(io::Error::other)?
}
