pub mod dto;
pub mod errors;
pub mod handlers;

use axum::{
    http::{header, HeaderValue},
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::sensors::SharedStore;
use handlers::ApiDoc;

pub const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Build the HTTP router. With `cors_enabled` every response carries the
/// permissive cross-origin headers and `OPTIONS /api/sensors` answers `204`.
pub fn router(store: SharedStore, cors_enabled: bool) -> Router {
    let sensors = get(handlers::list_readings).post(handlers::create_reading);
    let sensors = if cors_enabled {
        sensors.options(handlers::preflight)
    } else {
        sensors
    };

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/sensors", sensors)
        .route("/api/dashboard", get(handlers::dashboard))
        .with_state(store)
        .split_for_parts();

    let router = router
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        );

    if !cors_enabled {
        return router;
    }

    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
}
