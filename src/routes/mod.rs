//! URL map. Every resource path answers with and without a trailing slash.

mod api;
mod common;
mod site;

pub use api::api_routes;
pub use common::common_routes;
pub use site::site_routes;

use crate::state::AppState;
use axum::routing::MethodRouter;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub(crate) trait RouteBoth {
    /// Route `path` and `path/` to the same handlers.
    fn route_both(self, path: &str, methods: MethodRouter<AppState>) -> Self;
}

impl RouteBoth for Router<AppState> {
    fn route_both(self, path: &str, methods: MethodRouter<AppState>) -> Self {
        self.route(path, methods.clone()).route(&format!("{}/", path), methods)
    }
}

/// The whole service: common, site and `/api` routes with tracing and a body size limit.
pub fn app(state: AppState) -> Router {
    let max_body = state.settings.max_body_bytes;
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(site_routes(state.clone()))
        .nest("/api", api_routes(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(max_body)),
        )
}
