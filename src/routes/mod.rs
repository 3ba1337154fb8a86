//! Route tables and the assembled application router.

pub mod common;
pub mod customer;
pub mod pages;

pub use common::common_routes;
pub use customer::customer_routes;
pub use pages::page_routes;

use crate::state::AppState;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;

/// Full application: operational routes, `/api` customer routes, and pages, all under the
/// configured base path.
pub fn app(state: AppState) -> Router {
    let base_path = state.config.base_path.clone();
    let body_limit = state.config.body_limit_bytes;

    let routes = Router::new()
        .merge(common_routes())
        .nest("/api", customer_routes())
        .merge(page_routes())
        .layer(ServiceBuilder::new().layer(RequestBodyLimitLayer::new(body_limit)))
        .with_state(state);

    if base_path.is_empty() {
        routes
    } else {
        Router::new().nest(&base_path, routes)
    }
}
