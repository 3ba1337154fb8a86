//! Browser-facing routes: pages and the page script.

use crate::handlers::pages::{detail_page, home, list_page, script};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/customer", get(list_page))
        .route("/customer/:id", get(detail_page))
        .route("/assets/customer.js", get(script))
}
