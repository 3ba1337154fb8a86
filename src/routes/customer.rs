//! Customer REST routes: collection at `/customer`, items at `/customer/:id`.

use crate::handlers::customer::{create, delete, list, read, update};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/customer", get(list).post(create))
        .route("/customer/:id", get(read).put(update).delete(delete))
}
