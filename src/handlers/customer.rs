//! Customer REST handlers: list/create on the collection, get/update/delete on one item.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::CustomerId;
use crate::response;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let customers = state.customers.list().await?;
    Ok(response::ok(customers))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.create(&body).await?;
    Ok(response::created(customer))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.get(&CustomerId::from(id)).await?;
    Ok(response::ok(customer))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.update(&CustomerId::from(id), &body).await?;
    Ok(response::ok(customer))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.customers.delete(&CustomerId::from(id)).await?;
    Ok(response::deleted(customer))
}
