//! HTML pages: customer list (with create/edit form) and customer detail.

use crate::error::AppError;
use crate::model::CustomerId;
use crate::state::AppState;
use crate::ui::{templates, ListPageState};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use chrono::Local;
use serde::Deserialize;

/// `?new` opens the create form, `?edit={id}` the edit form for that record.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub new: Option<String>,
    pub edit: Option<String>,
}

pub async fn home(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config.path("/customer"))
}

/// Message shown inline on a page when the store fails: the operation, not the driver error.
fn store_failure_message(e: &AppError) -> String {
    match e {
        AppError::Store { context, source } => {
            tracing::error!(error = %source, "{}", context);
            (*context).to_string()
        }
        other => other.to_string(),
    }
}

pub async fn list_page(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let customers = match state.customers.list().await {
        Ok(customers) => customers,
        Err(e) => {
            let mut page = ListPageState::new(Vec::new());
            page.error = Some(store_failure_message(&e));
            let html = templates::render_list(&state.templates, &state.config, &page)?;
            return Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response());
        }
    };
    let mut page = ListPageState::new(customers);
    if let Some(id) = query.edit {
        if !page.edit(&CustomerId::from(id)) {
            page.cancel();
            page.error = Some("Customer not found".into());
        }
    } else if query.new.is_some() {
        page.open_create();
    }
    let html = templates::render_list(&state.templates, &state.config, &page)?;
    Ok(Html(html).into_response())
}

pub async fn detail_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    match state.customers.get(&CustomerId::from(id)).await {
        Ok(customer) => {
            let today = Local::now().date_naive();
            let html = templates::render_detail(&state.templates, &state.config, &customer, today)?;
            Ok(Html(html).into_response())
        }
        Err(AppError::NotFound) => {
            let html = templates::render_error(&state.templates, &state.config, "Customer not found")?;
            Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
        }
        Err(e @ AppError::Store { .. }) => {
            let message = store_failure_message(&e);
            let html = templates::render_error(&state.templates, &state.config, &message)?;
            Ok((StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response())
        }
        Err(e) => Err(e),
    }
}

pub async fn script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        templates::SCRIPT,
    )
}
