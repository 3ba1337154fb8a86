//! Response helpers. Records are returned bare (no envelope) so clients read fields directly.

use crate::model::Customer;
use axum::{http::StatusCode, Json};
use serde::Serialize;

pub const DELETED_MESSAGE: &str = "Customer deleted successfully";

/// Body of a successful delete: a confirmation message plus the removed record.
#[derive(Serialize, Debug)]
pub struct DeleteConfirmation {
    pub message: &'static str,
    pub customer: Customer,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn deleted(customer: Customer) -> (StatusCode, Json<DeleteConfirmation>) {
    ok(DeleteConfirmation {
        message: DELETED_MESSAGE,
        customer,
    })
}
