//! CustomerService: validated CRUD over the configured store.

mod crud;
mod validation;
pub use crud::CustomerService;
pub use validation::{CustomerValidator, ValidationError};
