//! Fin Customer: customer-record REST API and server-rendered management pages.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod ui;

pub use config::{AppConfig, StoreBackend};
pub use error::{AppError, ConfigError};
pub use model::{Customer, CustomerId, CustomerPatch, NewCustomer};
pub use routes::{app, common_routes, customer_routes, page_routes};
pub use service::CustomerService;
pub use state::AppState;
pub use store::{ensure_database_exists, CustomerStore, MemoryCustomerStore, PgCustomerStore, StoreError};
