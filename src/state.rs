//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::service::CustomerService;
use crate::store::CustomerStore;
use crate::ui::templates;
use std::sync::Arc;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub customers: CustomerService,
    /// Compiled once at startup.
    pub templates: Arc<Tera>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn CustomerStore>, config: AppConfig) -> Result<Self, AppError> {
        Ok(AppState {
            customers: CustomerService::new(store),
            templates: Arc::new(templates::load()?),
            config: Arc::new(config),
        })
    }
}
