//! Runtime configuration types.

use std::net::SocketAddr;

/// Which backend holds customer records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    /// Process-local; contents are lost on restart.
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err("expected postgres or memory".into()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub store: StoreBackend,
    pub database_url: String,
    /// Schema holding the customers table.
    pub schema: String,
    pub max_connections: u32,
    pub bind_addr: SocketAddr,
    /// Route prefix, normalized to either "" or "/segment[/segment...]" without a trailing slash.
    pub base_path: String,
    pub body_limit_bytes: usize,
}

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/fin_customer";
pub const DEFAULT_SCHEMA: &str = "public";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_PATH: &str = "/fin-customer";
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 1024 * 1024;

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            store: StoreBackend::Postgres,
            database_url: DEFAULT_DATABASE_URL.into(),
            schema: DEFAULT_SCHEMA.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            base_path: DEFAULT_BASE_PATH.into(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl AppConfig {
    /// Absolute URL path for a route below the base path, e.g. `path("/customer")`.
    pub fn path(&self, route: &str) -> String {
        format!("{}{}", self.base_path, route)
    }
}
