//! PostgreSQL-backed customer store. The `customers` table lives in the schema named by
//! `CUSTOMER_SCHEMA` (default `public`) and is created on first use.

use super::{CustomerStore, StoreError};
use crate::model::{Customer, CustomerId, CustomerPatch};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgPool, Postgres, QueryBuilder};
use std::str::FromStr;
use tokio::sync::OnceCell;

pub const CUSTOMERS_TABLE: &str = "customers";

/// Unique index enforcing one record per member number.
const MEMBER_NUMBER_INDEX: &str = "customers_member_number_key";

const COLUMNS: &str = "id, name, date_of_birth, member_number, interests, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    date_of_birth: NaiveDate,
    member_number: i64,
    interests: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(r: CustomerRow) -> Self {
        Customer {
            id: CustomerId::from(r.id),
            name: r.name,
            date_of_birth: r.date_of_birth,
            member_number: r.member_number,
            interests: r.interests,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

pub struct PgCustomerStore {
    pool: PgPool,
    schema: String,
    /// Schema registration runs once per store; a failed attempt is retried on the next call.
    schema_ready: OnceCell<()>,
}

impl PgCustomerStore {
    pub fn new(pool: PgPool, schema: impl Into<String>) -> Self {
        PgCustomerStore {
            pool,
            schema: schema.into(),
            schema_ready: OnceCell::new(),
        }
    }

    /// Connect a pool to `database_url`. The table itself is created lazily.
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        schema: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool, schema))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Schema-qualified table name, e.g. `"public"."customers"`.
    fn table(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(CUSTOMERS_TABLE))
    }

    async fn ready(&self) -> Result<(), StoreError> {
        self.schema_ready
            .get_or_try_init(|| self.ensure_schema())
            .await
            .map(|_| ())
    }

    /// CREATE SCHEMA needs database-level CREATE even with IF NOT EXISTS, so it only runs when
    /// the schema is missing.
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let table = self.table();
        tracing::info!(table = %table, "ensuring customer table");
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_namespace WHERE nspname = $1)")
            .bind(&self.schema)
            .fetch_one(&self.pool)
            .await?;
        if !exists.0 {
            tracing::info!(schema = %self.schema, "creating schema");
            sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quote_ident(&self.schema)))
                .execute(&self.pool)
                .await?;
        }
        for ddl in table_ddl(&table) {
            sqlx::query(&ddl).execute(&self.pool).await?;
        }
        Ok(())
    }
}

/// Table and unique-index statements for the qualified `table`.
fn table_ddl(table: &str) -> [String; 2] {
    [
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                date_of_birth DATE NOT NULL,
                member_number BIGINT NOT NULL,
                interests TEXT,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table
        ),
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {} ON {} (member_number)",
            quote_ident(MEMBER_NUMBER_INDEX),
            table
        ),
    ]
}

/// Partial UPDATE for the fields present in `patch`. `updated_at` never moves backwards.
fn update_query(
    table: &str,
    id: &CustomerId,
    patch: &CustomerPatch,
    now: DateTime<Utc>,
) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("UPDATE {} SET updated_at = GREATEST(updated_at, ", table));
    qb.push_bind(now).push(")");
    if let Some(name) = &patch.name {
        qb.push(", name = ").push_bind(name.clone());
    }
    if let Some(dob) = patch.date_of_birth {
        qb.push(", date_of_birth = ").push_bind(dob);
    }
    if let Some(n) = patch.member_number {
        qb.push(", member_number = ").push_bind(n);
    }
    if let Some(interests) = &patch.interests {
        qb.push(", interests = ").push_bind(interests.clone());
    }
    qb.push(" WHERE id = ").push_bind(id.as_str().to_string());
    qb.push(" RETURNING ").push(COLUMNS);
    qb
}

/// Member-number unique violations become `DuplicateKey`, primary-key violations `IdConflict`;
/// everything else stays a database error.
fn map_db_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return match db.constraint() {
                Some(c) if c != MEMBER_NUMBER_INDEX => StoreError::IdConflict(c.to_string()),
                _ => StoreError::DuplicateKey,
            };
        }
    }
    StoreError::Database(e)
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn list(&self) -> Result<Vec<Customer>, StoreError> {
        self.ready().await?;
        let sql = format!("SELECT {} FROM {} ORDER BY member_number ASC", COLUMNS, self.table());
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, CustomerRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Customer::from).collect())
    }

    async fn insert(&self, customer: Customer) -> Result<Customer, StoreError> {
        self.ready().await?;
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            self.table(),
            COLUMNS,
            COLUMNS
        );
        tracing::debug!(sql = %sql, member_number = customer.member_number, "query");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(customer.id.as_str())
            .bind(&customer.name)
            .bind(customer.date_of_birth)
            .bind(customer.member_number)
            .bind(&customer.interests)
            .bind(customer.created_at)
            .bind(customer.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.into())
    }

    async fn find(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        self.ready().await?;
        let sql = format!("SELECT {} FROM {} WHERE id = $1", COLUMNS, self.table());
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn update(
        &self,
        id: &CustomerId,
        patch: &CustomerPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Customer>, StoreError> {
        self.ready().await?;
        let mut qb = update_query(&self.table(), id, patch, now);
        tracing::debug!(sql = %qb.sql(), id = %id, "query");
        let row = qb
            .build_query_as::<CustomerRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(row.map(Customer::from))
    }

    async fn delete(&self, id: &CustomerId) -> Result<Option<Customer>, StoreError> {
        self.ready().await?;
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", self.table(), COLUMNS);
        tracing::debug!(sql = %sql, id = %id, "query");
        let row = sqlx::query_as::<_, CustomerRow>(&sql)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Customer::from))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let (admin_url, db_name) = parse_db_name_from_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = PgConnectOptions::from_str(&admin_url)
        .map_err(|e| StoreError::Unavailable(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_db_name_from_url(url: &str) -> Result<(String, String), StoreError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| StoreError::Unavailable("DATABASE_URL: no path".into()))?
        + 1;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    let admin_url = format!("{}postgres", base);
    Ok((admin_url, db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
