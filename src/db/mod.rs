// Database module - provides data access layer

use color_eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

// Re-export models for convenience
pub mod models;
pub use models::*;

mod migrations;

// Internal modules
mod article;
mod certificate;
mod course;
pub(crate) mod deal;
mod learning;
pub(crate) mod mdf;
mod org;
mod ticket;
mod user;

// Main database handle
#[derive(Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    /// Connect, verify the connection and apply pending migrations.
    pub async fn new(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(8).connect(url).await?;

        // Verify connection
        let one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&pool).await?;
        assert_eq!(one, 1);

        migrations::run(&pool).await?;

        tracing::info!("database connection has been verified");

        Ok(Self { pool })
    }

    /// Build a handle that connects on first use. No connectivity check and
    /// no migrations; `new` is the startup path.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new().connect_lazy(url)?;
        Ok(Self { pool })
    }
}
