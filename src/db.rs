use crate::config::{Config, DatabaseConfig};
use crate::error::ApiError;
use anyhow::{anyhow, Result};
use deadpool::Runtime;
use diesel::{Connection, PgConnection};
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::info;

pub type DbPool = deadpool::managed::Pool<AsyncDieselConnectionManager<AsyncPgConnection>>;
pub type DbConnection = deadpool::managed::Object<AsyncDieselConnectionManager<AsyncPgConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database manager holding the async connection pool.
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database manager from the process configuration.
    pub async fn new() -> Result<Self> {
        Self::connect(&Config::get().database).await
    }

    /// Create a new database manager with an explicit configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.url);

        let pool = DbPool::builder(manager)
            .max_size(config.max_connections as usize)
            .runtime(Runtime::Tokio1)
            .build()?;

        let db = Self { pool };
        db.initialize(&config.url).await?;

        Ok(db)
    }

    /// Test the connection and bring the schema up to date.
    async fn initialize(&self, url: &str) -> Result<()> {
        let _conn = self.get_connection().await?;
        info!("Successfully connected to the database");

        run_migrations(url)?;

        Ok(())
    }

    /// Get a database connection from the pool.
    pub async fn get_connection(&self) -> Result<DbConnection, ApiError> {
        self.pool
            .get()
            .await
            .map_err(|e| ApiError::Internal(anyhow!("failed to get database connection: {e}")))
    }

    /// Get the database connection pool reference.
    pub fn get_pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Apply pending embedded migrations over a short-lived sync connection.
pub fn run_migrations(url: &str) -> Result<()> {
    let mut conn = PgConnection::establish(url)?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| anyhow!("failed to run migrations: {e}"))?;
    info!("Database migrations applied successfully");

    Ok(())
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database() -> Result<Database> {
    Database::new().await
}
