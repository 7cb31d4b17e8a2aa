//! # triage-db
//!
//! Ticket store implementations for the triage service.
//!
//! This crate provides:
//! - Connection pool management
//! - `PgTicketRepository`, with an atomic conditional classification commit
//! - `MemoryTicketRepository` for running without PostgreSQL
//!
//! ## Example
//!
//! ```rust,ignore
//! use triage_db::{Database, TicketRepository, CreateTicketRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/triage").await?;
//!     let ticket = db.tickets.insert(CreateTicketRequest::new("No puedo iniciar sesión")?).await?;
//!     println!("Created ticket: {}", ticket.id);
//!     Ok(())
//! }
//! ```

pub mod memory;
pub mod pool;
pub mod tickets;

// Re-export core types
pub use triage_core::*;

pub use memory::MemoryTicketRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use tickets::PgTicketRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Ticket repository.
    pub tickets: PgTicketRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            tickets: PgTicketRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Apply the bundled schema migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Internal(format!("Migration failed: {}", e)))?;
        Ok(())
    }
}
