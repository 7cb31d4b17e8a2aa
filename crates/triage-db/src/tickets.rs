//! Ticket repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use triage_core::{
    Category, ClassificationResult, CreateTicketRequest, Error, Result, Sentiment, Ticket,
    TicketRepository,
};

use crate::pool::log_pool_metrics;

const TICKET_COLUMNS: &str = "id, description, category, sentiment, processed, created_at";

/// PostgreSQL implementation of TicketRepository.
#[derive(Clone)]
pub struct PgTicketRepository {
    pool: Pool<Postgres>,
}

impl PgTicketRepository {
    /// Create a new PgTicketRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn ticket_from_row(row: &PgRow) -> Result<Ticket> {
    let category: Option<String> = row.try_get("category")?;
    let sentiment: Option<String> = row.try_get("sentiment")?;

    // Stored labels are constrained to the canonical set; anything else is
    // schema drift, not caller error.
    let category = category
        .map(|c| c.parse::<Category>())
        .transpose()
        .map_err(|e| Error::Internal(format!("corrupt ticket row: {}", e)))?;
    let sentiment = sentiment
        .map(|s| s.parse::<Sentiment>())
        .transpose()
        .map_err(|e| Error::Internal(format!("corrupt ticket row: {}", e)))?;

    Ok(Ticket {
        id: row.try_get("id")?,
        description: row.try_get("description")?,
        category,
        sentiment,
        processed: row.try_get("processed")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl TicketRepository for PgTicketRepository {
    #[instrument(skip(self, req), fields(subsystem = "db", component = "tickets", op = "insert"))]
    async fn insert(&self, req: CreateTicketRequest) -> Result<Ticket> {
        let id = Uuid::now_v7();
        let sql = format!(
            "INSERT INTO tickets (id, description, processed, created_at)
             VALUES ($1, $2, FALSE, $3)
             RETURNING {}",
            TICKET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(&req.description)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(ticket_id = %id, "Ticket inserted");
        ticket_from_row(&row)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "tickets", op = "fetch"))]
    async fn fetch(&self, id: Uuid) -> Result<Ticket> {
        let sql = format!("SELECT {} FROM tickets WHERE id = $1", TICKET_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::TicketNotFound(id))?;
        ticket_from_row(&row)
    }

    #[instrument(skip(self), fields(subsystem = "db", component = "tickets", op = "commit"))]
    async fn commit_classification(
        &self,
        id: Uuid,
        result: ClassificationResult,
    ) -> Result<Option<Ticket>> {
        // The processed = FALSE guard makes this a compare-and-swap: of two
        // concurrent commits for one ticket exactly one matches a row.
        let sql = format!(
            "UPDATE tickets
             SET category = $2, sentiment = $3, processed = TRUE
             WHERE id = $1 AND processed = FALSE
             RETURNING {}",
            TICKET_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(result.category.as_str())
            .bind(result.sentiment.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        row.as_ref().map(ticket_from_row).transpose()
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        log_pool_metrics(&self.pool);
        Ok(())
    }
}
