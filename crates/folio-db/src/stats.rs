//! # Stats Repository
//!
//! Read-only rollups for the dashboard: catalog counts and value,
//! all-time revenue, and today's takings. Everything is computed in SQL
//! from the live tables on each call, never cached, so the numbers
//! always agree with what the repositories just committed.

use chrono::{NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::error::StoreResult;
use folio_core::{InventoryStats, SalesStats, LOW_STOCK_THRESHOLD};

/// Repository for dashboard statistics.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    pool: SqlitePool,
}

impl StatsRepository {
    /// Creates a new StatsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StatsRepository { pool }
    }

    /// Computes catalog rollups in a single pass over `books`.
    ///
    /// ## Returns
    /// Total title count, the number of titles under the reorder
    /// threshold, and Σ price × stock in cents.
    pub async fn inventory(&self) -> StoreResult<InventoryStats> {
        let (total_books, low_stock_count, total_value_cents): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN stock < ?1 THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(price_cents * stock), 0)
            FROM books
            "#,
        )
        .bind(LOW_STOCK_THRESHOLD)
        .fetch_one(&self.pool)
        .await?;

        Ok(InventoryStats {
            total_books,
            low_stock_count,
            total_value_cents,
        })
    }

    /// Computes revenue rollups. "Today" starts at UTC midnight.
    ///
    /// Items sold counts line quantities, so a single sale of three
    /// copies contributes three.
    pub async fn sales(&self) -> StoreResult<SalesStats> {
        let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();

        let (total_sales, total_revenue_cents): (i64, i64) =
            sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(total_cents), 0) FROM sales")
                .fetch_one(&self.pool)
                .await?;

        let total_items_sold: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM sale_lines")
                .fetch_one(&self.pool)
                .await?;

        let (today_sales, today_revenue_cents): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(total_cents), 0) FROM sales WHERE created_at >= ?1",
        )
        .bind(midnight)
        .fetch_one(&self.pool)
        .await?;

        Ok(SalesStats {
            total_sales,
            total_revenue_cents,
            total_items_sold,
            today_sales,
            today_revenue_cents,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
