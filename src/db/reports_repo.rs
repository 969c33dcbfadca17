// src/db/reports_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};

use crate::{common::error::AppError, models::reports::TopProductEntry};

#[derive(Clone)]
pub struct ReportsRepository {
    pool: PgPool,
}

impl ReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Top 5 produtos por receita nas comandas concluídas do dia.
    pub async fn top_products_by_date<'e, E>(
        &self,
        executor: E,
        date: NaiveDate,
    ) -> Result<Vec<TopProductEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, TopProductEntry>(
            r#"
            SELECT
                p.id AS product_id,
                p.name AS product_name,
                SUM(oi.quantity)::BIGINT AS total_quantity,
                SUM(oi.total_price) AS total_revenue
            FROM order_items oi
            JOIN orders o ON o.id = oi.order_id
            JOIN products p ON p.id = oi.product_id
            WHERE o.status = 'completed'
              AND o.created_at::date = $1
            GROUP BY p.id, p.name
            ORDER BY total_revenue DESC
            LIMIT 5
            "#,
        )
        .bind(date)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }
}
