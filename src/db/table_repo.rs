// src/db/table_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::floor::{DiningTable, TableStatus},
};

#[derive(Clone)]
pub struct TableRepository {
    pool: PgPool,
}

impl TableRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_tables(&self) -> Result<Vec<DiningTable>, AppError> {
        let tables =
            sqlx::query_as::<_, DiningTable>("SELECT * FROM dining_tables ORDER BY number ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(tables)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<DiningTable>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>("SELECT * FROM dining_tables WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(table)
    }

    pub async fn create_table<'e, E>(
        &self,
        executor: E,
        number: i32,
        capacity: i32,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, DiningTable>(
            r#"
            INSERT INTO dining_tables (number, capacity)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(number)
        .bind(capacity)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::TableNumberAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Sobrescrita incondicional de status e comanda corrente.
    /// Quem garante a coerência das transições são os serviços.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: TableStatus,
        current_order_id: Option<Uuid>,
    ) -> Result<DiningTable, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let table = sqlx::query_as::<_, DiningTable>(
            r#"
            UPDATE dining_tables
            SET status = $2, current_order_id = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(current_order_id)
        .fetch_optional(executor)
        .await?;

        table.ok_or(AppError::TableNotFound)
    }
}
