// src/db/credit_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::credit::CreditClient};

#[derive(Clone)]
pub struct CreditRepository {
    pool: PgPool,
}

impl CreditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_clients(&self) -> Result<Vec<CreditClient>, AppError> {
        let clients =
            sqlx::query_as::<_, CreditClient>("SELECT * FROM credit_clients ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(clients)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<CreditClient>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, CreditClient>("SELECT * FROM credit_clients WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(client)
    }

    pub async fn create_client<'e, E>(
        &self,
        executor: E,
        name: &str,
        email: Option<&str>,
        phone: Option<&str>,
        credit_limit: Decimal,
    ) -> Result<CreditClient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, CreditClient>(
            r#"
            INSERT INTO credit_clients (name, email, phone, credit_limit)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(credit_limit)
        .fetch_one(executor)
        .await?;
        Ok(client)
    }

    /// Ajusta o saldo devedor (positivo = comprou fiado, negativo = abateu).
    pub async fn adjust_balance<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: Decimal,
    ) -> Result<CreditClient, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let client = sqlx::query_as::<_, CreditClient>(
            r#"
            UPDATE credit_clients
            SET total_credit = total_credit + $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(delta)
        .fetch_optional(executor)
        .await?;

        client.ok_or(AppError::CreditClientNotFound)
    }
}
