// src/db/session_repo.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::sessions::{BarSession, SessionStats, ShiftType},
};

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Turno aberto do caixa informado, se houver. Ausência não é erro:
    /// o chamador trata None como "sem turno aberto".
    pub async fn get_active_session(&self, user_id: Uuid) -> Result<Option<BarSession>, AppError> {
        let session = sqlx::query_as::<_, BarSession>(
            r#"
            SELECT * FROM bar_sessions
            WHERE user_id = $1 AND is_active
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    /// Turno aberto da casa (de qualquer caixa). As comandas são
    /// atribuídas a ele no momento da criação.
    pub async fn get_any_active_session<'e, E>(
        &self,
        executor: E,
    ) -> Result<Option<BarSession>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let session = sqlx::query_as::<_, BarSession>(
            r#"
            SELECT * FROM bar_sessions
            WHERE is_active
            ORDER BY start_time DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(executor)
        .await?;
        Ok(session)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<BarSession>, AppError> {
        let session = sqlx::query_as::<_, BarSession>("SELECT * FROM bar_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(session)
    }

    /// Abre um turno. O índice único parcial (user_id WHERE is_active)
    /// garante no máximo um turno aberto por caixa; a violação vira 409.
    pub async fn create_session<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        shift_type: ShiftType,
    ) -> Result<BarSession, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BarSession>(
            r#"
            INSERT INTO bar_sessions (user_id, shift_type)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(shift_type)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SessionAlreadyOpen;
                }
            }
            e.into()
        })
    }

    /// Encerra o turno congelando os totais. A agregação e o update rodam
    /// na MESMA transação: um pagamento inserido no meio não se perde.
    pub async fn close_session<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<BarSession, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (total, count): (Option<Decimal>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(amount), COUNT(*)
            FROM payments
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        let session = sqlx::query_as::<_, BarSession>(
            r#"
            UPDATE bar_sessions
            SET is_active = FALSE,
                end_time = $2,
                total_sales = $3,
                transaction_count = $4
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(session_id)
        .bind(Utc::now())
        .bind(total.unwrap_or(Decimal::ZERO))
        .bind(count as i32)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(session)
    }

    /// Fotografia agregada do turno: vendas e transações, ocupação do
    /// salão e saldo fiado em aberto. Calculada na leitura, dentro de
    /// uma transação para um recorte consistente.
    pub async fn get_session_stats<'e, E>(
        &self,
        executor: E,
        session_id: Uuid,
    ) -> Result<SessionStats, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let (total_sales, transaction_count): (Option<Decimal>, i64) = sqlx::query_as(
            r#"
            SELECT SUM(amount), COUNT(*)
            FROM payments
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .fetch_one(&mut *tx)
        .await?;

        let (occupied_tables, total_tables): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE status = 'occupied'), COUNT(*)
            FROM dining_tables
            "#,
        )
        .fetch_one(&mut *tx)
        .await?;

        let credit_outstanding: Option<Decimal> = sqlx::query_scalar(
            "SELECT SUM(total_credit) FROM credit_clients WHERE is_active",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(SessionStats {
            total_sales: total_sales.unwrap_or(Decimal::ZERO),
            transaction_count,
            occupied_tables,
            total_tables,
            credit_outstanding: credit_outstanding.unwrap_or(Decimal::ZERO),
        })
    }
}
