// src/db/payment_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payments::{Payment, PaymentMethod},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

// Argumentos de inserção de um pagamento. Os efeitos colaterais
// (fechar comanda, liberar mesa, saldo fiado) ficam no serviço.
pub struct NewPayment {
    pub order_id: Option<Uuid>,
    pub credit_client_id: Option<Uuid>,
    pub cashier_id: Uuid,
    pub session_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub received_amount: Option<Decimal>,
    pub change_amount: Option<Decimal>,
    pub is_partial: bool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        new: NewPayment,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                order_id, credit_client_id, cashier_id, session_id,
                method, amount, received_amount, change_amount, is_partial
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(new.order_id)
        .bind(new.credit_client_id)
        .bind(new.cashier_id)
        .bind(new.session_id)
        .bind(new.method)
        .bind(new.amount)
        .bind(new.received_amount)
        .bind(new.change_amount)
        .bind(new.is_partial)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    /// Soma já paga de uma comanda (para decidir parcial x quitada).
    pub async fn sum_for_order<'e, E>(
        &self,
        executor: E,
        order_id: Uuid,
    ) -> Result<Decimal, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let total: Option<Decimal> =
            sqlx::query_scalar("SELECT SUM(amount) FROM payments WHERE order_id = $1")
                .bind(order_id)
                .fetch_one(executor)
                .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }

    /// Extrato do turno: todos os pagamentos registrados nele.
    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE session_id = $1 ORDER BY created_at ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(payments)
    }
}
