// src/services/payment_service.rs

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        payment_repo::NewPayment, CreditRepository, OrderRepository, PaymentRepository,
        SessionRepository, TableRepository,
    },
    models::{
        auth::User,
        floor::TableStatus,
        orders::OrderStatus,
        payments::{Payment, PaymentMethod},
    },
};

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    order_repo: OrderRepository,
    table_repo: TableRepository,
    credit_repo: CreditRepository,
    session_repo: SessionRepository,
    pool: PgPool,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        order_repo: OrderRepository,
        table_repo: TableRepository,
        credit_repo: CreditRepository,
        session_repo: SessionRepository,
        pool: PgPool,
    ) -> Self {
        Self {
            payment_repo,
            order_repo,
            table_repo,
            credit_repo,
            session_repo,
            pool,
        }
    }

    /// Registra um pagamento de comanda com TODOS os efeitos colaterais
    /// na mesma transação: saldo fiado, conclusão da comanda e liberação
    /// da mesa. Pré-condições: comanda aberta, caixa com turno aberto.
    /// Pós-condições: se a soma paga cobre o total (ou o método é
    /// consumo de gerência), a comanda fica `completed` e a mesa `free`.
    pub async fn record_order_payment(
        &self,
        cashier: &User,
        order_id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
        received_amount: Option<Decimal>,
        credit_client_id: Option<Uuid>,
    ) -> Result<Payment, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount);
        }

        // O pagamento é atribuído ao turno aberto do caixa.
        let session = self
            .session_repo
            .get_active_session(cashier.id)
            .await?
            .ok_or(AppError::NoActiveSession)?;

        let mut tx = self.pool.begin().await?;

        let order = self
            .order_repo
            .find_by_id(&mut *tx, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if order.status.is_terminal() {
            return Err(AppError::OrderAlreadyClosed);
        }

        // Fiado: valida o cliente e aumenta o saldo devedor.
        if method == PaymentMethod::Credit {
            let client_id = credit_client_id.ok_or(AppError::MissingCreditClient)?;
            let client = self
                .credit_repo
                .find_by_id(&mut *tx, client_id)
                .await?
                .ok_or(AppError::CreditClientNotFound)?;

            if !client.is_active {
                return Err(AppError::CreditClientInactive);
            }
            if client.total_credit + amount > client.credit_limit {
                return Err(AppError::CreditLimitExceeded);
            }

            self.credit_repo
                .adjust_balance(&mut *tx, client_id, amount)
                .await?;
        }

        // Dinheiro: troco calculado quando o recebido é informado.
        let change_amount = match (method, received_amount) {
            (PaymentMethod::Cash, Some(received)) => {
                if received < amount {
                    return Err(AppError::InsufficientCash);
                }
                Some(received - amount)
            }
            _ => None,
        };

        let paid_before = self.payment_repo.sum_for_order(&mut *tx, order_id).await?;
        let settles = method == PaymentMethod::ManagerConsumption
            || paid_before + amount >= order.total_amount;

        let payment = self
            .payment_repo
            .create_payment(
                &mut *tx,
                NewPayment {
                    order_id: Some(order_id),
                    credit_client_id: if method == PaymentMethod::Credit {
                        credit_client_id
                    } else {
                        None
                    },
                    cashier_id: cashier.id,
                    session_id: session.id,
                    method,
                    amount,
                    received_amount,
                    change_amount,
                    is_partial: !settles,
                },
            )
            .await?;

        if settles {
            self.order_repo
                .update_status(&mut *tx, order_id, OrderStatus::Completed, Some(Utc::now()))
                .await?;
            self.table_repo
                .update_status(&mut *tx, order.table_id, TableStatus::Free, None)
                .await?;
        }

        tx.commit().await?;
        Ok(payment)
    }

    /// Abatimento avulso de fiado: reduz o saldo devedor do cliente e
    /// registra o pagamento sem comanda associada.
    pub async fn record_credit_repayment(
        &self,
        cashier: &User,
        client_id: Uuid,
        method: PaymentMethod,
        amount: Decimal,
    ) -> Result<Payment, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::InvalidPaymentAmount);
        }

        let session = self
            .session_repo
            .get_active_session(cashier.id)
            .await?
            .ok_or(AppError::NoActiveSession)?;

        let mut tx = self.pool.begin().await?;

        let client = self
            .credit_repo
            .find_by_id(&mut *tx, client_id)
            .await?
            .ok_or(AppError::CreditClientNotFound)?;

        if !client.is_active {
            return Err(AppError::CreditClientInactive);
        }
        if amount > client.total_credit {
            return Err(AppError::RepaymentExceedsDebt);
        }

        self.credit_repo
            .adjust_balance(&mut *tx, client_id, -amount)
            .await?;

        let payment = self
            .payment_repo
            .create_payment(
                &mut *tx,
                NewPayment {
                    order_id: None,
                    credit_client_id: Some(client_id),
                    cashier_id: cashier.id,
                    session_id: session.id,
                    method,
                    amount,
                    received_amount: None,
                    change_amount: None,
                    is_partial: false,
                },
            )
            .await?;

        tx.commit().await?;
        Ok(payment)
    }
}
