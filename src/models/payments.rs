// src/models/payments.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// "manager_consumption" é o consumo de funcionário autorizado:
// registra o valor mas fecha a comanda sem cobrança.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    MobileMoney,
    Credit,
    ManagerConsumption,
}

// Pagamento de uma comanda, ou abatimento avulso de um cliente fiado
// (nesse caso order_id é nulo e credit_client_id aponta o cliente).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub order_id: Option<Uuid>,
    pub credit_client_id: Option<Uuid>,
    pub cashier_id: Uuid,
    pub session_id: Uuid,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub received_amount: Option<Decimal>,
    pub change_amount: Option<Decimal>,
    pub is_partial: bool,
    pub created_at: DateTime<Utc>,
}
