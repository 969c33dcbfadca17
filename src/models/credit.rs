// src/models/credit.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Cliente autorizado a comprar fiado. total_credit é o saldo devedor
// corrente: sobe quando uma comanda é paga no fiado, desce no abatimento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditClient {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub total_credit: Decimal,
    pub credit_limit: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
