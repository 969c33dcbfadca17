// src/models/sessions.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "shift_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Morning,
    Evening,
}

// Turno de caixa: período de trabalho ao qual vendas e pagamentos
// são atribuídos. Nunca é apagado; encerrar congela os totais.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BarSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub shift_type: ShiftType,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_sales: Decimal,
    pub transaction_count: i32,
    pub is_active: bool,
}

/// Fotografia agregada de um turno, calculada na leitura a partir
/// da tabela de pagamentos (não é um contador mantido).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub total_sales: Decimal,
    pub transaction_count: i64,
    pub occupied_tables: i64,
    pub total_tables: i64,
    pub credit_outstanding: Decimal,
}
