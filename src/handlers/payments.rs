// src/handlers/payments.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::CashierOnly, rbac::RequireRole},
    models::payments::{Payment, PaymentMethod},
};

fn validate_positive(val: &Decimal) -> Result<(), ValidationError> {
    if *val <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentPayload {
    pub order_id: Uuid,
    pub method: PaymentMethod,

    #[validate(custom(function = "validate_positive"))]
    pub amount: Decimal,

    // Só faz sentido para dinheiro; ignorado nos demais métodos.
    pub received_amount: Option<Decimal>,

    // Obrigatório quando method = credit.
    pub credit_client_id: Option<Uuid>,
}

impl CreatePaymentPayload {
    // Regras que o derive não expressa, no padrão de validação manual.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.method == PaymentMethod::Credit && self.credit_client_id.is_none() {
            let mut err = ValidationError::new("CreditClientRequired");
            err.message = Some("Pagamento fiado exige um cliente de crédito.".into());
            return Err(err);
        }
        Ok(())
    }
}

#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentPayload,
    responses(
        (status = 201, body = Payment),
        (status = 409, description = "Comanda fechada, sem turno aberto ou limite de crédito excedido")
    ),
    security(("api_jwt" = [])),
    tag = "Payments"
)]
pub async fn create_payment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<CashierOnly>,
    Json(payload): Json<CreatePaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("creditClientId", e);
        AppError::ValidationError(errors)
    })?;

    let payment = app_state
        .payment_service
        .record_order_payment(
            &user.0,
            payload.order_id,
            payload.method,
            payload.amount,
            payload.received_amount,
            payload.credit_client_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
