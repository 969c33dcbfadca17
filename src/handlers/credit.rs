// src/handlers/credit.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CashierOnly, OrderStaff, RequireRole},
    },
    models::{credit::CreditClient, payments::Payment, payments::PaymentMethod},
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreditClientPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: Option<String>,

    pub phone: Option<String>,

    #[validate(custom(function = "validate_not_negative"))]
    #[serde(default)]
    pub credit_limit: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditRepaymentPayload {
    pub method: PaymentMethod,

    #[validate(custom(function = "validate_not_negative"))]
    pub amount: Decimal,
}

impl CreditRepaymentPayload {
    // Abatimento é dinheiro entrando: fiado sobre fiado não existe.
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if matches!(
            self.method,
            PaymentMethod::Credit | PaymentMethod::ManagerConsumption
        ) {
            let mut err = ValidationError::new("InvalidRepaymentMethod");
            err.message = Some("Abatimento deve ser em dinheiro ou mobile money.".into());
            return Err(err);
        }
        Ok(())
    }
}

#[utoipa::path(
    get,
    path = "/api/credit-clients",
    responses((status = 200, body = [CreditClient])),
    security(("api_jwt" = [])),
    tag = "Credit"
)]
pub async fn list_credit_clients(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let clients = app_state.credit_repo.list_clients().await?;
    Ok(Json(clients))
}

#[utoipa::path(
    post,
    path = "/api/credit-clients",
    request_body = CreateCreditClientPayload,
    responses((status = 201, body = CreditClient)),
    security(("api_jwt" = [])),
    tag = "Credit"
)]
pub async fn create_credit_client(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<OrderStaff>,
    Json(payload): Json<CreateCreditClientPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let client = app_state
        .credit_repo
        .create_client(
            &app_state.db_pool,
            &payload.name,
            payload.email.as_deref(),
            payload.phone.as_deref(),
            payload.credit_limit,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(client)))
}

#[utoipa::path(
    post,
    path = "/api/credit-clients/{id}/payments",
    params(("id" = Uuid, Path, description = "ID do cliente")),
    request_body = CreditRepaymentPayload,
    responses((status = 201, body = Payment), (status = 400, description = "Abatimento maior que a dívida")),
    security(("api_jwt" = [])),
    tag = "Credit"
)]
pub async fn create_credit_repayment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<CashierOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreditRepaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("method", e);
        AppError::ValidationError(errors)
    })?;

    let payment = app_state
        .payment_service
        .record_credit_repayment(&user.0, id, payload.method, payload.amount)
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}
