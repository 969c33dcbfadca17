// src/handlers/sessions.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::CashierOnly, rbac::RequireRole},
    models::{
        payments::Payment,
        sessions::{BarSession, SessionStats, ShiftType},
    },
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpenSessionPayload {
    pub shift_type: ShiftType,
}

/// Turno aberto do caixa logado, ou `null` se não houver.
#[utoipa::path(
    get,
    path = "/api/sessions/active",
    responses((status = 200, body = BarSession)),
    security(("api_jwt" = [])),
    tag = "Sessions"
)]
pub async fn get_active_session(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.session_service.get_active(user.0.id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = OpenSessionPayload,
    responses((status = 201, body = BarSession), (status = 409, description = "Turno já aberto")),
    security(("api_jwt" = [])),
    tag = "Sessions"
)]
pub async fn open_session(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<CashierOnly>,
    Json(payload): Json<OpenSessionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let session = app_state
        .session_service
        .open_shift(&user.0, payload.shift_type)
        .await?;

    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    post,
    path = "/api/sessions/{id}/end",
    params(("id" = Uuid, Path, description = "ID do turno")),
    responses((status = 200, body = BarSession)),
    security(("api_jwt" = [])),
    tag = "Sessions"
)]
pub async fn end_session(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<CashierOnly>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = app_state.session_service.close_shift(&user.0, id).await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/sessions/{id}/stats",
    params(("id" = Uuid, Path, description = "ID do turno")),
    responses((status = 200, body = SessionStats)),
    security(("api_jwt" = [])),
    tag = "Sessions"
)]
pub async fn session_stats(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.session_service.stats(id).await?;
    Ok(Json(stats))
}

/// Extrato do turno, na ordem em que os pagamentos entraram.
#[utoipa::path(
    get,
    path = "/api/sessions/{id}/payments",
    params(("id" = Uuid, Path, description = "ID do turno")),
    responses((status = 200, body = [Payment])),
    security(("api_jwt" = [])),
    tag = "Sessions"
)]
pub async fn session_payments(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let payments = app_state.payment_repo.list_for_session(id).await?;
    Ok(Json(payments))
}
