// src/handlers/absences.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::ManagerOnly, rbac::RequireRole},
    models::absences::Absence,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAbsencePayload {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl CreateAbsencePayload {
    fn validate_consistency(&self) -> Result<(), ValidationError> {
        if self.end_date < self.start_date {
            let mut err = ValidationError::new("InvalidDateRange");
            err.message = Some("A data final não pode ser anterior à inicial.".into());
            return Err(err);
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveAbsencePayload {
    pub approved: bool,
}

#[utoipa::path(
    get,
    path = "/api/absences",
    responses((status = 200, body = [Absence])),
    security(("api_jwt" = [])),
    tag = "Absences"
)]
pub async fn list_absences(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
) -> Result<impl IntoResponse, AppError> {
    let absences = app_state.absence_repo.list_absences().await?;
    Ok(Json(absences))
}

// Qualquer funcionário autenticado pede ausência para si mesmo.
#[utoipa::path(
    post,
    path = "/api/absences",
    request_body = CreateAbsencePayload,
    responses((status = 201, body = Absence)),
    security(("api_jwt" = [])),
    tag = "Absences"
)]
pub async fn create_absence(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateAbsencePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    payload.validate_consistency().map_err(|e| {
        let mut errors = validator::ValidationErrors::new();
        errors.add("endDate", e);
        AppError::ValidationError(errors)
    })?;

    let absence = app_state
        .absence_repo
        .create_absence(
            &app_state.db_pool,
            user.0.id,
            payload.start_date,
            payload.end_date,
            payload.reason.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(absence)))
}

#[utoipa::path(
    post,
    path = "/api/absences/{id}/approve",
    params(("id" = Uuid, Path, description = "ID do pedido de ausência")),
    request_body = ApproveAbsencePayload,
    responses((status = 200, body = Absence)),
    security(("api_jwt" = [])),
    tag = "Absences"
)]
pub async fn approve_absence(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveAbsencePayload>,
) -> Result<impl IntoResponse, AppError> {
    let absence = app_state
        .absence_repo
        .set_approval(&app_state.db_pool, id, payload.approved, user.0.id)
        .await?;

    Ok(Json(absence))
}
