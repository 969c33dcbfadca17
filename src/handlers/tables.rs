// src/handlers/tables.rs

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
    middleware::{auth::AuthenticatedUser, rbac::ManagerOnly, rbac::RequireRole},
    models::floor::{DiningTable, TableStatus},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTablePayload {
    #[validate(range(min = 1, message = "O número da mesa deve ser positivo."))]
    pub number: i32,

    #[validate(range(min = 1, message = "A capacidade deve ser positiva."))]
    pub capacity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTableStatusPayload {
    pub status: TableStatus,
    pub order_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/tables",
    responses((status = 200, body = [DiningTable])),
    security(("api_jwt" = [])),
    tag = "Floor"
)]
pub async fn list_tables(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let tables = app_state.table_repo.list_tables().await?;
    Ok(Json(tables))
}

#[utoipa::path(
    post,
    path = "/api/tables",
    request_body = CreateTablePayload,
    responses((status = 201, body = DiningTable)),
    security(("api_jwt" = [])),
    tag = "Floor"
)]
pub async fn create_table(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<CreateTablePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let table = app_state
        .table_repo
        .create_table(&app_state.db_pool, payload.number, payload.capacity)
        .await?;

    Ok((StatusCode::CREATED, Json(table)))
}

/// Sobrescrita direta do status da mesa (recepção marcando reserva,
/// gerência corrigindo o salão). Os fluxos de comanda/pagamento mexem
/// na mesa por conta própria, dentro das suas transações.
#[utoipa::path(
    put,
    path = "/api/tables/{id}/status",
    params(("id" = Uuid, Path, description = "ID da mesa")),
    request_body = UpdateTableStatusPayload,
    responses((status = 200, body = DiningTable)),
    security(("api_jwt" = [])),
    tag = "Floor"
)]
pub async fn update_table_status(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTableStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let table = app_state
        .table_repo
        .update_status(&app_state.db_pool, id, payload.status, payload.order_id)
        .await?;

    Ok(Json(table))
}
