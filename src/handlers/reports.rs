// src/handlers/reports.rs

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::ManagerOnly, rbac::RequireRole},
    models::reports::TopProductEntry,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TopProductsQuery {
    /// Dia do relatório (YYYY-MM-DD).
    pub date: NaiveDate,
}

#[utoipa::path(
    get,
    path = "/api/reports/top-products",
    params(TopProductsQuery),
    responses((status = 200, body = [TopProductEntry])),
    security(("api_jwt" = [])),
    tag = "Reports"
)]
pub async fn top_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Query(query): Query<TopProductsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let entries = app_state.report_service.top_products(query.date).await?;
    Ok(Json(entries))
}
