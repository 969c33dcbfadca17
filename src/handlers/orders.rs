// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, rbac::OrderStaff, rbac::RequireRole},
    models::orders::{Order, OrderDetail, OrderItem, OrderStatus},
};

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser positiva."))]
    pub quantity: i32,
}

// O total NUNCA vem do cliente: é recalculado no servidor a partir
// dos preços fotografados dos itens.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    pub table_id: Uuid,

    #[validate(length(min = 1, message = "A comanda precisa de pelo menos um item."))]
    #[validate(nested)]
    pub items: Vec<OrderItemPayload>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddOrderItemPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, message = "A quantidade deve ser positiva."))]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderStatusPayload {
    pub status: OrderStatus,
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, body = [OrderDetail])),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list_orders().await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/pending",
    responses((status = 200, body = [OrderDetail])),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn list_pending_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let orders = app_state.order_service.list_pending().await?;
    Ok(Json(orders))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(("id" = Uuid, Path, description = "ID da comanda")),
    responses((status = 200, body = OrderDetail), (status = 404, description = "Comanda não encontrada")),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.get_order(id).await?;
    Ok(Json(order))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, body = Order),
        (status = 409, description = "Mesa ocupada, sem turno aberto ou estoque insuficiente")
    ),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireRole<OrderStaff>,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let items: Vec<(Uuid, i32)> = payload
        .items
        .iter()
        .map(|i| (i.product_id, i.quantity))
        .collect();

    let order = app_state
        .order_service
        .place_order(&user.0, payload.table_id, &items, payload.notes.as_deref())
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/items",
    params(("id" = Uuid, Path, description = "ID da comanda")),
    request_body = AddOrderItemPayload,
    responses((status = 201, body = OrderItem)),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn add_order_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AddOrderItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .order_service
        .add_item(id, payload.product_id, payload.quantity)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/orders/{id}/status",
    params(("id" = Uuid, Path, description = "ID da comanda")),
    request_body = UpdateOrderStatusPayload,
    responses((status = 200, body = Order), (status = 409, description = "Transição inválida")),
    security(("api_jwt" = [])),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusPayload>,
) -> Result<impl IntoResponse, AppError> {
    let order = app_state.order_service.transition(id, payload.status).await?;
    Ok(Json(order))
}
