// src/handlers/catalog.rs

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
    middleware::{auth::AuthenticatedUser, rbac::ManagerOnly, rbac::RequireRole},
    models::catalog::{Category, Product},
};

// ---
// Validação customizada
// ---
fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Categorias
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses((status = 200, body = [Category])),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.catalog_repo.list_categories().await?;
    Ok(Json(categories))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryPayload,
    responses((status = 201, body = Category)),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state
        .catalog_repo
        .create_category(&app_state.db_pool, &payload.name)
        .await?;

    Ok((StatusCode::CREATED, Json(category)))
}

// ---
// Produtos
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    pub category_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub stock_quantity: i32,

    #[validate(range(min = 0, message = "O limiar não pode ser negativo."))]
    #[serde(default)]
    pub min_stock_level: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub stock_quantity: i32,

    #[validate(range(min = 0, message = "O limiar não pode ser negativo."))]
    pub min_stock_level: i32,

    pub is_active: bool,
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses((status = 200, body = [Product])),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_repo.list_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    responses((status = 200, body = [Product])),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.catalog_repo.list_low_stock_products().await?;
    Ok(Json(products))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses((status = 201, body = Product)),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    if !app_state
        .catalog_repo
        .category_exists(&app_state.db_pool, payload.category_id)
        .await?
    {
        return Err(AppError::CategoryNotFound);
    }

    let product = app_state
        .catalog_repo
        .create_product(
            &app_state.db_pool,
            payload.category_id,
            &payload.name,
            payload.price,
            payload.stock_quantity,
            payload.min_stock_level,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses((status = 200, body = Product)),
    security(("api_jwt" = [])),
    tag = "Catalog"
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireRole<ManagerOnly>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state
        .catalog_repo
        .update_product(
            &app_state.db_pool,
            id,
            &payload.name,
            payload.price,
            payload.stock_quantity,
            payload.min_stock_level,
            payload.is_active,
        )
        .await?;

    Ok(Json(product))
}
