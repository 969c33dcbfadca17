// src/handlers/auth.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::auth::{AuthResponse, LoginUserPayload, RegisterUserPayload, User},
};

// Handler de cadastro de funcionário
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterUserPayload,
    responses((status = 201, body = AuthResponse)),
    tag = "Auth"
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .register_user(
            &payload.username,
            &payload.display_name,
            &payload.password,
            payload.role,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginUserPayload,
    responses((status = 200, body = AuthResponse), (status = 401, description = "Credenciais inválidas")),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.username, &payload.password, payload.role)
        .await?;

    Ok(Json(AuthResponse { token, user }))
}

// Logout é um aceno: o token é stateless, quem descarta é o cliente.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 200)),
    security(("api_jwt" = [])),
    tag = "Auth"
)]
pub async fn logout(AuthenticatedUser(_user): AuthenticatedUser) -> impl IntoResponse {
    Json(json!({ "message": "Sessão encerrada." }))
}

// Handler da rota protegida /user
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses((status = 200, body = User), (status = 401, description = "Não autenticado")),
    security(("api_jwt" = [])),
    tag = "Auth"
)]
pub async fn get_current_user(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}
