// src/lib.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

/// Migrações embutidas no binário; rodam no boot e nos testes.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();

// Monta o router completo da aplicação. Cada domínio vive em um
// sub-router protegido pelo auth_guard; os guardiões de papel ficam
// nos handlers, como extratores.
pub fn router(app_state: AppState) -> Router {
    // Rotas de autenticação: /logout e /user exigem token,
    // /register e /login são públicas.
    let auth_routes = Router::new()
        .route("/logout", post(handlers::auth::logout))
        .route("/user", get(handlers::auth::get_current_user))
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let session_routes = Router::new()
        .route("/active", get(handlers::sessions::get_active_session))
        .route("/", post(handlers::sessions::open_session))
        .route("/{id}/end", post(handlers::sessions::end_session))
        .route("/{id}/stats", get(handlers::sessions::session_stats))
        .route("/{id}/payments", get(handlers::sessions::session_payments))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let table_routes = Router::new()
        .route(
            "/",
            get(handlers::tables::list_tables).post(handlers::tables::create_table),
        )
        .route("/{id}/status", put(handlers::tables::update_table_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let category_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_categories).post(handlers::catalog::create_category),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::catalog::list_products).post(handlers::catalog::create_product),
        )
        .route("/low-stock", get(handlers::catalog::list_low_stock))
        .route("/{id}", put(handlers::catalog::update_product))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let credit_routes = Router::new()
        .route(
            "/",
            get(handlers::credit::list_credit_clients).post(handlers::credit::create_credit_client),
        )
        .route(
            "/{id}/payments",
            post(handlers::credit::create_credit_repayment),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let order_routes = Router::new()
        .route(
            "/",
            get(handlers::orders::list_orders).post(handlers::orders::create_order),
        )
        .route("/pending", get(handlers::orders::list_pending_orders))
        .route("/{id}", get(handlers::orders::get_order))
        .route("/{id}/items", post(handlers::orders::add_order_item))
        .route("/{id}/status", put(handlers::orders::update_order_status))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let payment_routes = Router::new()
        .route("/", post(handlers::payments::create_payment))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let report_routes = Router::new()
        .route("/top-products", get(handlers::reports::top_products))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let absence_routes = Router::new()
        .route(
            "/",
            get(handlers::absences::list_absences).post(handlers::absences::create_absence),
        )
        .route("/{id}/approve", post(handlers::absences::approve_absence))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/sessions", session_routes)
        .nest("/api/tables", table_routes)
        .nest("/api/categories", category_routes)
        .nest("/api/products", product_routes)
        .nest("/api/credit-clients", credit_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/payments", payment_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/absences", absence_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state)
}
