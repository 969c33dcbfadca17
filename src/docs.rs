// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::get_current_user,

        // --- Sessions ---
        handlers::sessions::get_active_session,
        handlers::sessions::open_session,
        handlers::sessions::end_session,
        handlers::sessions::session_stats,
        handlers::sessions::session_payments,

        // --- Floor ---
        handlers::tables::list_tables,
        handlers::tables::create_table,
        handlers::tables::update_table_status,

        // --- Catalog ---
        handlers::catalog::list_categories,
        handlers::catalog::create_category,
        handlers::catalog::list_products,
        handlers::catalog::list_low_stock,
        handlers::catalog::create_product,
        handlers::catalog::update_product,

        // --- Credit ---
        handlers::credit::list_credit_clients,
        handlers::credit::create_credit_client,
        handlers::credit::create_credit_repayment,

        // --- Orders ---
        handlers::orders::list_orders,
        handlers::orders::list_pending_orders,
        handlers::orders::get_order,
        handlers::orders::create_order,
        handlers::orders::add_order_item,
        handlers::orders::update_order_status,

        // --- Payments ---
        handlers::payments::create_payment,

        // --- Reports ---
        handlers::reports::top_products,

        // --- Absences ---
        handlers::absences::list_absences,
        handlers::absences::create_absence,
        handlers::absences::approve_absence,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Sessions ---
            models::sessions::ShiftType,
            models::sessions::BarSession,
            models::sessions::SessionStats,
            handlers::sessions::OpenSessionPayload,

            // --- Floor ---
            models::floor::TableStatus,
            models::floor::DiningTable,
            handlers::tables::CreateTablePayload,
            handlers::tables::UpdateTableStatusPayload,

            // --- Catalog ---
            models::catalog::Category,
            models::catalog::Product,
            handlers::catalog::CreateCategoryPayload,
            handlers::catalog::CreateProductPayload,
            handlers::catalog::UpdateProductPayload,

            // --- Credit ---
            models::credit::CreditClient,
            handlers::credit::CreateCreditClientPayload,
            handlers::credit::CreditRepaymentPayload,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::OrderItem,
            models::orders::OrderItemDetail,
            models::orders::OrderDetail,
            handlers::orders::OrderItemPayload,
            handlers::orders::CreateOrderPayload,
            handlers::orders::AddOrderItemPayload,
            handlers::orders::UpdateOrderStatusPayload,

            // --- Payments ---
            models::payments::PaymentMethod,
            models::payments::Payment,
            handlers::payments::CreatePaymentPayload,

            // --- Reports ---
            models::reports::TopProductEntry,

            // --- Absences ---
            models::absences::Absence,
            handlers::absences::CreateAbsencePayload,
            handlers::absences::ApproveAbsencePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e cadastro de funcionários"),
        (name = "Sessions", description = "Turnos de caixa"),
        (name = "Floor", description = "Mesas do salão"),
        (name = "Catalog", description = "Categorias, produtos e estoque"),
        (name = "Credit", description = "Clientes fiado e abatimentos"),
        (name = "Orders", description = "Comandas e itens"),
        (name = "Payments", description = "Pagamentos de comandas"),
        (name = "Reports", description = "Relatórios gerenciais"),
        (name = "Absences", description = "Pedidos de ausência")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
