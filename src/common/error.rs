use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Autenticação / Autorização ---
    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Permissão insuficiente: requer {0}")]
    InsufficientRole(&'static str),

    #[error("Usuário não encontrado")]
    UserNotFound,

    // --- Turnos (sessões de caixa) ---
    #[error("Turno não encontrado")]
    SessionNotFound,

    #[error("Já existe um turno aberto para este caixa")]
    SessionAlreadyOpen,

    #[error("Este turno já foi encerrado")]
    SessionAlreadyClosed,

    #[error("O turno pertence a outro caixa")]
    SessionNotOwned,

    #[error("Nenhum turno aberto no momento")]
    NoActiveSession,

    // --- Mesas ---
    #[error("Mesa não encontrada")]
    TableNotFound,

    #[error("Já existe uma mesa com este número")]
    TableNumberAlreadyExists,

    #[error("A mesa já está ocupada por outra comanda")]
    TableOccupied,

    // --- Catálogo ---
    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Categoria já existe")]
    CategoryNameAlreadyExists,

    #[error("Produto não encontrado")]
    ProductNotFound,

    #[error("Produto inativo: {0}")]
    ProductInactive(String),

    #[error("Estoque insuficiente para o produto: {0}")]
    InsufficientStock(String),

    // --- Comandas ---
    #[error("Comanda não encontrada")]
    OrderNotFound,

    #[error("A comanda precisa de pelo menos um item")]
    EmptyOrder,

    #[error("A comanda já foi fechada")]
    OrderAlreadyClosed,

    #[error("Transição de status inválida")]
    InvalidStatusTransition,

    // --- Pagamentos ---
    #[error("O valor do pagamento deve ser maior que zero")]
    InvalidPaymentAmount,

    #[error("Valor recebido insuficiente")]
    InsufficientCash,

    #[error("Pagamento fiado exige um cliente de crédito")]
    MissingCreditClient,

    // --- Clientes de crédito ---
    #[error("Cliente de crédito não encontrado")]
    CreditClientNotFound,

    #[error("Cliente de crédito inativo")]
    CreditClientInactive,

    #[error("Limite de crédito excedido")]
    CreditLimitExceeded,

    #[error("O abatimento excede o saldo devedor do cliente")]
    RepaymentExceedsDebt,

    // --- Ausências ---
    #[error("Pedido de ausência não encontrado")]
    AbsenceNotFound,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Usuário ou senha inválidos.".to_string())
            }
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::InsufficientRole(role) => (
                StatusCode::FORBIDDEN,
                format!("Você precisa do papel '{}' para realizar esta ação.", role),
            ),
            AppError::SessionNotOwned => {
                (StatusCode::FORBIDDEN, "O turno pertence a outro caixa.".to_string())
            }

            AppError::UserNotFound
            | AppError::SessionNotFound
            | AppError::TableNotFound
            | AppError::CategoryNotFound
            | AppError::ProductNotFound
            | AppError::OrderNotFound
            | AppError::CreditClientNotFound
            | AppError::AbsenceNotFound => (StatusCode::NOT_FOUND, self.to_string()),

            AppError::UsernameAlreadyExists
            | AppError::SessionAlreadyOpen
            | AppError::SessionAlreadyClosed
            | AppError::NoActiveSession
            | AppError::TableNumberAlreadyExists
            | AppError::TableOccupied
            | AppError::CategoryNameAlreadyExists
            | AppError::ProductInactive(_)
            | AppError::InsufficientStock(_)
            | AppError::OrderAlreadyClosed
            | AppError::InvalidStatusTransition
            | AppError::CreditClientInactive
            | AppError::CreditLimitExceeded => (StatusCode::CONFLICT, self.to_string()),

            AppError::EmptyOrder
            | AppError::InvalidPaymentAmount
            | AppError::InsufficientCash
            | AppError::MissingCreditClient
            | AppError::RepaymentExceedsDebt => (StatusCode::BAD_REQUEST, self.to_string()),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
