// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    models::auth::{Role, User},
};

/// 1. O Trait que define quem pode passar pelo guardião
pub trait RoleGuard: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
    /// Nome do papel exigido, usado na mensagem do 403.
    fn describe() -> &'static str;
}

/// 2. O Extractor (Guardião). Exige o auth_guard antes na pilha:
/// sem usuário nos extensions, responde 401.
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleGuard,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts.extensions.get::<User>().ok_or(AppError::InvalidToken)?;

        if !T::allows(user.role) {
            return Err(AppError::InsufficientRole(T::describe()));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DOS GUARDIÕES (a matriz de autorização)
// ---

/// Abrir/encerrar turno e registrar pagamentos: só o caixa.
pub struct CashierOnly;
impl RoleGuard for CashierOnly {
    fn allows(role: Role) -> bool {
        role == Role::Cashier
    }
    fn describe() -> &'static str {
        "caixa"
    }
}

/// Cadastro de produtos, mesas, categorias e relatórios: só o gerente.
pub struct ManagerOnly;
impl RoleGuard for ManagerOnly {
    fn allows(role: Role) -> bool {
        role == Role::Manager
    }
    fn describe() -> &'static str {
        "gerente"
    }
}

/// Abrir comandas e cadastrar clientes fiado: caixa ou garçom.
pub struct OrderStaff;
impl RoleGuard for OrderStaff {
    fn allows(role: Role) -> bool {
        matches!(role, Role::Cashier | Role::Server)
    }
    fn describe() -> &'static str {
        "caixa ou garçom"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_matrix() {
        // caixa
        assert!(CashierOnly::allows(Role::Cashier));
        assert!(!CashierOnly::allows(Role::Server));
        assert!(!CashierOnly::allows(Role::Manager));

        // gerente
        assert!(ManagerOnly::allows(Role::Manager));
        assert!(!ManagerOnly::allows(Role::Cashier));

        // comandas: caixa e garçom, nunca o gerente
        assert!(OrderStaff::allows(Role::Cashier));
        assert!(OrderStaff::allows(Role::Server));
        assert!(!OrderStaff::allows(Role::Manager));
    }
}
