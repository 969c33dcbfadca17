// src/services/session_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SessionRepository,
    models::{
        auth::User,
        sessions::{BarSession, SessionStats, ShiftType},
    },
};

#[derive(Clone)]
pub struct SessionService {
    repo: SessionRepository,
    pool: PgPool,
}

impl SessionService {
    pub fn new(repo: SessionRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn get_active(&self, user_id: Uuid) -> Result<Option<BarSession>, AppError> {
        self.repo.get_active_session(user_id).await
    }

    /// Abre um turno para o caixa. Decisão registrada: um segundo turno
    /// com um já aberto é REJEITADO (409), não reaproveitado.
    pub async fn open_shift(
        &self,
        user: &User,
        shift_type: ShiftType,
    ) -> Result<BarSession, AppError> {
        self.repo.create_session(&self.pool, user.id, shift_type).await
    }

    /// Encerra o turno do próprio caixa, congelando os totais em uma
    /// única transação (agregado + update juntos).
    pub async fn close_shift(&self, user: &User, session_id: Uuid) -> Result<BarSession, AppError> {
        let session = self
            .repo
            .find_by_id(session_id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        if session.user_id != user.id {
            return Err(AppError::SessionNotOwned);
        }
        if !session.is_active {
            return Err(AppError::SessionAlreadyClosed);
        }

        self.repo.close_session(&self.pool, session_id).await
    }

    pub async fn stats(&self, session_id: Uuid) -> Result<SessionStats, AppError> {
        // Garante 404 para turno inexistente antes de agregar.
        self.repo
            .find_by_id(session_id)
            .await?
            .ok_or(AppError::SessionNotFound)?;

        self.repo.get_session_stats(&self.pool, session_id).await
    }
}
