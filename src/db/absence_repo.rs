// src/db/absence_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::absences::Absence};

#[derive(Clone)]
pub struct AbsenceRepository {
    pool: PgPool,
}

impl AbsenceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_absences(&self) -> Result<Vec<Absence>, AppError> {
        let absences =
            sqlx::query_as::<_, Absence>("SELECT * FROM absences ORDER BY start_date DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(absences)
    }

    pub async fn create_absence<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<&str>,
    ) -> Result<Absence, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let absence = sqlx::query_as::<_, Absence>(
            r#"
            INSERT INTO absences (user_id, start_date, end_date, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(start_date)
        .bind(end_date)
        .bind(reason)
        .fetch_one(executor)
        .await?;
        Ok(absence)
    }

    pub async fn set_approval<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        approved: bool,
        approver_id: Uuid,
    ) -> Result<Absence, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let absence = sqlx::query_as::<_, Absence>(
            r#"
            UPDATE absences
            SET is_approved = $2, approved_by = $3
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(approved)
        .bind(approver_id)
        .fetch_optional(executor)
        .await?;

        absence.ok_or(AppError::AbsenceNotFound)
    }
}
