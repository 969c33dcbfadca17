// src/services/report_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{common::error::AppError, db::ReportsRepository, models::reports::TopProductEntry};

#[derive(Clone)]
pub struct ReportService {
    repo: ReportsRepository,
    pool: PgPool,
}

impl ReportService {
    pub fn new(repo: ReportsRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn top_products(&self, date: NaiveDate) -> Result<Vec<TopProductEntry>, AppError> {
        self.repo.top_products_by_date(&self.pool, date).await
    }
}
