// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        AbsenceRepository, CatalogRepository, CreditRepository, OrderRepository,
        PaymentRepository, ReportsRepository, SessionRepository, TableRepository, UserRepository,
    },
    services::{
        auth::AuthService, order_service::OrderService, payment_service::PaymentService,
        report_service::ReportService, session_service::SessionService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação.
// CRUD simples fala direto com os repositórios; os fluxos com
// transação (turno, comanda, pagamento) passam pelos serviços.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    pub auth_service: AuthService,
    pub session_service: SessionService,
    pub order_service: OrderService,
    pub payment_service: PaymentService,
    pub report_service: ReportService,

    pub table_repo: TableRepository,
    pub catalog_repo: CatalogRepository,
    pub credit_repo: CreditRepository,
    pub absence_repo: AbsenceRepository,
    pub payment_repo: PaymentRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        let db_pool = Self::connect_with_retry(&database_url).await?;
        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Ok(Self::from_parts(db_pool, jwt_secret))
    }

    /// Monta o estado a partir de um pool já conectado (os testes de
    /// integração usam este caminho com seu próprio banco).
    pub fn from_parts(db_pool: PgPool, jwt_secret: String) -> Self {
        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let session_repo = SessionRepository::new(db_pool.clone());
        let table_repo = TableRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let credit_repo = CreditRepository::new(db_pool.clone());
        let absence_repo = AbsenceRepository::new(db_pool.clone());
        let reports_repo = ReportsRepository::new(db_pool.clone());

        let auth_service =
            AuthService::new(user_repo.clone(), jwt_secret.clone(), db_pool.clone());
        let session_service = SessionService::new(session_repo.clone(), db_pool.clone());
        let order_service = OrderService::new(
            order_repo.clone(),
            catalog_repo.clone(),
            table_repo.clone(),
            session_repo.clone(),
            db_pool.clone(),
        );
        let payment_service = PaymentService::new(
            payment_repo.clone(),
            order_repo,
            table_repo.clone(),
            credit_repo.clone(),
            session_repo,
            db_pool.clone(),
        );
        let report_service = ReportService::new(reports_repo, db_pool.clone());

        Self {
            db_pool,
            jwt_secret,
            auth_service,
            session_service,
            order_service,
            payment_service,
            report_service,
            table_repo,
            catalog_repo,
            credit_repo,
            absence_repo,
            payment_repo,
        }
    }

    // Pool limitado (min/max + timeouts). Se a primeira conexão falhar,
    // espera um pouco e tenta UMA vez mais; falhou de novo, o boot para.
    async fn connect_with_retry(database_url: &str) -> anyhow::Result<PgPool> {
        let options = || {
            PgPoolOptions::new()
                .min_connections(1)
                .max_connections(5)
                .acquire_timeout(Duration::from_secs(3))
                .idle_timeout(Duration::from_secs(600))
        };

        match options().connect(database_url).await {
            Ok(pool) => Ok(pool),
            Err(e) => {
                tracing::error!("🔥 Falha ao conectar ao banco de dados: {:?}", e);
                tokio::time::sleep(Duration::from_secs(5)).await;
                let pool = options().connect(database_url).await?;
                Ok(pool)
            }
        }
    }
}
