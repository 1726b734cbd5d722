// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{GroupRepository, PartRepository, StockTakeRepository, UserRepository},
    services::{AuthService, PartService, RbacService, StockTakeService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub rbac_service: RbacService,
    pub part_service: PartService,
    pub stock_take_service: StockTakeService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| anyhow::anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret =
            env::var("JWT_SECRET").map_err(|_| anyhow::anyhow!("JWT_SECRET deve ser definido"))?;

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let group_repo = GroupRepository::new(db_pool.clone());
        let part_repo = PartRepository::new(db_pool.clone());
        let stock_take_repo = StockTakeRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo,
            group_repo.clone(),
            jwt_secret,
            db_pool.clone(),
        );
        let rbac_service = RbacService::new(group_repo);
        let part_service = PartService::new(part_repo.clone(), db_pool.clone());
        let stock_take_service =
            StockTakeService::new(stock_take_repo, part_repo, db_pool.clone());

        Ok(Self {
            db_pool,
            auth_service,
            rbac_service,
            part_service,
            stock_take_service,
        })
    }
}
