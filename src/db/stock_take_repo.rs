// src/db/stock_take_repo.rs

use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::stock_take::{CountEntry, StockTakeSession, StockTakeStatus},
};

#[derive(Clone)]
pub struct StockTakeRepository {
    pool: PgPool,
}

impl StockTakeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<StockTakeSession>, AppError> {
        let sessions = sqlx::query_as::<_, StockTakeSession>(
            "SELECT * FROM stock_take_sessions ORDER BY year DESC, month DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sessions)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<StockTakeSession>, AppError> {
        let session =
            sqlx::query_as::<_, StockTakeSession>("SELECT * FROM stock_take_sessions WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(session)
    }

    pub async fn find_open(&self, month: i32, year: i32) -> Result<Option<StockTakeSession>, AppError> {
        let session = sqlx::query_as::<_, StockTakeSession>(
            "SELECT * FROM stock_take_sessions WHERE month = $1 AND year = $2 AND status = 'OPEN'",
        )
        .bind(month)
        .bind(year)
        .fetch_optional(&self.pool)
        .await?;
        Ok(session)
    }

    pub async fn insert(
        &self,
        month: i32,
        year: i32,
        started_by: &str,
        items: &[CountEntry],
    ) -> Result<StockTakeSession, AppError> {
        let session = sqlx::query_as::<_, StockTakeSession>(
            "INSERT INTO stock_take_sessions (month, year, started_by, items)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(month)
        .bind(year)
        .bind(started_by)
        .bind(Json(items))
        .fetch_one(&self.pool)
        .await?;
        Ok(session)
    }

    // Persiste o progresso da contagem enquanto a sessão está aberta.
    pub async fn save_items(
        &self,
        id: Uuid,
        items: &[CountEntry],
    ) -> Result<StockTakeSession, AppError> {
        let session = sqlx::query_as::<_, StockTakeSession>(
            "UPDATE stock_take_sessions
             SET items = $2, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(Json(items))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(session)
    }

    // Flip final do estado, dentro da transação de aprovação.
    pub async fn mark_approved<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        items: &[CountEntry],
        approval_comments: &str,
        approved_at: DateTime<Utc>,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            "UPDATE stock_take_sessions
             SET status = $2, items = $3, approval_comments = $4, approved_at = $5,
                 updated_at = now()
             WHERE id = $1",
        )
        .bind(id)
        .bind(StockTakeStatus::Approved)
        .bind(Json(items))
        .bind(approval_comments)
        .bind(approved_at)
        .execute(executor)
        .await?;
        Ok(())
    }

    // Rejeição apaga a sessão em definitivo. Sem efeitos de estoque.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM stock_take_sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }
}
