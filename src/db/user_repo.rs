// src/db/user_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{PasswordHistoryEntry, User},
};

// Quantas senhas anteriores ficam retidas para o bloqueio de reuso.
pub const PASSWORD_HISTORY_LIMIT: i64 = 5;

// O repositório de usuários, responsável por todas as interações com a tabela 'users'
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password_hash: &str,
        username: &str,
        department: &str,
        group_id: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, username, department, group_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .bind(department)
        .bind(group_id)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    pub async fn update_password<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
            .bind(user_id)
            .bind(password_hash)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Histórico de senhas
    // ---

    // As hashes mais recentes primeiro, já limitadas às 5 retidas.
    pub async fn recent_password_hashes(&self, user_id: Uuid) -> Result<Vec<String>, AppError> {
        let entries = sqlx::query_as::<_, PasswordHistoryEntry>(
            "SELECT * FROM user_password_history
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(user_id)
        .bind(PASSWORD_HISTORY_LIMIT)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries.into_iter().map(|e| e.password_hash).collect())
    }

    // Registra a hash recém-adotada e poda o histórico para o limite.
    // Recebe a conexão da transação porque são duas instruções dependentes.
    pub async fn push_password_hash(
        &self,
        conn: &mut sqlx::PgConnection,
        user_id: Uuid,
        password_hash: &str,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_password_history (user_id, password_hash) VALUES ($1, $2)",
        )
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            "DELETE FROM user_password_history
             WHERE user_id = $1
               AND id NOT IN (
                   SELECT id FROM user_password_history
                   WHERE user_id = $1
                   ORDER BY created_at DESC
                   LIMIT $2
               )",
        )
        .bind(user_id)
        .bind(PASSWORD_HISTORY_LIMIT)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }
}
