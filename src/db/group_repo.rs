// src/db/group_repo.rs

use sqlx::types::Json;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::rbac::{LegacyPermissions, ResourceAccessMap, UserGroup},
};

#[derive(Clone)]
pub struct GroupRepository {
    pool: PgPool,
}

impl GroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, group_id: &str) -> Result<Option<UserGroup>, AppError> {
        let group =
            sqlx::query_as::<_, UserGroup>("SELECT * FROM user_groups WHERE group_id = $1")
                .bind(group_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(group)
    }

    pub async fn list_all(&self) -> Result<Vec<UserGroup>, AppError> {
        let groups =
            sqlx::query_as::<_, UserGroup>("SELECT * FROM user_groups ORDER BY group_id ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(groups)
    }

    // Upsert usado pelo sync de startup: cria o grupo quando ausente; quando
    // já existe, atualiza apenas name/permissions/updated_at. description e
    // department são preenchidos só na criação e nunca sobrescritos, pois
    // podem ter sido editados pela administração.
    pub async fn upsert_seed(
        &self,
        group_id: &str,
        name: &str,
        description: &str,
        permissions: &LegacyPermissions,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_groups (group_id, name, description, permissions)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (group_id) DO UPDATE
             SET name = EXCLUDED.name,
                 permissions = EXCLUDED.permissions,
                 updated_at = now()",
        )
        .bind(group_id)
        .bind(name)
        .bind(description)
        .bind(Json(permissions))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // Edição administrativa: campos opcionais, só os enviados mudam.
    pub async fn update_group(
        &self,
        group_id: &str,
        name: Option<&str>,
        description: Option<&str>,
        department: Option<&str>,
        resource_access: Option<&ResourceAccessMap>,
    ) -> Result<UserGroup, AppError> {
        let group = sqlx::query_as::<_, UserGroup>(
            "UPDATE user_groups
             SET name = COALESCE($2, name),
                 description = COALESCE($3, description),
                 department = COALESCE($4, department),
                 resource_access = COALESCE($5, resource_access),
                 updated_at = now()
             WHERE group_id = $1
             RETURNING *",
        )
        .bind(group_id)
        .bind(name)
        .bind(description)
        .bind(department)
        .bind(resource_access.map(Json))
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(group)
    }
}
