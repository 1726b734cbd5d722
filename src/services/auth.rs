// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{GroupRepository, UserRepository},
    models::auth::{Claims, CurrentUser, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    group_repo: GroupRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        group_repo: GroupRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, group_repo, jwt_secret, pool }
    }

    pub async fn register_user(
        &self,
        email: &str,
        password: &str,
        username: &str,
        department: &str,
        group_id: &str,
    ) -> Result<String, AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        // O grupo precisa existir; do contrário o FK estouraria com um erro
        // opaco de banco.
        if self.group_repo.get(group_id).await?.is_none() {
            return Err(AppError::FieldValidation {
                field: "groupId".to_string(),
                message: format!("O grupo '{}' não existe.", group_id),
            });
        }

        // Hashing fora da transação, em thread separado (bcrypt é caro).
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        // Criação do usuário e primeira entrada do histórico de senhas na
        // mesma transação.
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, &hashed_password, username, department, group_id)
            .await?;

        self.user_repo
            .push_password_hash(&mut tx, new_user.id, &hashed_password)
            .await?;

        tx.commit().await?;

        tracing::info!("Usuário {} registrado no grupo {}.", new_user.email, group_id);
        self.create_token(new_user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    /// Valida o token e monta o CurrentUser da requisição: o registro do
    /// usuário mais o mapa dinâmico de permissões do grupo, lido aqui a cada
    /// requisição. Edições de grupo valem na próxima requisição, sem
    /// invalidação de sessão.
    pub async fn validate_token(&self, token: &str) -> Result<CurrentUser, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let group_permissions = match self.group_repo.get(&user.group_id).await? {
            Some(group) => group.resource_access.0,
            None => Default::default(),
        };

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            username: user.username,
            department: user.department,
            group_id: user.group_id,
            group_permissions,
        })
    }

    /// Troca de senha: exige a senha atual correta e recusa qualquer uma das
    /// 5 últimas senhas do usuário.
    pub async fn change_password(
        &self,
        user_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let current_clone = current_password.to_owned();
        let hash_clone = user.password_hash.clone();
        let current_ok =
            tokio::task::spawn_blocking(move || verify(&current_clone, &hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !current_ok {
            return Err(AppError::InvalidCredentials);
        }

        // bcrypt gera salt por hash; a comparação tem que ser verify() contra
        // cada hash retida, nunca igualdade de strings.
        let history = self.user_repo.recent_password_hashes(user_id).await?;
        let new_clone = new_password.to_owned();
        let reused = tokio::task::spawn_blocking(move || {
            for old_hash in &history {
                match verify(&new_clone, old_hash) {
                    Ok(true) => return Ok(true),
                    Ok(false) => continue,
                    Err(e) => return Err(e),
                }
            }
            Ok(false)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de histórico: {}", e))??;

        if reused {
            return Err(AppError::PasswordReuse);
        }

        let new_clone = new_password.to_owned();
        let new_hash =
            tokio::task::spawn_blocking(move || hash(&new_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let mut tx = self.pool.begin().await?;
        self.user_repo.update_password(&mut *tx, user_id, &new_hash).await?;
        self.user_repo.push_password_hash(&mut tx, user_id, &new_hash).await?;
        tx.commit().await?;

        tracing::info!("Senha do usuário {} alterada.", user_id);
        Ok(())
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
