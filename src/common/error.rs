// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Falha de uma regra da cadeia ordenada de validação do cadastro de peças.
    // A primeira regra que falha interrompe a cadeia, então cada erro carrega
    // exatamente um campo e uma mensagem.
    #[error("Campo inválido '{field}': {message}")]
    FieldValidation { field: String, message: String },

    // O SAP informado difere do próximo número da sequência. Recuperável:
    // o cliente pode reenviar com `force: true` ou adotar o valor esperado.
    #[error("SAP fora de sequência (informado {entered}, esperado {expected})")]
    SapSequenceMismatch { entered: String, expected: String },

    #[error("Conflito com o estado atual do servidor")]
    Conflict(String),

    #[error("Permissão insuficiente para '{0}'")]
    PermissionDenied(String),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Registro não encontrado")]
    NotFound,

    // Sessões de stock take aprovadas ou rejeitadas são somente leitura.
    #[error("A sessão de stock take já foi encerrada")]
    SessionClosed,

    #[error("A nova senha não pode repetir nenhuma das 5 últimas")]
    PasswordReuse,

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::FieldValidation { field, message } => {
                let body = Json(json!({
                    "error": message,
                    "field": field,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            // O corpo carrega o valor esperado para o cliente poder oferecer
            // "usar o número calculado" ou reenviar com force.
            AppError::SapSequenceMismatch { entered, expected } => {
                let body = Json(json!({
                    "error": "O número SAP informado está fora da sequência.",
                    "entered": entered,
                    "expected": expected,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::Conflict(msg) => {
                let body = Json(json!({ "error": msg }));
                return (StatusCode::CONFLICT, body).into_response();
            }
            AppError::PermissionDenied(resource) => {
                let body = Json(json!({
                    "error": format!("Permissão insuficiente para acessar '{}'.", resource),
                }));
                return (StatusCode::FORBIDDEN, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::NotFound => (StatusCode::NOT_FOUND, "Registro não encontrado."),
            AppError::SessionClosed => (StatusCode::CONFLICT, "Esta sessão de stock take já foi encerrada."),
            AppError::PasswordReuse => (StatusCode::CONFLICT, "A nova senha não pode repetir nenhuma das 5 últimas."),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` vai logar a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
