// src/handlers/stock_take.rs

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    middleware::rbac::{RequireAccess, StockTakeAdd, StockTakeEdit, StockTakeView},
    models::stock_take::{
        ApprovePayload, OpenSessionPayload, SaveProgressPayload, StockTakeSession, VarianceReport,
    },
};

#[utoipa::path(
    get,
    path = "/api/stock-take",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Todas as sessões, mais recentes primeiro", body = [StockTakeSession]),
    )
)]
pub async fn list_sessions(
    _guard: RequireAccess<StockTakeView>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<StockTakeSession>>, AppError> {
    let sessions = app_state.stock_take_service.list_sessions().await?;
    Ok(Json(sessions))
}

#[utoipa::path(
    post,
    path = "/api/stock-take",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    request_body = OpenSessionPayload,
    responses(
        (status = 201, description = "Sessão aberta com o snapshot corrente", body = StockTakeSession),
        (status = 409, description = "Já existe sessão aberta para o período"),
    )
)]
pub async fn open_session(
    _guard: RequireAccess<StockTakeAdd>,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Json(payload): Json<OpenSessionPayload>,
) -> Result<(StatusCode, Json<StockTakeSession>), AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let session = app_state
        .stock_take_service
        .open_session(payload.month, payload.year, &user.username)
        .await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/stock-take/{id}",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "A sessão", body = StockTakeSession),
        (status = 404, description = "Sessão não encontrada"),
    )
)]
pub async fn get_session(
    _guard: RequireAccess<StockTakeView>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StockTakeSession>, AppError> {
    let session = app_state.stock_take_service.get_session(id).await?;
    Ok(Json(session))
}

// Salva o progresso da contagem. Só em sessão aberta.
#[utoipa::path(
    put,
    path = "/api/stock-take/{id}/items",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    request_body = SaveProgressPayload,
    responses(
        (status = 200, description = "Progresso salvo", body = StockTakeSession),
        (status = 409, description = "Sessão já encerrada"),
    )
)]
pub async fn save_progress(
    _guard: RequireAccess<StockTakeEdit>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SaveProgressPayload>,
) -> Result<Json<StockTakeSession>, AppError> {
    let session = app_state
        .stock_take_service
        .save_progress(id, payload.items)
        .await?;
    Ok(Json(session))
}

#[utoipa::path(
    get,
    path = "/api/stock-take/{id}/variance",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "Variância por item e totais por classe", body = VarianceReport),
    )
)]
pub async fn variance_report(
    _guard: RequireAccess<StockTakeView>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<VarianceReport>, AppError> {
    let report = app_state.stock_take_service.variance_report(id).await?;
    Ok(Json(report))
}

// Aprovação: ajusta o estoque pelo contado, registra os ajustes no
// histórico e encerra a sessão, tudo numa transação.
#[utoipa::path(
    post,
    path = "/api/stock-take/{id}/approve",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    request_body = ApprovePayload,
    responses(
        (status = 200, description = "Sessão aprovada e estoque ajustado", body = StockTakeSession),
        (status = 409, description = "Itens sem contagem, observações vazias ou sessão encerrada"),
    )
)]
pub async fn approve_session(
    _guard: RequireAccess<StockTakeAdd>,
    AuthenticatedUser(user): AuthenticatedUser,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApprovePayload>,
) -> Result<Json<StockTakeSession>, AppError> {
    let session = app_state
        .stock_take_service
        .approve(id, payload, &user.username)
        .await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/stock-take/{id}/reject",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 204, description = "Sessão rejeitada e removida"),
        (status = 409, description = "Sessão já encerrada"),
    )
)]
pub async fn reject_session(
    _guard: RequireAccess<StockTakeAdd>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.stock_take_service.reject(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/stock-take/{id}/export",
    tag = "Stock Take",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da sessão")),
    responses(
        (status = 200, description = "CSV da contagem", content_type = "text/csv"),
    )
)]
pub async fn export_session(
    _guard: RequireAccess<StockTakeView>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let csv = app_state.stock_take_service.export(id).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}
