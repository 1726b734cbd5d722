// src/handlers/parts.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{MovementView, PartAdd, PartEdit, PartView, RequireAccess},
    models::parts::{
        CleanupReport, DuplicateGroup, ImportReport, ImportResult, PartPayload, PartResponse,
        StockMovement,
    },
};

#[utoipa::path(
    get,
    path = "/api/parts",
    tag = "Parts",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Todas as peças", body = [PartResponse]),
        (status = 403, description = "Sem acesso ao cadastro de peças"),
    )
)]
pub async fn list_parts(
    _guard: RequireAccess<PartView>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<PartResponse>>, AppError> {
    let parts = app_state.part_service.list_parts().await?;
    Ok(Json(parts))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextSapResponse {
    #[schema(example = "7000043")]
    pub next_sap_number: String,
}

// O próximo número da sequência SAP, recalculado a cada chamada.
#[utoipa::path(
    get,
    path = "/api/parts/next-sap",
    tag = "Parts",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Próximo número da sequência", body = NextSapResponse),
    )
)]
pub async fn next_sap_number(
    _guard: RequireAccess<PartAdd>,
    State(app_state): State<AppState>,
) -> Result<Json<NextSapResponse>, AppError> {
    let next = app_state.part_service.next_sap_number().await?;
    Ok(Json(NextSapResponse { next_sap_number: next }))
}

#[utoipa::path(
    get,
    path = "/api/parts/{id}",
    tag = "Parts",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da peça")),
    responses(
        (status = 200, description = "A peça", body = PartResponse),
        (status = 404, description = "Peça não encontrada"),
    )
)]
pub async fn get_part(
    _guard: RequireAccess<PartView>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PartResponse>, AppError> {
    let part = app_state.part_service.get_part(id).await?;
    Ok(Json(part))
}

#[utoipa::path(
    post,
    path = "/api/parts",
    tag = "Parts",
    security(("api_jwt" = [])),
    request_body = PartPayload,
    responses(
        (status = 201, description = "Peça cadastrada", body = PartResponse),
        (status = 400, description = "Alguma regra da cadeia de validação falhou"),
        (status = 409, description = "SAP fora da sequência (reenviar com force)"),
    )
)]
pub async fn create_part(
    _guard: RequireAccess<PartAdd>,
    State(app_state): State<AppState>,
    Json(payload): Json<PartPayload>,
) -> Result<(StatusCode, Json<PartResponse>), AppError> {
    let part = app_state.part_service.add_part(payload).await?;
    Ok((StatusCode::CREATED, Json(part)))
}

#[utoipa::path(
    put,
    path = "/api/parts/{id}",
    tag = "Parts",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da peça")),
    request_body = PartPayload,
    responses(
        (status = 200, description = "Peça atualizada", body = PartResponse),
        (status = 400, description = "Alguma regra da cadeia de validação falhou"),
        (status = 404, description = "Peça não encontrada"),
    )
)]
pub async fn update_part(
    _guard: RequireAccess<PartEdit>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PartPayload>,
) -> Result<Json<PartResponse>, AppError> {
    let part = app_state.part_service.update_part(id, payload).await?;
    Ok(Json(part))
}

#[utoipa::path(
    delete,
    path = "/api/parts/{id}",
    tag = "Parts",
    security(("api_jwt" = [])),
    params(("id" = Uuid, Path, description = "ID da peça")),
    responses(
        (status = 204, description = "Peça removida"),
        (status = 404, description = "Peça não encontrada"),
    )
)]
pub async fn delete_part(
    _guard: RequireAccess<PartEdit>,
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    app_state.part_service.delete_part(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---
// Importação CSV
// ---

// Pré-visualização: o corpo é o CSV cru; nada é gravado.
#[utoipa::path(
    post,
    path = "/api/parts/import/validate",
    tag = "Parts",
    security(("api_jwt" = [])),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Linhas aceitas e erros por linha", body = ImportReport),
    )
)]
pub async fn validate_import(
    _guard: RequireAccess<PartAdd>,
    State(app_state): State<AppState>,
    body: String,
) -> Result<Json<ImportReport>, AppError> {
    let report = app_state.part_service.validate_import(&body).await?;
    Ok(Json(report))
}

#[utoipa::path(
    post,
    path = "/api/parts/import",
    tag = "Parts",
    security(("api_jwt" = [])),
    request_body(content = String, content_type = "text/csv"),
    responses(
        (status = 200, description = "Linhas válidas gravadas numa única transação", body = ImportResult),
    )
)]
pub async fn import_csv(
    _guard: RequireAccess<PartAdd>,
    State(app_state): State<AppState>,
    body: String,
) -> Result<Json<ImportResult>, AppError> {
    let result = app_state.part_service.import_csv(&body).await?;
    Ok(Json(result))
}

// ---
// Duplicados
// ---

#[utoipa::path(
    get,
    path = "/api/parts/duplicates",
    tag = "Parts",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Grupos com o mesmo SAP (primeiro visto é o mantido)", body = [DuplicateGroup]),
    )
)]
pub async fn detect_duplicates(
    _guard: RequireAccess<PartEdit>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<DuplicateGroup>>, AppError> {
    let groups = app_state.part_service.detect_duplicates().await?;
    Ok(Json(groups))
}

#[utoipa::path(
    post,
    path = "/api/parts/duplicates/cleanup",
    tag = "Parts",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Relatório da limpeza, parcial em caso de falha", body = CleanupReport),
    )
)]
pub async fn cleanup_duplicates(
    _guard: RequireAccess<PartEdit>,
    State(app_state): State<AppState>,
) -> Result<Json<CleanupReport>, AppError> {
    let report = app_state.part_service.remove_duplicates().await?;
    Ok(Json(report))
}

// ---
// Histórico de movimentação
// ---

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MovementQuery {
    // Filtra por SAP; ausente lista tudo.
    pub sap_number: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/movements",
    tag = "Parts",
    security(("api_jwt" = [])),
    params(MovementQuery),
    responses(
        (status = 200, description = "Movimentações, mais recentes primeiro", body = [StockMovement]),
    )
)]
pub async fn list_movements(
    _guard: RequireAccess<MovementView>,
    State(app_state): State<AppState>,
    Query(query): Query<MovementQuery>,
) -> Result<Json<Vec<StockMovement>>, AppError> {
    let movements = app_state
        .part_service
        .list_movements(query.sap_number.as_deref())
        .await?;
    Ok(Json(movements))
}
