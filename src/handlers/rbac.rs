// src/handlers/rbac.rs

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::rbac::{GroupAdmin, GroupView, RequireAccess},
    models::rbac::{APP_RESOURCES, UpdateGroupPayload, UserGroup},
};

// Visão serializável do catálogo de recursos (o catálogo em si é estático).
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
}

// O catálogo que a tela de administração de grupos apresenta.
#[utoipa::path(
    get,
    path = "/api/rbac/resources",
    tag = "RBAC",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Catálogo de recursos da aplicação", body = [ResourceEntry]),
    )
)]
pub async fn list_resources(
    _guard: RequireAccess<GroupView>,
) -> Json<Vec<ResourceEntry>> {
    let entries = APP_RESOURCES
        .iter()
        .map(|r| ResourceEntry { id: r.id, name: r.name, category: r.category })
        .collect();
    Json(entries)
}

#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "RBAC",
    security(("api_jwt" = [])),
    responses(
        (status = 200, description = "Todos os grupos", body = [UserGroup]),
        (status = 403, description = "Sem acesso ao cadastro de grupos"),
    )
)]
pub async fn list_groups(
    _guard: RequireAccess<GroupView>,
    State(app_state): State<AppState>,
) -> Result<Json<Vec<UserGroup>>, AppError> {
    let groups = app_state.rbac_service.list_groups().await?;
    Ok(Json(groups))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}",
    tag = "RBAC",
    security(("api_jwt" = [])),
    params(("group_id" = String, Path, description = "Identificador do grupo, ex.: 'S'")),
    responses(
        (status = 200, description = "O grupo", body = UserGroup),
        (status = 404, description = "Grupo não encontrado"),
    )
)]
pub async fn get_group(
    _guard: RequireAccess<GroupView>,
    State(app_state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<UserGroup>, AppError> {
    let group = app_state.rbac_service.get_group(&group_id).await?;
    Ok(Json(group))
}

// Edição administrativa: nome, descrição, departamento e o mapa dinâmico
// recurso -> nível. Vale já na próxima requisição de qualquer usuário do
// grupo.
#[utoipa::path(
    put,
    path = "/api/groups/{group_id}",
    tag = "RBAC",
    security(("api_jwt" = [])),
    params(("group_id" = String, Path, description = "Identificador do grupo")),
    request_body = UpdateGroupPayload,
    responses(
        (status = 200, description = "Grupo atualizado", body = UserGroup),
        (status = 403, description = "Sem acesso de edição a grupos"),
        (status = 404, description = "Grupo não encontrado"),
    )
)]
pub async fn update_group(
    _guard: RequireAccess<GroupAdmin>,
    State(app_state): State<AppState>,
    Path(group_id): Path<String>,
    Json(payload): Json<UpdateGroupPayload>,
) -> Result<Json<UserGroup>, AppError> {
    let group = app_state.rbac_service.update_group(&group_id, payload).await?;
    Ok(Json(group))
}
