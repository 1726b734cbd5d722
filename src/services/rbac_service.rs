// src/services/rbac_service.rs

use crate::{
    common::error::AppError,
    db::GroupRepository,
    models::auth::CurrentUser,
    models::rbac::{
        built_in_role, legacy_flag_for, AccessLevel, UpdateGroupPayload, UserGroup, BUILT_IN_ROLES,
    },
};

// Ids de grupo tratados como superusuário independentemente do que estiver
// gravado. Mantido num único lugar em vez de espalhar comparações com 'A'
// pelos pontos de chamada.
fn is_super_admin(group_id: &str) -> bool {
    matches!(group_id, "A" | "Admin" | "admin")
}

/// Resolve o acesso de um usuário a um recurso nomeado.
///
/// Duas camadas, com precedência estrita:
/// 1. Permissões dinâmicas do grupo (`group_permissions` não vazio): o mapa
///    é a única fonte de verdade. Recurso ausente do mapa = negado
///    explicitamente por omissão.
/// 2. Tabela legada: o recurso é mapeado para uma flag booleana do papel
///    estático do usuário; recurso sem mapeamento legado = negado.
///
/// Por fim, o fallback de superusuário: se nenhuma regra concedeu e o grupo
/// é Admin, concede mesmo assim.
pub fn resolve_access(user: Option<&CurrentUser>, resource_id: &str, required: AccessLevel) -> bool {
    let Some(user) = user else {
        return false;
    };

    let granted = if !user.group_permissions.is_empty() {
        // Camada dinâmica: autoritativa, a tabela legada é ignorada por
        // completo, inclusive para negar.
        user.group_permissions
            .get(resource_id)
            .map(|level| *level >= required)
            .unwrap_or(false)
    } else {
        // Camada legada: flag do catálogo compilado, negação por padrão
        // para recursos sem mapeamento.
        legacy_flag_for(resource_id)
            .and_then(|flag| built_in_role(&user.group_id).map(|r| r.permissions.allows(flag)))
            .unwrap_or(false)
    };

    if granted {
        return true;
    }

    is_super_admin(&user.group_id)
}

#[derive(Clone)]
pub struct RbacService {
    group_repo: GroupRepository,
}

impl RbacService {
    pub fn new(group_repo: GroupRepository) -> Self {
        Self { group_repo }
    }

    /// Garante que os quatro grupos embutidos existem na tabela user_groups.
    ///
    /// Idempotente e seguro a cada start do processo: cria os ausentes,
    /// atualiza apenas name/permissions/updated_at dos existentes (sem tocar
    /// description/department editados pela administração) e nunca apaga
    /// grupo nenhum. Falhas são logadas e engolidas: o startup não depende
    /// do sync.
    pub async fn sync_groups(&self) {
        for role in &BUILT_IN_ROLES {
            let result = self
                .group_repo
                .upsert_seed(role.group_id, role.name, role.description, &role.permissions)
                .await;

            if let Err(e) = result {
                tracing::warn!(
                    "Falha ao sincronizar o grupo '{}': {}. Seguindo com o startup.",
                    role.group_id,
                    e
                );
            }
        }
        tracing::info!("Grupos de usuário sincronizados.");
    }

    pub async fn list_groups(&self) -> Result<Vec<UserGroup>, AppError> {
        self.group_repo.list_all().await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<UserGroup, AppError> {
        self.group_repo.get(group_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn update_group(
        &self,
        group_id: &str,
        payload: UpdateGroupPayload,
    ) -> Result<UserGroup, AppError> {
        self.group_repo
            .update_group(
                group_id,
                payload.name.as_deref(),
                payload.description.as_deref(),
                payload.department.as_deref(),
                payload.resource_access.as_ref(),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use uuid::Uuid;

    fn user(group_id: &str, perms: &[(&str, AccessLevel)]) -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".into(),
            username: "someone".into(),
            department: "Engineering".into(),
            group_id: group_id.into(),
            group_permissions: perms
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn missing_user_is_denied() {
        assert!(!resolve_access(None, "part_master", AccessLevel::View));
    }

    #[test]
    fn dynamic_map_is_authoritative_over_legacy_table() {
        // Storekeeper tem inventory=true na tabela legada, mas o mapa
        // dinâmico não lista part_master: negado por omissão.
        let u = user("S", &[("stock_take", AccessLevel::View)]);
        assert!(!resolve_access(Some(&u), "part_master", AccessLevel::View));
        assert!(resolve_access(Some(&u), "stock_take", AccessLevel::View));
    }

    #[test]
    fn dynamic_levels_respect_the_total_order() {
        let u = user("S", &[("part_master", AccessLevel::Edit)]);
        assert!(resolve_access(Some(&u), "part_master", AccessLevel::View));
        assert!(resolve_access(Some(&u), "part_master", AccessLevel::Edit));
        assert!(!resolve_access(Some(&u), "part_master", AccessLevel::Add));
    }

    #[test]
    fn no_access_entry_denies_even_view() {
        let u = user("S", &[("part_master", AccessLevel::NoAccess)]);
        assert!(!resolve_access(Some(&u), "part_master", AccessLevel::View));
    }

    #[test]
    fn legacy_table_applies_when_no_dynamic_permissions() {
        let storekeeper = user("S", &[]);
        assert!(resolve_access(Some(&storekeeper), "part_master", AccessLevel::View));
        assert!(!resolve_access(Some(&storekeeper), "user_master", AccessLevel::View));

        let procurement = user("P", &[]);
        assert!(resolve_access(Some(&procurement), "purchase_requisition", AccessLevel::View));
        assert!(!resolve_access(Some(&procurement), "stock_in", AccessLevel::View));
    }

    #[test]
    fn unmapped_resource_is_denied_for_non_admins() {
        let u = user("S", &[]);
        assert!(!resolve_access(Some(&u), "low_stock", AccessLevel::View));
        assert!(!resolve_access(Some(&u), "unknown_resource", AccessLevel::View));
    }

    #[test]
    fn super_admin_fallback_grants_everything() {
        let admin = user("A", &[]);
        assert!(resolve_access(Some(&admin), "low_stock", AccessLevel::Add));
        assert!(resolve_access(Some(&admin), "unknown_resource", AccessLevel::Add));

        // Fallback independe do mapa dinâmico ter negado.
        let admin_with_map = user("A", &[("part_master", AccessLevel::NoAccess)]);
        assert!(resolve_access(Some(&admin_with_map), "part_master", AccessLevel::View));
    }

    #[test]
    fn legacy_admin_aliases_keep_working() {
        let u = user("Admin", &[]);
        assert!(resolve_access(Some(&u), "part_master", AccessLevel::Add));
    }

    #[test]
    fn unknown_group_without_dynamic_map_is_denied() {
        let u = user("X", &[]);
        assert!(!resolve_access(Some(&u), "part_master", AccessLevel::View));
    }
}
