// src/models/rbac.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::HashMap;
use utoipa::ToSchema;

// ---
// Nível de acesso por recurso
// ---
// Enum ordenado em vez de comparação de strings: a ordem de declaração
// define a ordem total no_access < view < edit < add.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema, Default,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum AccessLevel {
    #[default]
    NoAccess,
    View,
    Edit,
    Add,
}

// Mapa dinâmico de permissões de um grupo: recurso -> nível.
// Quando presente (não vazio) no usuário, é a única fonte de verdade;
// a tabela estática legada é ignorada por completo.
pub type ResourceAccessMap = HashMap<String, AccessLevel>;

// ---
// Flags booleanas do catálogo legado
// ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyPermissions {
    pub inventory: bool,
    pub procurement: bool,
    pub maintenance: bool,
    pub admin: bool,
}

// Qual flag legada responde por um recurso quando o grupo não tem
// permissões dinâmicas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyFlag {
    Inventory,
    Procurement,
    Maintenance,
    Admin,
}

impl LegacyPermissions {
    pub fn allows(&self, flag: LegacyFlag) -> bool {
        match flag {
            LegacyFlag::Inventory => self.inventory,
            LegacyFlag::Procurement => self.procurement,
            LegacyFlag::Maintenance => self.maintenance,
            LegacyFlag::Admin => self.admin,
        }
    }
}

// ---
// Catálogo fixo de papéis (compilado, imutável em runtime)
// ---
pub struct RoleDef {
    pub group_id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub permissions: LegacyPermissions,
}

pub const BUILT_IN_ROLES: [RoleDef; 4] = [
    RoleDef {
        group_id: "A",
        name: "Admin",
        description: "Administrator group with full access",
        permissions: LegacyPermissions { inventory: true, procurement: true, maintenance: true, admin: true },
    },
    RoleDef {
        group_id: "S",
        name: "Store keeper",
        description: "Manages inventory and stock",
        permissions: LegacyPermissions { inventory: true, procurement: false, maintenance: false, admin: false },
    },
    RoleDef {
        group_id: "M",
        name: "Maintenance technician",
        description: "Handles maintenance requests",
        permissions: LegacyPermissions { inventory: false, procurement: false, maintenance: true, admin: false },
    },
    RoleDef {
        group_id: "P",
        name: "Procurement officer",
        description: "Manages purchases and orders",
        permissions: LegacyPermissions { inventory: false, procurement: true, maintenance: false, admin: false },
    },
];

pub fn built_in_role(group_id: &str) -> Option<&'static RoleDef> {
    BUILT_IN_ROLES.iter().find(|r| r.group_id == group_id)
}

// ---
// Catálogo de recursos da aplicação
// ---
pub struct AppResource {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    // None = recurso sem mapeamento legado: negado por padrão para
    // quem não é Admin e não tem permissões dinâmicas.
    pub legacy_flag: Option<LegacyFlag>,
}

pub const APP_RESOURCES: [AppResource; 15] = [
    AppResource { id: "user_master", name: "User Master", category: "Admin", legacy_flag: Some(LegacyFlag::Admin) },
    AppResource { id: "user_group_master", name: "User Group Master", category: "Admin", legacy_flag: Some(LegacyFlag::Admin) },
    AppResource { id: "department_master", name: "Department Master", category: "Admin", legacy_flag: Some(LegacyFlag::Admin) },
    AppResource { id: "part_master", name: "Part Master", category: "Data Master", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "part_group_master", name: "Part Group Master", category: "Data Master", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "storage_master", name: "Storage Master", category: "Data Master", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "supplier_master", name: "Supplier Master", category: "Data Master", legacy_flag: Some(LegacyFlag::Procurement) },
    AppResource { id: "stock_in", name: "Stock In", category: "Inventory", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "stock_out", name: "Stock Out", category: "Inventory", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "movement_logs", name: "Movement Logs", category: "Inventory", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "mrf", name: "Material Requisition (MRF)", category: "Inventory", legacy_flag: Some(LegacyFlag::Maintenance) },
    AppResource { id: "stock_take", name: "Stock Take", category: "Inventory", legacy_flag: Some(LegacyFlag::Inventory) },
    AppResource { id: "purchase_requisition", name: "Purchase Requisition", category: "Procurement", legacy_flag: Some(LegacyFlag::Procurement) },
    AppResource { id: "stock_inquiry", name: "Stock Inquiry Report", category: "Reports", legacy_flag: None },
    AppResource { id: "low_stock", name: "Low Stock Report", category: "Reports", legacy_flag: None },
];

pub fn legacy_flag_for(resource_id: &str) -> Option<LegacyFlag> {
    APP_RESOURCES
        .iter()
        .find(|r| r.id == resource_id)
        .and_then(|r| r.legacy_flag)
}

// ---
// Registro persistido de grupo (tabela user_groups)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    #[schema(example = "S")]
    pub group_id: String,

    #[schema(example = "Store keeper")]
    pub name: String,

    pub description: Option<String>,
    pub department: Option<String>,

    // Flags legadas, semeadas pelo sync de startup.
    #[schema(value_type = LegacyPermissions)]
    pub permissions: Json<LegacyPermissions>,

    // Mapa dinâmico recurso -> nível, editado pela administração.
    #[schema(value_type = HashMap<String, AccessLevel>, example = json!({"part_master": "edit"}))]
    pub resource_access: Json<ResourceAccessMap>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O Payload para edição administrativa de um grupo
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub department: Option<String>,

    #[schema(value_type = Option<HashMap<String, AccessLevel>>, example = json!({"part_master": "view", "stock_take": "add"}))]
    pub resource_access: Option<ResourceAccessMap>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_levels_are_totally_ordered() {
        assert!(AccessLevel::NoAccess < AccessLevel::View);
        assert!(AccessLevel::View < AccessLevel::Edit);
        assert!(AccessLevel::Edit < AccessLevel::Add);
        assert!(AccessLevel::Add >= AccessLevel::View);
    }

    #[test]
    fn access_level_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AccessLevel::NoAccess).unwrap(), "\"no_access\"");
        assert_eq!(serde_json::to_string(&AccessLevel::Add).unwrap(), "\"add\"");
        let parsed: AccessLevel = serde_json::from_str("\"edit\"").unwrap();
        assert_eq!(parsed, AccessLevel::Edit);
    }

    #[test]
    fn built_in_catalog_has_unique_group_ids() {
        let mut ids: Vec<_> = BUILT_IN_ROLES.iter().map(|r| r.group_id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), BUILT_IN_ROLES.len());
    }

    #[test]
    fn reports_have_no_legacy_mapping() {
        assert_eq!(legacy_flag_for("low_stock"), None);
        assert_eq!(legacy_flag_for("part_master"), Some(LegacyFlag::Inventory));
        assert_eq!(legacy_flag_for("does_not_exist"), None);
    }
}
