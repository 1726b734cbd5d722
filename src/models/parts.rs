// src/models/parts.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- 1. Peça (catálogo do Part Master) ---
// As colunas min_stock_level/max_stock_level são legadas: registros antigos
// importados só as possuem. São migradas na leitura pelos acessores abaixo e
// nunca gravadas de volta automaticamente.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub id: Uuid,

    #[schema(example = "7000042")]
    pub sap_number: String,

    #[schema(example = "AB 1234")]
    pub internal_ref: String,

    pub name: String,
    pub category: String,

    #[schema(example = "03")]
    pub rack_number: String,

    #[schema(example = "B")]
    pub rack_level: String,

    pub safety_level: Option<i64>,
    pub replenish_qty: Option<i64>,
    pub current_stock: Option<i64>,

    pub min_stock_level: Option<i64>,
    pub max_stock_level: Option<i64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Part {
    // Migração de leitura: campo novo, senão o alias legado, senão 0.
    pub fn effective_safety_level(&self) -> i64 {
        self.safety_level.or(self.min_stock_level).unwrap_or(0)
    }

    pub fn effective_replenish_qty(&self) -> i64 {
        self.replenish_qty.or(self.max_stock_level).unwrap_or(0)
    }

    pub fn effective_stock(&self) -> i64 {
        self.current_stock.unwrap_or(0)
    }

    // "Estoque baixo" só vale quando há nível de segurança definido.
    pub fn is_low_stock(&self) -> bool {
        self.effective_safety_level() > 0 && self.effective_stock() < self.effective_safety_level()
    }
}

// Visão da peça para a API: sempre com os campos novos já migrados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartResponse {
    pub id: Uuid,
    pub sap_number: String,
    pub internal_ref: String,
    pub name: String,
    pub category: String,
    pub rack_number: String,
    pub rack_level: String,
    pub safety_level: i64,
    pub replenish_qty: i64,
    pub current_stock: i64,
    pub low_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Part> for PartResponse {
    fn from(p: Part) -> Self {
        PartResponse {
            safety_level: p.effective_safety_level(),
            replenish_qty: p.effective_replenish_qty(),
            current_stock: p.effective_stock(),
            low_stock: p.is_low_stock(),
            id: p.id,
            sap_number: p.sap_number,
            internal_ref: p.internal_ref,
            name: p.name,
            category: p.category,
            rack_number: p.rack_number,
            rack_level: p.rack_level,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

// --- 2. Payload de cadastro/edição ---
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PartPayload {
    #[serde(default)]
    pub sap_number: String,
    #[serde(default)]
    pub internal_ref: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub rack_number: String,
    #[serde(default)]
    pub rack_level: String,
    pub safety_level: Option<i64>,
    pub replenish_qty: Option<i64>,
    pub current_stock: Option<i64>,

    // Confirmação explícita para cadastrar um SAP fora da sequência
    // calculada. O primeiro envio sem force recebe 409 com o valor esperado.
    #[serde(default)]
    pub force: bool,
}

// --- 3. Importação CSV ---
// Uma linha já validada do arquivo, pronta para persistir.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidImportRow {
    pub sap_number: String,
    pub internal_ref: String,
    pub name: String,
    pub category: String,
    pub rack_number: String,
    pub rack_level: String,
    pub safety_level: i64,
    pub replenish_qty: i64,
    pub current_stock: i64,
}

// Resultado particionado da validação do arquivo: linhas aceitas e lista de
// erros das rejeitadas. Nada é persistido enquanto a validação não termina.
#[derive(Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub rows: Vec<ValidImportRow>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub imported: usize,
    pub errors: Vec<String>,
}

// --- 4. Detecção de duplicados ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub sap_number: String,
    pub name: String,
    pub count: usize,
    // ids[0] é o primeiro visto, o que será mantido.
    pub ids: Vec<Uuid>,
}

// Resultado da limpeza em lotes. Em caso de falha no meio, os lotes já
// commitados permanecem aplicados e `deleted` reflete exatamente o que foi
// removido; `error` carrega a causa da interrupção.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub planned: usize,
    pub deleted: usize,
    pub progress: u8,
    pub error: Option<String>,
}

// --- 5. Movimentação de estoque (histórico) ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: Uuid,
    pub sap_number: String,
    pub part_name: String,

    #[schema(example = "STOCK TAKE")]
    pub movement_type: String,

    // Quantidade com sinal: positiva em sobra, negativa em falta.
    pub quantity: i64,
    pub user_name: String,
    pub remarks: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy_part() -> Part {
        Part {
            id: Uuid::new_v4(),
            sap_number: "7000010".into(),
            internal_ref: "AB 123".into(),
            name: "Bearing 6204".into(),
            category: "SP-BEARING".into(),
            rack_number: "01".into(),
            rack_level: "A".into(),
            safety_level: None,
            replenish_qty: None,
            current_stock: Some(3),
            min_stock_level: Some(5),
            max_stock_level: Some(20),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn legacy_fields_are_read_migrated() {
        let p = legacy_part();
        assert_eq!(p.effective_safety_level(), 5);
        assert_eq!(p.effective_replenish_qty(), 20);

        let view = PartResponse::from(p);
        assert_eq!(view.safety_level, 5);
        assert_eq!(view.replenish_qty, 20);
    }

    #[test]
    fn low_stock_agrees_with_pre_migration_computation() {
        let p = legacy_part();
        // Cálculo equivalente pré-migração: min_stock_level > 0 && stock < min_stock_level
        let legacy_low = p.min_stock_level.unwrap() > 0
            && p.current_stock.unwrap() < p.min_stock_level.unwrap();
        assert_eq!(p.is_low_stock(), legacy_low);
        assert!(p.is_low_stock());
    }

    #[test]
    fn new_fields_take_precedence_over_aliases() {
        let mut p = legacy_part();
        p.safety_level = Some(2);
        assert_eq!(p.effective_safety_level(), 2);
        // stock 3 >= safety 2: não está baixo
        assert!(!p.is_low_stock());
    }

    #[test]
    fn zero_safety_level_never_flags_low_stock() {
        let mut p = legacy_part();
        p.safety_level = Some(0);
        p.min_stock_level = None;
        p.current_stock = Some(0);
        assert!(!p.is_low_stock());
    }
}
