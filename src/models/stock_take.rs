// src/models/stock_take.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Enums ---
// Máquina de estados da sessão: OPEN -> {APPROVED | REJECTED}.
// Os dois estados finais tornam a sessão somente leitura; REJECTED ainda
// apaga o registro.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "stock_take_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockTakeStatus {
    Open,
    Approved,
    Rejected,
}

// Classificação da variância de um item contado.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum VarianceClass {
    Zero,
    Positive,
    Negative,
}

// --- Entrada de contagem ---
// count_qty fica None até o item ser fisicamente contado; a aprovação exige
// que todos estejam preenchidos.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CountEntry {
    #[schema(example = "7000042")]
    pub sap_number: String,
    pub part_name: String,
    pub location: String,
    pub stock_qty: i64,
    pub count_qty: Option<i64>,
}

// --- Sessão persistida (tabela stock_take_sessions) ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockTakeSession {
    pub id: Uuid,

    #[schema(example = 3)]
    pub month: i32,
    #[schema(example = 2026)]
    pub year: i32,

    pub status: StockTakeStatus,
    pub started_by: String,

    #[schema(value_type = Vec<CountEntry>)]
    pub items: Json<Vec<CountEntry>>,

    pub approval_comments: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Relatório de variância ---
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VarianceEntry {
    pub sap_number: String,
    pub part_name: String,
    pub location: String,
    pub stock_qty: i64,
    pub count_qty: Option<i64>,
    pub variance: i64,
    pub class: VarianceClass,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VarianceReport {
    pub entries: Vec<VarianceEntry>,
    pub zero_count: usize,
    pub positive_count: usize,
    pub negative_count: usize,
}

// --- Payloads ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OpenSessionPayload {
    #[validate(range(min = 1, max = 12, message = "O mês deve estar entre 1 e 12."))]
    pub month: i32,
    #[validate(range(min = 2000, max = 2100, message = "Ano inválido."))]
    pub year: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveProgressPayload {
    #[schema(example = json!([{"sapNumber": "7000042", "partName": "Bearing", "location": "01-A", "stockQty": 10, "countQty": 7}]))]
    pub items: Vec<CountEntry>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovePayload {
    // Observações do aprovador: obrigatórias, entram no histórico de
    // movimentação de cada ajuste.
    pub remarks: String,
}

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June",
    "July", "August", "September", "October", "November", "December",
];

// "March 2026", usado nas observações das movimentações e no export.
pub fn period_label(month: i32, year: i32) -> String {
    let name = MONTH_NAMES
        .get((month - 1).max(0) as usize)
        .copied()
        .unwrap_or("Unknown");
    format!("{} {}", name, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_label_names_the_month() {
        assert_eq!(period_label(1, 2026), "January 2026");
        assert_eq!(period_label(12, 2025), "December 2025");
    }

    #[test]
    fn status_round_trips_through_serde() {
        assert_eq!(serde_json::to_string(&StockTakeStatus::Open).unwrap(), "\"OPEN\"");
        let s: StockTakeStatus = serde_json::from_str("\"REJECTED\"").unwrap();
        assert_eq!(s, StockTakeStatus::Rejected);
    }
}
