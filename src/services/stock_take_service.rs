// src/services/stock_take_service.rs

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PartRepository, StockTakeRepository},
    models::stock_take::{
        period_label, ApprovePayload, CountEntry, StockTakeSession, StockTakeStatus,
        VarianceClass, VarianceEntry, VarianceReport,
    },
};

pub const MOVEMENT_TYPE_STOCK_TAKE: &str = "STOCK TAKE";

// ---
// Núcleo puro do motor de variância
// ---

// Variância com sinal de uma entrada. Para pré-visualização, contagem
// ausente conta como 0; o gate de aprovação exige contagem explícita.
pub fn entry_variance(entry: &CountEntry) -> i64 {
    entry.count_qty.unwrap_or(0) - entry.stock_qty
}

pub fn classify(variance: i64) -> VarianceClass {
    match variance {
        0 => VarianceClass::Zero,
        v if v > 0 => VarianceClass::Positive,
        _ => VarianceClass::Negative,
    }
}

pub fn compute_variance(entries: &[CountEntry]) -> VarianceReport {
    let computed: Vec<VarianceEntry> = entries
        .iter()
        .map(|e| {
            let variance = entry_variance(e);
            VarianceEntry {
                sap_number: e.sap_number.clone(),
                part_name: e.part_name.clone(),
                location: e.location.clone(),
                stock_qty: e.stock_qty,
                count_qty: e.count_qty,
                variance,
                class: classify(variance),
            }
        })
        .collect();

    VarianceReport {
        zero_count: computed.iter().filter(|e| e.class == VarianceClass::Zero).count(),
        positive_count: computed.iter().filter(|e| e.class == VarianceClass::Positive).count(),
        negative_count: computed.iter().filter(|e| e.class == VarianceClass::Negative).count(),
        entries: computed,
    }
}

// Aprovação exige todos os itens contados e observações não vazias.
pub fn can_approve(entries: &[CountEntry], remarks: &str) -> bool {
    !entries.is_empty()
        && entries.iter().all(|e| e.count_qty.is_some())
        && !remarks.trim().is_empty()
}

// Export CSV na ordem de colunas fixa do contrato.
pub fn export_csv(entries: &[CountEntry]) -> String {
    let mut out = String::from("SAP Number,Part Name,Location,System Quantity,Actual Quantity\n");
    for e in entries {
        let counted = e.count_qty.map(|v| v.to_string()).unwrap_or_default();
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            e.sap_number, e.part_name, e.location, e.stock_qty, counted
        ));
    }
    out
}

// ---
// Serviço
// ---

#[derive(Clone)]
pub struct StockTakeService {
    stock_take_repo: StockTakeRepository,
    part_repo: PartRepository,
    pool: PgPool,
}

impl StockTakeService {
    pub fn new(
        stock_take_repo: StockTakeRepository,
        part_repo: PartRepository,
        pool: PgPool,
    ) -> Self {
        Self { stock_take_repo, part_repo, pool }
    }

    pub async fn list_sessions(&self) -> Result<Vec<StockTakeSession>, AppError> {
        self.stock_take_repo.list_all().await
    }

    pub async fn get_session(&self, id: Uuid) -> Result<StockTakeSession, AppError> {
        self.stock_take_repo.get(id).await?.ok_or(AppError::NotFound)
    }

    // Abre a sessão do período com uma entrada por peça do snapshot,
    // todas ainda sem contagem.
    pub async fn open_session(
        &self,
        month: i32,
        year: i32,
        started_by: &str,
    ) -> Result<StockTakeSession, AppError> {
        if self.stock_take_repo.find_open(month, year).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Já existe uma sessão aberta para {}.",
                period_label(month, year)
            )));
        }

        let parts = self.part_repo.list_all().await?;
        let items: Vec<CountEntry> = parts
            .iter()
            .map(|p| CountEntry {
                sap_number: p.sap_number.clone(),
                part_name: p.name.clone(),
                location: format!("{}-{}", p.rack_number, p.rack_level),
                stock_qty: p.effective_stock(),
                count_qty: None,
            })
            .collect();

        let session = self.stock_take_repo.insert(month, year, started_by, &items).await?;
        tracing::info!(
            "Sessão de stock take aberta para {} com {} itens.",
            period_label(month, year),
            session.items.0.len()
        );
        Ok(session)
    }

    pub async fn save_progress(
        &self,
        id: Uuid,
        items: Vec<CountEntry>,
    ) -> Result<StockTakeSession, AppError> {
        let session = self.get_session(id).await?;
        if session.status != StockTakeStatus::Open {
            return Err(AppError::SessionClosed);
        }
        self.stock_take_repo.save_items(id, &items).await
    }

    pub async fn variance_report(&self, id: Uuid) -> Result<VarianceReport, AppError> {
        let session = self.get_session(id).await?;
        Ok(compute_variance(&session.items.0))
    }

    /// Aprova a sessão: para cada item com variância não nula, grava a
    /// contagem física como estoque corrente da peça e registra um ajuste
    /// "STOCK TAKE" no histórico; por fim marca a sessão como aprovada.
    ///
    /// Tudo numa única transação — aplicação parcial (peças ajustadas com a
    /// sessão ainda aberta) seria violação de correção.
    pub async fn approve(
        &self,
        id: Uuid,
        payload: ApprovePayload,
        approver: &str,
    ) -> Result<StockTakeSession, AppError> {
        let session = self.get_session(id).await?;
        if session.status != StockTakeStatus::Open {
            return Err(AppError::SessionClosed);
        }

        let entries = &session.items.0;
        if entries.iter().any(|e| e.count_qty.is_none()) {
            return Err(AppError::Conflict(
                "Todos os itens precisam estar contados antes da aprovação.".to_string(),
            ));
        }
        let remarks = payload.remarks.trim();
        if remarks.is_empty() {
            return Err(AppError::Conflict(
                "As observações de aprovação são obrigatórias.".to_string(),
            ));
        }

        let parts = self.part_repo.list_all().await?;
        let movement_remarks = format!(
            "Stock Take Adjustment: {} (Session {})",
            remarks,
            period_label(session.month, session.year)
        );

        let mut tx = self.pool.begin().await?;

        for entry in entries {
            let variance = entry_variance(entry);
            if variance == 0 {
                continue;
            }

            // countado é Some aqui: o gate acima garante.
            let counted = entry.count_qty.unwrap_or(0);

            if let Some(part) = parts.iter().find(|p| p.sap_number == entry.sap_number) {
                self.part_repo.set_current_stock(&mut *tx, part.id, counted).await?;
            }

            self.part_repo
                .record_movement(
                    &mut *tx,
                    &entry.sap_number,
                    &entry.part_name,
                    MOVEMENT_TYPE_STOCK_TAKE,
                    variance,
                    approver,
                    &movement_remarks,
                )
                .await?;
        }

        let approved_at = Utc::now();
        self.stock_take_repo
            .mark_approved(&mut *tx, id, entries, remarks, approved_at)
            .await?;

        tx.commit().await?;

        tracing::info!(
            "Sessão {} aprovada ({}).",
            id,
            period_label(session.month, session.year)
        );
        self.get_session(id).await
    }

    /// Rejeita a sessão apagando-a em definitivo. Nenhum efeito sobre
    /// estoque ou histórico. A confirmação é responsabilidade do chamador;
    /// aqui, chamada é execução.
    pub async fn reject(&self, id: Uuid) -> Result<(), AppError> {
        let session = self.get_session(id).await?;
        if session.status != StockTakeStatus::Open {
            return Err(AppError::SessionClosed);
        }
        self.stock_take_repo.delete(id).await?;
        tracing::info!("Sessão {} rejeitada e removida.", id);
        Ok(())
    }

    pub async fn export(&self, id: Uuid) -> Result<String, AppError> {
        let session = self.get_session(id).await?;
        Ok(export_csv(&session.items.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(sap: &str, stock: i64, count: Option<i64>) -> CountEntry {
        CountEntry {
            sap_number: sap.into(),
            part_name: format!("Part {}", sap),
            location: "01-A".into(),
            stock_qty: stock,
            count_qty: count,
        }
    }

    #[test]
    fn shortage_has_negative_variance() {
        let v = entry_variance(&entry("7000001", 10, Some(7)));
        assert_eq!(v, -3);
        assert_eq!(classify(v), VarianceClass::Negative);
    }

    #[test]
    fn exact_count_has_zero_variance() {
        let v = entry_variance(&entry("7000001", 5, Some(5)));
        assert_eq!(v, 0);
        assert_eq!(classify(v), VarianceClass::Zero);
    }

    #[test]
    fn overage_has_positive_variance() {
        let v = entry_variance(&entry("7000001", 5, Some(9)));
        assert_eq!(v, 4);
        assert_eq!(classify(v), VarianceClass::Positive);
    }

    #[test]
    fn preview_treats_uncounted_as_zero() {
        assert_eq!(entry_variance(&entry("7000001", 10, None)), -10);
    }

    #[test]
    fn report_partitions_by_class() {
        let entries = vec![
            entry("7000001", 10, Some(7)),
            entry("7000002", 5, Some(5)),
            entry("7000003", 2, Some(6)),
            entry("7000004", 1, Some(1)),
        ];
        let report = compute_variance(&entries);
        assert_eq!(report.zero_count, 2);
        assert_eq!(report.positive_count, 1);
        assert_eq!(report.negative_count, 1);
        assert_eq!(report.entries[0].variance, -3);
    }

    #[test]
    fn approval_requires_every_item_counted() {
        let complete = vec![entry("7000001", 10, Some(10)), entry("7000002", 3, Some(1))];
        assert!(can_approve(&complete, "contagem de março conferida"));

        let incomplete = vec![entry("7000001", 10, Some(10)), entry("7000002", 3, None)];
        assert!(!can_approve(&incomplete, "contagem conferida"));
    }

    #[test]
    fn approval_requires_non_blank_remarks() {
        let entries = vec![entry("7000001", 10, Some(10))];
        assert!(!can_approve(&entries, ""));
        assert!(!can_approve(&entries, "   "));
        assert!(can_approve(&entries, "ok"));
    }

    #[test]
    fn empty_session_cannot_be_approved() {
        assert!(!can_approve(&[], "ok"));
    }

    #[test]
    fn export_follows_the_fixed_column_order() {
        let entries = vec![entry("7000001", 10, Some(7)), entry("7000002", 4, None)];
        let csv = export_csv(&entries);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "SAP Number,Part Name,Location,System Quantity,Actual Quantity"
        );
        assert_eq!(lines.next().unwrap(), "7000001,Part 7000001,01-A,10,7");
        // Item não contado sai com a quantidade real em branco.
        assert_eq!(lines.next().unwrap(), "7000002,Part 7000002,01-A,4,");
    }
}
