// src/services/part_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PartRepository,
    models::parts::{
        CleanupReport, DuplicateGroup, ImportReport, ImportResult, Part, PartPayload,
        PartResponse, StockMovement,
    },
    services::part_rules,
};

// Teto de operações por lote na limpeza de duplicados. O provedor externo
// original limitava o batch a 500 operações; 100 mantém folga.
pub const CLEANUP_CHUNK_SIZE: usize = 100;

#[derive(Clone)]
pub struct PartService {
    part_repo: PartRepository,
    pool: PgPool,
}

impl PartService {
    pub fn new(part_repo: PartRepository, pool: PgPool) -> Self {
        Self { part_repo, pool }
    }

    pub async fn list_parts(&self) -> Result<Vec<PartResponse>, AppError> {
        let parts = self.part_repo.list_all().await?;
        Ok(parts.into_iter().map(PartResponse::from).collect())
    }

    // O próximo SAP é função do snapshot corrente: recalculado a cada
    // chamada, nunca cacheado entre mutações.
    pub async fn next_sap_number(&self) -> Result<String, AppError> {
        let parts = self.part_repo.list_all().await?;
        Ok(part_rules::next_sap_number(&parts))
    }

    pub async fn add_part(&self, payload: PartPayload) -> Result<PartResponse, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        part_rules::validate_part(&payload, &snapshot, None)?;

        let part = self.part_repo.insert(&self.pool, &payload).await?;
        tracing::info!("Peça {} cadastrada.", part.sap_number);
        Ok(part.into())
    }

    pub async fn update_part(
        &self,
        id: Uuid,
        payload: PartPayload,
    ) -> Result<PartResponse, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        let current = snapshot
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(AppError::NotFound)?;

        part_rules::validate_part(&payload, &snapshot, Some(&current))?;

        let part = self.part_repo.update(&self.pool, id, &payload).await?;
        Ok(part.into())
    }

    pub async fn delete_part(&self, id: Uuid) -> Result<(), AppError> {
        self.part_repo.delete(id).await
    }

    pub async fn get_part(&self, id: Uuid) -> Result<PartResponse, AppError> {
        let part = self.part_repo.get(id).await?.ok_or(AppError::NotFound)?;
        Ok(part.into())
    }

    // ---
    // Importação CSV
    // ---

    // Pré-visualização: valida sem gravar nada.
    pub async fn validate_import(&self, raw_csv: &str) -> Result<ImportReport, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        Ok(part_rules::validate_import(raw_csv, &snapshot))
    }

    // Todo o arquivo é validado antes de qualquer escrita; as linhas aceitas
    // entram numa única transação. Não há intercalação validação/gravação.
    pub async fn import_csv(&self, raw_csv: &str) -> Result<ImportResult, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        let report = part_rules::validate_import(raw_csv, &snapshot);

        if report.rows.is_empty() {
            return Ok(ImportResult { imported: 0, errors: report.errors });
        }

        let mut tx = self.pool.begin().await?;
        for row in &report.rows {
            self.part_repo.insert_import_row(&mut *tx, row).await?;
        }
        tx.commit().await?;

        tracing::info!(
            "Importação CSV: {} linhas gravadas, {} rejeitadas.",
            report.rows.len(),
            report.errors.len()
        );

        Ok(ImportResult { imported: report.rows.len(), errors: report.errors })
    }

    // ---
    // Duplicados
    // ---

    pub async fn detect_duplicates(&self) -> Result<Vec<DuplicateGroup>, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        Ok(part_rules::find_duplicates(&snapshot))
    }

    /// Remove os duplicados planejados em lotes limitados, um commit por
    /// lote. Sem rollback global: se um lote falhar, os anteriores
    /// permanecem aplicados, a operação para e o relatório sai com o total
    /// removido exato e a causa da falha.
    pub async fn remove_duplicates(&self) -> Result<CleanupReport, AppError> {
        let snapshot = self.part_repo.list_all().await?;
        let groups = part_rules::find_duplicates(&snapshot);
        let planned = part_rules::plan_deletions(&groups);

        let total = planned.len();
        let mut deleted: usize = 0;

        for chunk in planned.chunks(CLEANUP_CHUNK_SIZE) {
            let mut tx = match self.pool.begin().await {
                Ok(tx) => tx,
                Err(e) => return Ok(self.halted_report(total, deleted, e.into())),
            };

            let result = self.part_repo.delete_many(&mut *tx, chunk).await;
            let commit = match result {
                Ok(_) => tx.commit().await.map_err(AppError::from),
                Err(e) => Err(e),
            };

            if let Err(e) = commit {
                return Ok(self.halted_report(total, deleted, e));
            }

            deleted += chunk.len();
            let progress = Self::progress(deleted, total);
            tracing::info!("Limpeza de duplicados: {}% ({}/{}).", progress, deleted, total);
        }

        Ok(CleanupReport {
            planned: total,
            deleted,
            progress: Self::progress(deleted, total),
            error: None,
        })
    }

    fn halted_report(&self, planned: usize, deleted: usize, e: AppError) -> CleanupReport {
        tracing::error!(
            "Limpeza de duplicados interrompida após {} de {} remoções: {}",
            deleted,
            planned,
            e
        );
        CleanupReport {
            planned,
            deleted,
            progress: Self::progress(deleted, planned),
            error: Some(e.to_string()),
        }
    }

    fn progress(deleted: usize, total: usize) -> u8 {
        if total == 0 {
            return 100;
        }
        ((deleted as f64 / total as f64) * 100.0).round() as u8
    }

    // ---
    // Histórico de movimentação
    // ---

    pub async fn list_movements(
        &self,
        sap_number: Option<&str>,
    ) -> Result<Vec<StockMovement>, AppError> {
        self.part_repo.list_movements(sap_number).await
    }

    pub(crate) async fn snapshot(&self) -> Result<Vec<Part>, AppError> {
        self.part_repo.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_rounded_to_integer_percent() {
        assert_eq!(PartService::progress(1, 3), 33);
        assert_eq!(PartService::progress(2, 3), 67);
        assert_eq!(PartService::progress(3, 3), 100);
        assert_eq!(PartService::progress(0, 0), 100);
    }
}
