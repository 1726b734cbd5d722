// src/db/part_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::parts::{Part, PartPayload, StockMovement, ValidImportRow},
};

#[derive(Clone)]
pub struct PartRepository {
    pool: PgPool,
}

impl PartRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leitura
    // ---
    // A disciplina de acesso é "ler a coleção inteira, computar, gravar":
    // validação de unicidade, sequência SAP e detecção de duplicados
    // trabalham sempre sobre um snapshot completo.

    pub async fn list_all(&self) -> Result<Vec<Part>, AppError> {
        let parts = sqlx::query_as::<_, Part>("SELECT * FROM parts ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(parts)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Part>, AppError> {
        let part = sqlx::query_as::<_, Part>("SELECT * FROM parts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(part)
    }

    // ---
    // Escrita
    // ---

    pub async fn insert<'e, E>(&self, executor: E, p: &PartPayload) -> Result<Part, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, Part>(
            "INSERT INTO parts (sap_number, internal_ref, name, category, rack_number,
                                rack_level, safety_level, replenish_qty, current_stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&p.sap_number)
        .bind(&p.internal_ref)
        .bind(&p.name)
        .bind(&p.category)
        .bind(&p.rack_number)
        .bind(p.rack_level.to_uppercase())
        .bind(p.safety_level.unwrap_or(0))
        .bind(p.replenish_qty.unwrap_or(0))
        .bind(p.current_stock.unwrap_or(0))
        .fetch_one(executor)
        .await?;
        Ok(part)
    }

    pub async fn insert_import_row<'e, E>(
        &self,
        executor: E,
        row: &ValidImportRow,
    ) -> Result<Part, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, Part>(
            "INSERT INTO parts (sap_number, internal_ref, name, category, rack_number,
                                rack_level, safety_level, replenish_qty, current_stock)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING *",
        )
        .bind(&row.sap_number)
        .bind(&row.internal_ref)
        .bind(&row.name)
        .bind(&row.category)
        .bind(&row.rack_number)
        .bind(&row.rack_level)
        .bind(row.safety_level)
        .bind(row.replenish_qty)
        .bind(row.current_stock)
        .fetch_one(executor)
        .await?;
        Ok(part)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        p: &PartPayload,
    ) -> Result<Part, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let part = sqlx::query_as::<_, Part>(
            "UPDATE parts
             SET sap_number = $2, internal_ref = $3, name = $4, category = $5,
                 rack_number = $6, rack_level = $7, safety_level = $8,
                 replenish_qty = $9, current_stock = $10, updated_at = now()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(&p.sap_number)
        .bind(&p.internal_ref)
        .bind(&p.name)
        .bind(&p.category)
        .bind(&p.rack_number)
        .bind(p.rack_level.to_uppercase())
        .bind(p.safety_level.unwrap_or(0))
        .bind(p.replenish_qty.unwrap_or(0))
        .bind(p.current_stock.unwrap_or(0))
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::NotFound)?;
        Ok(part)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM parts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    // Remove um lote de ids dentro da transação corrente (limpeza de
    // duplicados trabalha em lotes limitados, um commit por lote).
    pub async fn delete_many<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM parts WHERE id = ANY($1)")
            .bind(ids)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Ajuste de estoque do stock take: grava a contagem física como o novo
    // current_stock (sempre na coluna nova, nunca no alias legado).
    pub async fn set_current_stock<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        current_stock: i64,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE parts SET current_stock = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(current_stock)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Histórico de movimentação
    // ---

    pub async fn record_movement<'e, E>(
        &self,
        executor: E,
        sap_number: &str,
        part_name: &str,
        movement_type: &str,
        quantity: i64,
        user_name: &str,
        remarks: &str,
    ) -> Result<StockMovement, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockMovement>(
            "INSERT INTO stock_movements (sap_number, part_name, movement_type, quantity,
                                          user_name, remarks)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(sap_number)
        .bind(part_name)
        .bind(movement_type)
        .bind(quantity)
        .bind(user_name)
        .bind(remarks)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    pub async fn list_movements(&self, sap_number: Option<&str>) -> Result<Vec<StockMovement>, AppError> {
        let movements = match sap_number {
            Some(sap) => {
                sqlx::query_as::<_, StockMovement>(
                    "SELECT * FROM stock_movements WHERE sap_number = $1 ORDER BY created_at DESC",
                )
                .bind(sap)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, StockMovement>(
                    "SELECT * FROM stock_movements ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(movements)
    }
}
