//! Repository for the `carros` table.

use std::sync::LazyLock;

use concessionaria_core::carro::FIELDS;
use concessionaria_core::types::DbId;
use sqlx::PgPool;

use crate::models::carro::{Carro, CreateCarro, UpdateCarro};

/// Column list shared across queries, built from the serializer's field list.
static COLUMNS: LazyLock<String> = LazyLock::new(|| FIELDS.join(", "));

/// Provides CRUD operations for carros.
pub struct CarroRepo;

impl CarroRepo {
    /// Insert a new carro, returning the created row. `criado_em` is set by the database.
    pub async fn create(pool: &PgPool, input: &CreateCarro) -> Result<Carro, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!(
            "INSERT INTO carros (marca, modelo, ano, preco, foto)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {columns}"
        );
        sqlx::query_as::<_, Carro>(&query)
            .bind(&input.marca)
            .bind(&input.modelo)
            .bind(input.ano)
            .bind(input.preco)
            .bind(&input.foto)
            .fetch_one(pool)
            .await
    }

    /// Find a carro by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Carro>, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!("SELECT {columns} FROM carros WHERE id = $1");
        sqlx::query_as::<_, Carro>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all carros in insertion order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Carro>, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!("SELECT {columns} FROM carros ORDER BY id ASC");
        sqlx::query_as::<_, Carro>(&query).fetch_all(pool).await
    }

    /// List one page of carros in insertion order.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Carro>, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!("SELECT {columns} FROM carros ORDER BY id ASC LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Carro>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of carros.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM carros")
            .fetch_one(pool)
            .await
    }

    /// Update a carro. Only non-`None` fields in `input` are applied;
    /// `id` and `criado_em` are never written.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCarro,
    ) -> Result<Option<Carro>, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!(
            "UPDATE carros SET
                marca = COALESCE($2, marca),
                modelo = COALESCE($3, modelo),
                ano = COALESCE($4, ano),
                preco = COALESCE($5, preco),
                foto = CASE WHEN $6 THEN $7 ELSE foto END
             WHERE id = $1
             RETURNING {columns}"
        );
        let (set_foto, foto) = match &input.foto {
            Some(foto) => (true, foto.as_deref()),
            None => (false, None),
        };
        sqlx::query_as::<_, Carro>(&query)
            .bind(id)
            .bind(&input.marca)
            .bind(&input.modelo)
            .bind(input.ano)
            .bind(input.preco)
            .bind(set_foto)
            .bind(foto)
            .fetch_optional(pool)
            .await
    }

    /// Delete a carro, returning the removed row so callers can clean up its photo.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Carro>, sqlx::Error> {
        let columns = COLUMNS.as_str();
        let query = format!("DELETE FROM carros WHERE id = $1 RETURNING {columns}");
        sqlx::query_as::<_, Carro>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
