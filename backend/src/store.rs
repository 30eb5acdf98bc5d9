use shared::{Party, PartyDraft};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;
use crate::error::ApiError;

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("duplicate party name {0:?}")]
    DuplicateName(String),
    #[error("database error: {0}")]
    Database(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateName(name) => ApiError::DuplicateName(name),
            StoreError::Database(detail) => ApiError::Internal(detail),
        }
    }
}

fn database_error(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn write_error(e: sqlx::Error, name: &str) -> StoreError {
    let duplicate = e.as_database_error().map_or(false, |db| db.is_unique_violation());
    if duplicate {
        StoreError::DuplicateName(name.to_string())
    } else {
        database_error(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartyOrder {
    #[default]
    Created,
    Votes,
}

impl PartyOrder {
    pub fn parse(sort: Option<&str>) -> Result<Self, ApiError> {
        match sort.map(str::trim) {
            None | Some("") | Some("created") => Ok(PartyOrder::Created),
            Some("votes") | Some("-votes") => Ok(PartyOrder::Votes),
            Some(other) => Err(ApiError::InvalidSort(other.to_string())),
        }
    }
}

/// Postgres-backed party directory. Every vote is a single
/// `UPDATE ... SET votes = votes + 1`, so concurrent voters never lose counts.
pub struct PartyStore;

impl PartyStore {
    pub async fn list(pool: &PgPool, order: PartyOrder) -> Result<Vec<Party>, StoreError> {
        let query = match order {
            PartyOrder::Created =>
                "SELECT id, name, color, symbol, slogan, description, logo_url, votes, created_at
                 FROM parties ORDER BY created_at, name",
            PartyOrder::Votes =>
                "SELECT id, name, color, symbol, slogan, description, logo_url, votes, created_at
                 FROM parties ORDER BY votes DESC, name",
        };

        sqlx::query_as::<_, Party>(query)
            .fetch_all(pool)
            .await
            .map_err(database_error)
    }

    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Party>, StoreError> {
        sqlx::query_as::<_, Party>(
            "SELECT id, name, color, symbol, slogan, description, logo_url, votes, created_at
             FROM parties WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(database_error)
    }

    pub async fn create(pool: &PgPool, draft: &PartyDraft) -> Result<Party, StoreError> {
        sqlx::query_as::<_, Party>(
            "INSERT INTO parties (id, name, color, symbol, slogan, description, logo_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, name, color, symbol, slogan, description, logo_url, votes, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.color)
        .bind(&draft.symbol)
        .bind(&draft.slogan)
        .bind(&draft.description)
        .bind(&draft.logo_url)
        .fetch_one(pool)
        .await
        .map_err(|e| write_error(e, &draft.name))
    }

    pub async fn update(pool: &PgPool, id: Uuid, draft: &PartyDraft) -> Result<Option<Party>, StoreError> {
        sqlx::query_as::<_, Party>(
            "UPDATE parties
             SET name = $2, color = $3, symbol = $4, slogan = $5, description = $6, logo_url = $7
             WHERE id = $1
             RETURNING id, name, color, symbol, slogan, description, logo_url, votes, created_at",
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.color)
        .bind(&draft.symbol)
        .bind(&draft.slogan)
        .bind(&draft.description)
        .bind(&draft.logo_url)
        .fetch_optional(pool)
        .await
        .map_err(|e| write_error(e, &draft.name))
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<Option<Party>, StoreError> {
        sqlx::query_as::<_, Party>(
            "DELETE FROM parties WHERE id = $1
             RETURNING id, name, color, symbol, slogan, description, logo_url, votes, created_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(database_error)
    }

    pub async fn increment_votes(pool: &PgPool, id: Uuid) -> Result<Option<Party>, StoreError> {
        sqlx::query_as::<_, Party>(
            "UPDATE parties SET votes = votes + 1 WHERE id = $1
             RETURNING id, name, color, symbol, slogan, description, logo_url, votes, created_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(database_error)
    }

    pub async fn reset_votes(pool: &PgPool, id: Uuid) -> Result<Option<Party>, StoreError> {
        sqlx::query_as::<_, Party>(
            "UPDATE parties SET votes = 0 WHERE id = $1
             RETURNING id, name, color, symbol, slogan, description, logo_url, votes, created_at",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(database_error)
    }

    pub async fn reset_all(pool: &PgPool) -> Result<u64, StoreError> {
        sqlx::query("UPDATE parties SET votes = 0")
            .execute(pool)
            .await
            .map(|result| result.rows_affected())
            .map_err(database_error)
    }
}
