use sqlx::PgPool;

use crate::models::AvailableSpaceRow;
use kiosk_core::types::{AvailableSpace, BinKind, BinPosition};

pub async fn list_all(pool: &PgPool) -> Result<Vec<AvailableSpace>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AvailableSpaceRow>(
        r#"
        SELECT id, aisle, section, position, kind, percent, updated_at
        FROM available_spaces
        ORDER BY aisle, section, position
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AvailableSpaceRow::into_space).collect()
}

pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<AvailableSpace>, sqlx::Error> {
    let row = sqlx::query_as::<_, AvailableSpaceRow>(
        r#"
        SELECT id, aisle, section, position, kind, percent, updated_at
        FROM available_spaces
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(AvailableSpaceRow::into_space).transpose()
}

pub async fn list_by_kind(pool: &PgPool, kind: BinKind) -> Result<Vec<AvailableSpace>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AvailableSpaceRow>(
        r#"
        SELECT id, aisle, section, position, kind, percent, updated_at
        FROM available_spaces
        WHERE kind = $1
        ORDER BY aisle, section, position
        "#,
    )
    .bind(kind.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(AvailableSpaceRow::into_space).collect()
}

pub async fn create(
    pool: &PgPool,
    aisle: i32,
    section: i32,
    position: BinPosition,
    kind: BinKind,
    percent: i32,
) -> Result<AvailableSpace, sqlx::Error> {
    let row = sqlx::query_as::<_, AvailableSpaceRow>(
        r#"
        INSERT INTO available_spaces (aisle, section, position, kind, percent)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, aisle, section, position, kind, percent, updated_at
        "#,
    )
    .bind(aisle)
    .bind(section)
    .bind(position.as_str())
    .bind(kind.as_str())
    .bind(percent)
    .fetch_one(pool)
    .await?;

    row.into_space()
}

/// Caller is responsible for bounding `percent` to [0, 100].
pub async fn update_percent(
    pool: &PgPool,
    id: i64,
    percent: i32,
) -> Result<Option<AvailableSpace>, sqlx::Error> {
    let row = sqlx::query_as::<_, AvailableSpaceRow>(
        r#"
        UPDATE available_spaces
        SET percent = $1, updated_at = now()
        WHERE id = $2
        RETURNING id, aisle, section, position, kind, percent, updated_at
        "#,
    )
    .bind(percent)
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(AvailableSpaceRow::into_space).transpose()
}
