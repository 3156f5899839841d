use sqlx::{PgPool, QueryBuilder};

use crate::models::StationRow;
use kiosk_core::protocol::StationPatch;
use kiosk_core::types::{Side, Station};

pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<Station>, sqlx::Error> {
    let row = sqlx::query_as::<_, StationRow>(
        r#"
        SELECT id, side, floor, level, station_number, status, end_indicator, updated_at
        FROM stations
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(StationRow::into_station).transpose()
}

/// Stations for one side in stable display order (level, then number).
pub async fn list_by_side(pool: &PgPool, side: Side) -> Result<Vec<Station>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StationRow>(
        r#"
        SELECT id, side, floor, level, station_number, status, end_indicator, updated_at
        FROM stations
        WHERE side = $1
        ORDER BY level, station_number
        "#,
    )
    .bind(side.as_str())
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StationRow::into_station).collect()
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Station>, sqlx::Error> {
    let rows = sqlx::query_as::<_, StationRow>(
        r#"
        SELECT id, side, floor, level, station_number, status, end_indicator, updated_at
        FROM stations
        ORDER BY floor, level, station_number
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(StationRow::into_station).collect()
}

/// Applies a validated field-level patch. Only supplied fields enter the
/// SET clause, so a status-only writer and an indicator-only writer cannot
/// clobber each other's field. Returns `None` when the station does not
/// exist. `updated_at` is set on every successful write.
pub async fn apply(
    pool: &PgPool,
    id: i64,
    patch: &StationPatch,
) -> Result<Option<Station>, sqlx::Error> {
    let mut qb = QueryBuilder::new("UPDATE stations SET ");
    let mut set = qb.separated(", ");

    if let Some(status) = patch.status {
        set.push("status = ").push_bind_unseparated(status.as_str());
    }
    if let Some(end_indicator) = patch.end_indicator {
        set.push("end_indicator = ")
            .push_bind_unseparated(end_indicator.as_str());
    }
    set.push("updated_at = now()");

    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING id, side, floor, level, station_number, status, end_indicator, updated_at");

    let row = qb
        .build_query_as::<StationRow>()
        .fetch_optional(pool)
        .await?;

    row.map(StationRow::into_station).transpose()
}
