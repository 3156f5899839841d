use sqlx::{PgPool, QueryBuilder};

use crate::models::SafetyMessageRow;
use kiosk_core::types::{MessagePriority, SafetyMessage};

/// Active messages, urgent first, then most recently updated.
pub async fn list_active(pool: &PgPool) -> Result<Vec<SafetyMessage>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SafetyMessageRow>(
        r#"
        SELECT id, text, priority, is_active, updated_at
        FROM safety_messages
        WHERE is_active = true
        ORDER BY
            CASE WHEN priority = 'urgent' THEN 0 ELSE 1 END,
            updated_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(SafetyMessageRow::into_message).collect()
}

pub async fn get_by_id(pool: &PgPool, id: i64) -> Result<Option<SafetyMessage>, sqlx::Error> {
    let row = sqlx::query_as::<_, SafetyMessageRow>(
        r#"
        SELECT id, text, priority, is_active, updated_at
        FROM safety_messages
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(SafetyMessageRow::into_message).transpose()
}

pub async fn create(
    pool: &PgPool,
    text: &str,
    priority: MessagePriority,
) -> Result<SafetyMessage, sqlx::Error> {
    let row = sqlx::query_as::<_, SafetyMessageRow>(
        r#"
        INSERT INTO safety_messages (text, priority, is_active)
        VALUES ($1, $2, true)
        RETURNING id, text, priority, is_active, updated_at
        "#,
    )
    .bind(text)
    .bind(priority.as_str())
    .fetch_one(pool)
    .await?;

    row.into_message()
}

pub async fn update(
    pool: &PgPool,
    id: i64,
    text: Option<&str>,
    priority: Option<MessagePriority>,
    is_active: Option<bool>,
) -> Result<Option<SafetyMessage>, sqlx::Error> {
    if text.is_none() && priority.is_none() && is_active.is_none() {
        return get_by_id(pool, id).await;
    }

    let mut qb = QueryBuilder::new("UPDATE safety_messages SET ");
    let mut set = qb.separated(", ");

    if let Some(text) = text {
        set.push("text = ").push_bind_unseparated(text);
    }
    if let Some(priority) = priority {
        set.push("priority = ").push_bind_unseparated(priority.as_str());
    }
    if let Some(is_active) = is_active {
        set.push("is_active = ").push_bind_unseparated(is_active);
    }
    set.push("updated_at = now()");

    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING id, text, priority, is_active, updated_at");

    let row = qb
        .build_query_as::<SafetyMessageRow>()
        .fetch_optional(pool)
        .await?;

    row.map(SafetyMessageRow::into_message).transpose()
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM safety_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
