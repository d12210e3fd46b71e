//! Named client-state slots
//!
//! The client keeps two slots: the logged-in username and the access
//! token issued with it. Only the username is ever read back by the chat.

use petshop_core::{Error, Result};
use sqlx::SqlitePool;

pub const USERNAME_SLOT: &str = "username";
pub const TOKEN_SLOT: &str = "token";

pub async fn get_slot(pool: &SqlitePool, slot: &str) -> Result<Option<String>> {
    sqlx::query_scalar::<sqlx::Sqlite, String>("SELECT value FROM client_state WHERE slot = ?")
        .bind(slot)
        .fetch_optional(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))
}

/// Insert or overwrite a slot
pub async fn set_slot(pool: &SqlitePool, slot: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO client_state (slot, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(slot) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(slot)
    .bind(value)
    .execute(pool)
    .await
    .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

pub async fn remove_slot(pool: &SqlitePool, slot: &str) -> Result<()> {
    sqlx::query("DELETE FROM client_state WHERE slot = ?")
        .bind(slot)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Persist a successful login
pub async fn save_login(pool: &SqlitePool, username: &str, token: &str) -> Result<()> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    for (slot, value) in [(USERNAME_SLOT, username), (TOKEN_SLOT, token)] {
        sqlx::query(
            r#"
            INSERT INTO client_state (slot, value, updated_at)
            VALUES (?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(slot) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(slot)
        .bind(value)
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;
    }

    tx.commit()
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))
}

/// Forget the saved login
pub async fn clear_login(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM client_state WHERE slot IN (?, ?)")
        .bind(USERNAME_SLOT)
        .bind(TOKEN_SLOT)
        .execute(pool)
        .await
        .map_err(|e| Error::DatabaseError(e.to_string()))?;

    Ok(())
}

/// Username to restore at startup; only when a token was saved with it
pub async fn restore_identity(pool: &SqlitePool) -> Result<Option<String>> {
    let username = get_slot(pool, USERNAME_SLOT).await?;
    let token = get_slot(pool, TOKEN_SLOT).await?;

    Ok(match (username, token) {
        (Some(username), Some(token)) if !username.is_empty() && !token.is_empty() => Some(username),
        _ => None,
    })
}
