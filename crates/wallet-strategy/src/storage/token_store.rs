//! Token rows: `tokens`.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::policy::TokenInfo;

fn token_row(row: &Row<'_>) -> rusqlite::Result<TokenInfo> {
    Ok(TokenInfo {
        token: row.get(0)?,
        group_name: row.get(1)?,
        created_at: row.get(2)?,
    })
}

pub fn insert_token(conn: &Connection, info: &TokenInfo) -> Result<()> {
    conn.execute(
        "INSERT INTO tokens (token, group_name, created_at) VALUES (?1, ?2, ?3)",
        params![info.token, info.group_name, info.created_at],
    )?;
    Ok(())
}

pub fn get_token(conn: &Connection, token: &str) -> Result<Option<TokenInfo>> {
    let info = conn
        .query_row(
            "SELECT token, group_name, created_at FROM tokens WHERE token = ?1",
            params![token],
            token_row,
        )
        .optional()?;
    Ok(info)
}

pub fn list_tokens_by_group(conn: &Connection, group_name: &str) -> Result<Vec<TokenInfo>> {
    let mut stmt = conn.prepare(
        "SELECT token, group_name, created_at FROM tokens
         WHERE group_name = ?1 ORDER BY rowid",
    )?;
    let tokens = stmt
        .query_map(params![group_name], token_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(tokens)
}

pub fn delete_token(conn: &Connection, token: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM tokens WHERE token = ?1", params![token])?;
    Ok(rows > 0)
}

/// Delete every token bound to a group. Returns the number removed.
pub fn delete_tokens_by_group(conn: &Connection, group_name: &str) -> Result<usize> {
    let rows = conn.execute(
        "DELETE FROM tokens WHERE group_name = ?1",
        params![group_name],
    )?;
    Ok(rows)
}
