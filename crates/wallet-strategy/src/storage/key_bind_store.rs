//! Key-bind rows: `key_binds`.
//!
//! Row-level functions; see [`StrategyStore`](super::StrategyStore) for the
//! operations built on them.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::address::Address;
use crate::error::{Result, StrategyError};
use crate::policy::KeyBind;

use super::Page;

const SELECT_KEY_BIND: &str = "SELECT name, address, codes, methods, created_at FROM key_binds";

type KeyBindRow = (String, String, String, String, i64);

fn key_bind_row(row: &Row<'_>) -> rusqlite::Result<KeyBindRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn key_bind_from_row((name, address, codes, methods, created_at): KeyBindRow) -> Result<KeyBind> {
    let address = address.parse::<Address>().map_err(|e| {
        StrategyError::Serialization(format!("stored address for key-bind '{name}': {e}"))
    })?;
    Ok(KeyBind {
        address,
        codes: serde_json::from_str(&codes)?,
        methods: serde_json::from_str(&methods)?,
        created_at,
        name,
    })
}

pub fn key_bind_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM key_binds WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_key_bind(conn: &Connection, kb: &KeyBind) -> Result<()> {
    conn.execute(
        "INSERT INTO key_binds (name, address, codes, methods, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            kb.name,
            kb.address.as_str(),
            serde_json::to_string(&kb.codes)?,
            serde_json::to_string(&kb.methods)?,
            kb.created_at
        ],
    )?;
    Ok(())
}

/// Overwrite the code and method columns of an existing key-bind.
/// Returns `false` if no row matched.
pub fn update_key_bind_sets(conn: &Connection, kb: &KeyBind) -> Result<bool> {
    let rows = conn.execute(
        "UPDATE key_binds SET codes = ?2, methods = ?3 WHERE name = ?1",
        params![
            kb.name,
            serde_json::to_string(&kb.codes)?,
            serde_json::to_string(&kb.methods)?
        ],
    )?;
    Ok(rows > 0)
}

pub fn get_key_bind(conn: &Connection, name: &str) -> Result<Option<KeyBind>> {
    let row = conn
        .query_row(
            &format!("{SELECT_KEY_BIND} WHERE name = ?1"),
            params![name],
            key_bind_row,
        )
        .optional()?;
    row.map(key_bind_from_row).transpose()
}

pub fn get_key_binds_by_address(conn: &Connection, address: &Address) -> Result<Vec<KeyBind>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_KEY_BIND} WHERE address = ?1 ORDER BY rowid"
    ))?;
    let rows = stmt
        .query_map(params![address.as_str()], key_bind_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(key_bind_from_row).collect()
}

pub fn list_key_binds(conn: &Connection, page: Page) -> Result<Vec<KeyBind>> {
    let mut stmt = conn.prepare(&format!(
        "{SELECT_KEY_BIND} ORDER BY rowid LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], key_bind_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(key_bind_from_row).collect()
}

pub fn delete_key_bind(conn: &Connection, name: &str) -> Result<bool> {
    let rows = conn.execute("DELETE FROM key_binds WHERE name = ?1", params![name])?;
    Ok(rows > 0)
}

/// Delete every key-bind for an address. Returns the number of rows removed.
pub fn delete_key_binds_by_address(conn: &Connection, address: &Address) -> Result<usize> {
    let rows = conn.execute(
        "DELETE FROM key_binds WHERE address = ?1",
        params![address.as_str()],
    )?;
    Ok(rows)
}
