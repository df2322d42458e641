//! Group rows: `strategy_groups`.
//!
//! The `key_binds` column holds the full JSON snapshot of every key-bind the
//! group was created from.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::policy::Group;

use super::Page;

type GroupRow = (String, String, i64);

fn group_row(row: &Row<'_>) -> rusqlite::Result<GroupRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

fn group_from_row((name, key_binds, created_at): GroupRow) -> Result<Group> {
    Ok(Group {
        name,
        key_binds: serde_json::from_str(&key_binds)?,
        created_at,
    })
}

pub fn group_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM strategy_groups WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_group(conn: &Connection, group: &Group) -> Result<()> {
    conn.execute(
        "INSERT INTO strategy_groups (name, key_binds, created_at) VALUES (?1, ?2, ?3)",
        params![
            group.name,
            serde_json::to_string(&group.key_binds)?,
            group.created_at
        ],
    )?;
    Ok(())
}

pub fn get_group(conn: &Connection, name: &str) -> Result<Option<Group>> {
    let row = conn
        .query_row(
            "SELECT name, key_binds, created_at FROM strategy_groups WHERE name = ?1",
            params![name],
            group_row,
        )
        .optional()?;
    row.map(group_from_row).transpose()
}

pub fn list_groups(conn: &Connection, page: Page) -> Result<Vec<Group>> {
    let mut stmt = conn.prepare(
        "SELECT name, key_binds, created_at FROM strategy_groups
         ORDER BY rowid LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], group_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(group_from_row).collect()
}

pub fn delete_group(conn: &Connection, name: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM strategy_groups WHERE name = ?1",
        params![name],
    )?;
    Ok(rows > 0)
}
