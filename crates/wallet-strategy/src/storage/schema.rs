//! Database schema definitions.
//!
//! Set-valued columns (`codes`, `methods`, `key_binds`) hold JSON arrays so
//! insertion order survives a round trip.

use rusqlite::{Connection, OptionalExtension};

use crate::error::Result;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 1;

const STRATEGY_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS msg_type_templates (
    name        TEXT PRIMARY KEY NOT NULL,
    codes       TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS method_templates (
    name        TEXT PRIMARY KEY NOT NULL,
    methods     TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS key_binds (
    name        TEXT PRIMARY KEY NOT NULL,
    address     TEXT NOT NULL,
    codes       TEXT NOT NULL,
    methods     TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_key_binds_address ON key_binds(address);

CREATE TABLE IF NOT EXISTS strategy_groups (
    name        TEXT PRIMARY KEY NOT NULL,
    key_binds   TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS tokens (
    token       TEXT PRIMARY KEY NOT NULL,
    group_name  TEXT NOT NULL,
    created_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_tokens_group ON tokens(group_name);
"#;

/// Create or verify the schema. Safe to call on every open.
pub fn init_schema(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;

    if current == 0 {
        log::info!("creating strategy schema v{SCHEMA_VERSION}");
        conn.execute_batch(STRATEGY_SCHEMA)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else {
        log::debug!("strategy schema is at v{current}");
    }

    Ok(())
}

/// Current schema version (0 if not initialized).
pub fn schema_version(conn: &Connection) -> Result<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;
    let version = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}
