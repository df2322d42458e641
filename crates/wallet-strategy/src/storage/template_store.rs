//! Template rows: `msg_type_templates` and `method_templates`.
//!
//! Row-level functions. They run inside the caller's transaction and never
//! decide policy; argument checks and existence rules live in
//! [`StrategyStore`](super::StrategyStore).

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::policy::{MethodTemplate, MsgTypeTemplate};

use super::Page;

type TemplateRow = (String, String, i64);

fn template_row(row: &Row<'_>) -> rusqlite::Result<TemplateRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
}

// ── Message-type templates ────────────────────────────────────────────────────

pub fn msg_type_template_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM msg_type_templates WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_msg_type_template(conn: &Connection, template: &MsgTypeTemplate) -> Result<()> {
    conn.execute(
        "INSERT INTO msg_type_templates (name, codes, created_at) VALUES (?1, ?2, ?3)",
        params![
            template.name,
            serde_json::to_string(&template.codes)?,
            template.created_at
        ],
    )?;
    Ok(())
}

pub fn get_msg_type_template(conn: &Connection, name: &str) -> Result<Option<MsgTypeTemplate>> {
    let row = conn
        .query_row(
            "SELECT name, codes, created_at FROM msg_type_templates WHERE name = ?1",
            params![name],
            template_row,
        )
        .optional()?;
    row.map(msg_type_template_from_row).transpose()
}

pub fn list_msg_type_templates(conn: &Connection, page: Page) -> Result<Vec<MsgTypeTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT name, codes, created_at FROM msg_type_templates
         ORDER BY rowid LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], template_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(msg_type_template_from_row).collect()
}

pub fn delete_msg_type_template(conn: &Connection, name: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM msg_type_templates WHERE name = ?1",
        params![name],
    )?;
    Ok(rows > 0)
}

fn msg_type_template_from_row(
    (name, codes, created_at): TemplateRow,
) -> Result<MsgTypeTemplate> {
    Ok(MsgTypeTemplate {
        name,
        codes: serde_json::from_str(&codes)?,
        created_at,
    })
}

// ── Method templates ──────────────────────────────────────────────────────────

pub fn method_template_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM method_templates WHERE name = ?1",
            params![name],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn insert_method_template(conn: &Connection, template: &MethodTemplate) -> Result<()> {
    conn.execute(
        "INSERT INTO method_templates (name, methods, created_at) VALUES (?1, ?2, ?3)",
        params![
            template.name,
            serde_json::to_string(&template.methods)?,
            template.created_at
        ],
    )?;
    Ok(())
}

pub fn get_method_template(conn: &Connection, name: &str) -> Result<Option<MethodTemplate>> {
    let row = conn
        .query_row(
            "SELECT name, methods, created_at FROM method_templates WHERE name = ?1",
            params![name],
            template_row,
        )
        .optional()?;
    row.map(method_template_from_row).transpose()
}

pub fn list_method_templates(conn: &Connection, page: Page) -> Result<Vec<MethodTemplate>> {
    let mut stmt = conn.prepare(
        "SELECT name, methods, created_at FROM method_templates
         ORDER BY rowid LIMIT ?1 OFFSET ?2",
    )?;
    let rows = stmt
        .query_map(params![page.sql_limit(), page.sql_offset()], template_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.into_iter().map(method_template_from_row).collect()
}

pub fn delete_method_template(conn: &Connection, name: &str) -> Result<bool> {
    let rows = conn.execute(
        "DELETE FROM method_templates WHERE name = ?1",
        params![name],
    )?;
    Ok(rows > 0)
}

fn method_template_from_row(
    (name, methods, created_at): TemplateRow,
) -> Result<MethodTemplate> {
    Ok(MethodTemplate {
        name,
        methods: serde_json::from_str(&methods)?,
        created_at,
    })
}
