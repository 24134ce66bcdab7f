//! Database query implementations

use crate::error::{Result, StoreError};
use crate::types::{Document, FieldMap};
use rusqlite::{params, Connection};

/// Insert a document into a collection
pub fn insert_document(conn: &Connection, collection: &str, doc: &Document) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO documents (id, collection, fields, created_at)
        VALUES (?, ?, ?, ?)
        "#,
        params![
            doc.id.as_str(),
            collection,
            serde_json::to_string(&doc.fields)?,
            chrono::Utc::now().to_rfc3339(),
        ],
    )?;

    Ok(())
}

/// List a collection's documents in insertion order
pub fn list_documents(conn: &Connection, collection: &str) -> Result<Vec<Document>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, fields
        FROM documents
        WHERE collection = ?
        ORDER BY seq ASC
        "#,
    )?;

    let rows = stmt
        .query_map(params![collection], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(id, fields)| -> Result<Document> {
            let fields: FieldMap = serde_json::from_str(&fields).map_err(|e| {
                StoreError::InvalidDocument {
                    id: id.clone(),
                    reason: e.to_string(),
                }
            })?;
            Ok(Document::new(id, fields))
        })
        .collect()
}

/// Count the documents in a collection
pub fn count_documents(conn: &Connection, collection: &str) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM documents WHERE collection = ?",
        params![collection],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
