//! SQLite-backed storage of the prebuilt embedding vectors.
//!
//! The file holds the vectors and, optionally, the id of the encoder that
//! produced them:
//!
//! ```sql
//! CREATE TABLE vectors (
//!     position INTEGER PRIMARY KEY,
//!     embedding BLOB NOT NULL
//! );
//! CREATE TABLE meta (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL
//! );
//! ```
//!
//! Embeddings are little-endian `f32` sequences. Positions are dense and
//! define the ordering the metadata table is aligned with. The encoder id
//! is stored under the `model` key.

use gita_core::{AppError, AppResult};
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use std::path::Path;

/// Open the vector database read-only.
pub fn open_index(db_path: &Path) -> AppResult<Connection> {
    if !db_path.exists() {
        return Err(AppError::Corpus(format!(
            "Vector index not found at {:?}",
            db_path
        )));
    }

    let conn = Connection::open_with_flags(
        db_path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(|e| AppError::Corpus(format!("Failed to open vector index: {}", e)))?;

    tracing::debug!("Opened vector index at {:?}", db_path);
    Ok(conn)
}

/// Read every vector in position order.
///
/// Fails when positions are not exactly `0..n` or when vectors disagree on
/// dimension: either means the file does not match its metadata.
pub fn load_vectors(conn: &Connection) -> AppResult<Vec<Vec<f32>>> {
    let mut stmt = conn
        .prepare("SELECT position, embedding FROM vectors ORDER BY position ASC")
        .map_err(|e| AppError::Corpus(format!("Failed to prepare vector query: {}", e)))?;

    let rows = stmt
        .query_map([], |row| {
            let position: i64 = row.get(0)?;
            let bytes: Vec<u8> = row.get(1)?;
            Ok((position, bytes))
        })
        .map_err(|e| AppError::Corpus(format!("Failed to query vectors: {}", e)))?;

    let mut vectors: Vec<Vec<f32>> = Vec::new();
    for row in rows {
        let (position, bytes) =
            row.map_err(|e| AppError::Corpus(format!("Failed to read vector row: {}", e)))?;

        if position != vectors.len() as i64 {
            return Err(AppError::Integrity(format!(
                "Vector positions are not dense: expected {}, found {}",
                vectors.len(),
                position
            )));
        }

        let embedding = bytes_to_embedding(&bytes)?;
        if let Some(first) = vectors.first() {
            if first.len() != embedding.len() {
                return Err(AppError::Integrity(format!(
                    "Vector {} has dimension {}, expected {}",
                    position,
                    embedding.len(),
                    first.len()
                )));
            }
        }
        vectors.push(embedding);
    }

    tracing::debug!("Loaded {} vectors", vectors.len());
    Ok(vectors)
}

/// Read the recorded encoder id, if the index carries one.
pub fn load_encoder(conn: &Connection) -> AppResult<Option<String>> {
    let has_meta: bool = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'meta')",
            [],
            |row| row.get(0),
        )
        .map_err(|e| AppError::Corpus(format!("Failed to inspect vector index: {}", e)))?;

    if !has_meta {
        return Ok(None);
    }

    conn.query_row("SELECT value FROM meta WHERE key = 'model'", [], |row| {
        row.get(0)
    })
    .optional()
    .map_err(|e| AppError::Corpus(format!("Failed to read index encoder: {}", e)))
}

/// Convert bytes back to embedding vector.
fn bytes_to_embedding(bytes: &[u8]) -> AppResult<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return Err(AppError::Corpus(format!(
            "Invalid embedding blob length {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Write a vector file. Only test fixtures build indexes.
#[cfg(test)]
pub(crate) fn write_vectors(db_path: &Path, vectors: &[Vec<f32>]) -> AppResult<()> {
    use rusqlite::params;

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Corpus(format!("Failed to create vector index: {}", e)))?;
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS vectors (position INTEGER PRIMARY KEY, embedding BLOB NOT NULL);",
    )
    .map_err(|e| AppError::Corpus(format!("Failed to create table: {}", e)))?;

    for (position, vector) in vectors.iter().enumerate() {
        let bytes: Vec<u8> = vector.iter().flat_map(|v| v.to_le_bytes()).collect();
        conn.execute(
            "INSERT INTO vectors (position, embedding) VALUES (?1, ?2)",
            params![position as i64, bytes],
        )
        .map_err(|e| AppError::Corpus(format!("Failed to insert vector: {}", e)))?;
    }
    Ok(())
}

/// Record the encoder id in a vector file.
#[cfg(test)]
pub(crate) fn write_encoder(db_path: &Path, model: &str) -> AppResult<()> {
    use rusqlite::params;

    let conn = Connection::open(db_path)
        .map_err(|e| AppError::Corpus(format!("Failed to open vector index: {}", e)))?;
    conn.execute_batch("CREATE TABLE IF NOT EXISTS meta (key TEXT PRIMARY KEY, value TEXT NOT NULL);")
        .map_err(|e| AppError::Corpus(format!("Failed to create table: {}", e)))?;
    conn.execute(
        "INSERT OR REPLACE INTO meta (key, value) VALUES ('model', ?1)",
        params![model],
    )
    .map_err(|e| AppError::Corpus(format!("Failed to record encoder: {}", e)))?;
    Ok(())
}
