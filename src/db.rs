use crate::models::Highlight;
use rusqlite::{params, Connection};
use std::path::Path;

#[derive(Debug)]
pub enum DbError {
    ConnectionFailed(String),
    QueryFailed(String),
}

impl std::fmt::Display for DbError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DbError::ConnectionFailed(e) => write!(f, "Failed to connect to database: {}", e),
            DbError::QueryFailed(e) => write!(f, "Query failed: {}", e),
        }
    }
}

impl std::error::Error for DbError {}

impl From<rusqlite::Error> for DbError {
    fn from(e: rusqlite::Error) -> Self {
        DbError::QueryFailed(e.to_string())
    }
}

pub fn init_db(path: &Path) -> Result<Connection, DbError> {
    let conn = Connection::open(path)
        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS highlights (
            id INTEGER PRIMARY KEY,
            book_title TEXT NOT NULL,
            book_author TEXT NOT NULL,
            kind TEXT NOT NULL,
            page INTEGER,
            location_start INTEGER NOT NULL,
            location_end INTEGER,
            text TEXT NOT NULL,
            added_on TEXT NOT NULL,
            processed INTEGER DEFAULT 0,
            created_at TEXT DEFAULT CURRENT_TIMESTAMP,
            UNIQUE(book_title, location_start, text)
        )",
        [],
    )?;

    Ok(conn)
}

/// Stores one clipping. Returns `false` when the same clipping was already imported.
pub fn insert_highlight(conn: &Connection, highlight: &Highlight) -> Result<bool, DbError> {
    let metadata = &highlight.metadata;
    let added_on = metadata.date.format("%Y-%m-%d %H:%M:%S").to_string();

    let rows = conn.execute(
        "INSERT OR IGNORE INTO highlights
         (book_title, book_author, kind, page, location_start, location_end, text, added_on)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            highlight.book.title,
            highlight.book.author,
            metadata.kind.as_str(),
            metadata.page.map(|p| p.number),
            metadata.location.start,
            metadata.location.end,
            highlight.text,
            added_on,
        ],
    )?;

    Ok(rows > 0)
}
