/// SQLite-backed durable glossary store.
///
/// One table keyed by `keyword`. The table name is supplied by configuration,
/// so it is validated as a plain identifier before being spliced into SQL.
/// Full scans read at most `SCAN_LIMIT` rows.
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use glossbot_core::{EntrySummary, GlossaryEntry, GlossError, GlossaryStore};
use once_cell::sync::Lazy;
use regex::Regex;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Best-effort cap on rows returned by a scan.
pub const SCAN_LIMIT: usize = 1000;

static TABLE_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex"));

/// Whether `name` can be used as the glossary table identifier.
pub fn is_valid_table_name(name: &str) -> bool {
    TABLE_NAME_PATTERN.is_match(name)
}

pub struct SqliteGlossaryStore {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteGlossaryStore {
    /// Create or open a database at the given path.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .context("Failed to open SQLite glossary database")?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")
            .context("Failed to enable WAL journal")?;

        let store = Self::init(conn, table)?;
        info!(path = ?path.as_ref(), table = %store.table, "SqliteGlossaryStore opened");
        Ok(store)
    }

    /// Open an in-memory database (for tests and `glossbot exec`).
    pub fn in_memory(table: &str) -> Result<Self> {
        Self::init(Connection::open_in_memory()?, table)
    }

    fn init(conn: Connection, table: &str) -> Result<Self> {
        if !is_valid_table_name(table) {
            return Err(GlossError::Config(format!("invalid table name {table:?}")).into());
        }
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                 keyword     TEXT PRIMARY KEY,
                 description TEXT NOT NULL,
                 created_at  INTEGER
             );"
        ))
        .context("Failed to initialize glossary schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
            table: table.to_string(),
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl GlossaryStore for SqliteGlossaryStore {
    async fn get(&self, keyword: &str) -> Result<Option<GlossaryEntry>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT keyword, description, created_at FROM \"{}\" WHERE keyword = ?1",
            self.table
        );
        let entry = conn
            .query_row(&sql, params![keyword], |row| {
                Ok(GlossaryEntry {
                    keyword: row.get(0)?,
                    description: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })
            .optional()
            .with_context(|| format!("Failed to read glossary entry {keyword:?}"))?;
        Ok(entry)
    }

    async fn put(&self, entry: GlossaryEntry) -> Result<()> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "INSERT OR REPLACE INTO \"{}\" (keyword, description, created_at)
             VALUES (?1, ?2, ?3)",
            self.table
        );
        conn.execute(&sql, params![entry.keyword, entry.description, entry.created_at])
            .with_context(|| format!("Failed to write glossary entry {:?}", entry.keyword))?;
        debug!(keyword = %entry.keyword, "Stored glossary entry");
        Ok(())
    }

    async fn update_description(&self, keyword: &str, description: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "INSERT INTO \"{}\" (keyword, description) VALUES (?1, ?2)
             ON CONFLICT(keyword) DO UPDATE SET description = excluded.description",
            self.table
        );
        conn.execute(&sql, params![keyword, description])
            .with_context(|| format!("Failed to update glossary entry {keyword:?}"))?;
        debug!(keyword = %keyword, "Updated glossary description");
        Ok(())
    }

    async fn delete(&self, keyword: &str) -> Result<()> {
        let conn = self.conn.lock().await;
        let sql = format!("DELETE FROM \"{}\" WHERE keyword = ?1", self.table);
        conn.execute(&sql, params![keyword])
            .with_context(|| format!("Failed to delete glossary entry {keyword:?}"))?;
        Ok(())
    }

    async fn scan_summaries(&self) -> Result<Vec<EntrySummary>> {
        let conn = self.conn.lock().await;
        let sql = format!(
            "SELECT keyword, created_at FROM \"{}\" \
             ORDER BY created_at IS NULL, created_at DESC LIMIT {SCAN_LIMIT}",
            self.table
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(EntrySummary {
                    keyword: row.get(0)?,
                    created_at: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to scan glossary summaries")?;
        Ok(rows)
    }

    async fn scan_keywords(&self) -> Result<Vec<String>> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT keyword FROM \"{}\" LIMIT {SCAN_LIMIT}", self.table);
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()
            .context("Failed to scan glossary keywords")?;
        Ok(rows)
    }
}
