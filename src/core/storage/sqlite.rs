use std::{
    cell::{Cell, OnceCell},
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Row, params};
use tracing::{debug, warn};

use super::{StoreError, StoreResult, TranslationStore};
use crate::core::{TransUnit, Translation, UnitId, UnitKey};

pub const TRANS_UNIT_TABLE: &str = "trans_unit";
pub const TRANSLATION_TABLE: &str = "trans_unit_translations";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS trans_unit (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    key_name TEXT NOT NULL,
    domain TEXT NOT NULL DEFAULT 'messages',
    from_file INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (key_name, domain)
);
CREATE TABLE IF NOT EXISTS trans_unit_translations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    trans_unit_id INTEGER NOT NULL REFERENCES trans_unit (id) ON DELETE CASCADE,
    locale TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (trans_unit_id, locale)
);
CREATE INDEX IF NOT EXISTS trans_unit_translations_locale
    ON trans_unit_translations (locale);
"#;

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    Memory,
}

/// SQLite-backed [`TranslationStore`].
///
/// File databases are opened lazily. Read operations never create the
/// database file: against a missing file they report no tables and empty
/// counts. The first write creates the file (and its parent directory).
pub struct SqliteStore {
    location: Location,
    conn: OnceCell<Connection>,
    in_transaction: Cell<bool>,
}

impl SqliteStore {
    /// Store backed by the database file at `path`. No I/O happens here.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            location: Location::File(path.into()),
            conn: OnceCell::new(),
            in_transaction: Cell::new(false),
        }
    }

    /// Private in-memory database.
    pub fn in_memory() -> StoreResult<Self> {
        let store = Self {
            location: Location::Memory,
            conn: OnceCell::new(),
            in_transaction: Cell::new(false),
        };
        store.connection()?;
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    /// Connection for writes, creating the database if needed.
    fn connection(&self) -> StoreResult<&Connection> {
        if let Some(conn) = self.conn.get() {
            return Ok(conn);
        }

        let conn = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent()
                    && !parent.as_os_str().is_empty()
                {
                    fs::create_dir_all(parent)?;
                }
                debug!(path = %path.display(), "opening database");
                Connection::open(path)?
            }
            Location::Memory => Connection::open_in_memory()?,
        };
        enable_foreign_keys(&conn)?;
        Ok(self.conn.get_or_init(|| conn))
    }

    /// Connection to an already existing database, if any.
    fn existing_connection(&self) -> Option<&Connection> {
        if let Some(conn) = self.conn.get() {
            return Some(conn);
        }

        let Location::File(path) = &self.location else {
            return None;
        };
        if !path.is_file() {
            return None;
        }

        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let opened = Connection::open_with_flags(path, flags)
            .and_then(|conn| enable_foreign_keys(&conn).map(|()| conn));
        match opened {
            Ok(conn) => Some(self.conn.get_or_init(|| conn)),
            Err(e) => {
                warn!(path = %path.display(), "cannot open database: {}", e);
                None
            }
        }
    }

    /// Connection for read queries, only when the schema is installed.
    fn schema_connection(&self) -> Option<&Connection> {
        if self.tables_exist() {
            self.existing_connection()
        } else {
            None
        }
    }

    /// Connection with an open unit of work.
    fn begin(&self) -> StoreResult<&Connection> {
        let conn = self.connection()?;
        if !self.in_transaction.get() {
            conn.execute_batch("BEGIN")?;
            self.in_transaction.set(true);
        }
        Ok(conn)
    }

    fn load_translations(conn: &Connection, unit_id: UnitId) -> StoreResult<Vec<Translation>> {
        let mut stmt = conn.prepare(
            "SELECT id, trans_unit_id, locale, content, created_at, updated_at
             FROM trans_unit_translations
             WHERE trans_unit_id = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![unit_id], row_to_translation)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn row_to_unit(row: &Row<'_>) -> rusqlite::Result<TransUnit> {
    Ok(TransUnit {
        id: row.get(0)?,
        key: row.get(1)?,
        domain: row.get(2)?,
        from_file: row.get(3)?,
        translations: Vec::new(),
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn row_to_translation(row: &Row<'_>) -> rusqlite::Result<Translation> {
    Ok(Translation {
        id: row.get(0)?,
        unit_id: row.get(1)?,
        locale: row.get(2)?,
        content: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

/// Run a `SELECT name, COUNT(..) ... GROUP BY name` query into a map.
fn collect_counts(
    conn: &Connection,
    sql: &str,
    param: Option<&str>,
) -> StoreResult<BTreeMap<String, usize>> {
    let map_row = |row: &Row<'_>| -> rusqlite::Result<(String, i64)> {
        Ok((row.get(0)?, row.get(1)?))
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = match param {
        Some(value) => stmt
            .query_map(params![value], map_row)?
            .collect::<Result<Vec<_>, _>>()?,
        None => stmt.query_map([], map_row)?.collect::<Result<Vec<_>, _>>()?,
    };

    Ok(rows
        .into_iter()
        .map(|(name, count)| (name, count.max(0) as usize))
        .collect())
}

impl TranslationStore for SqliteStore {
    fn install_schema(&mut self) -> StoreResult<()> {
        self.connection()?.execute_batch(SCHEMA)?;
        Ok(())
    }

    fn find_unit(&self, key: &UnitKey) -> StoreResult<Option<TransUnit>> {
        let conn = self.connection()?;
        let unit = conn
            .query_row(
                "SELECT id, key_name, domain, from_file, created_at, updated_at
                 FROM trans_unit
                 WHERE key_name = ?1 AND domain = ?2",
                params![key.key, key.domain],
                row_to_unit,
            )
            .optional()?;

        match unit {
            Some(mut unit) => {
                unit.translations = Self::load_translations(conn, unit.id)?;
                Ok(Some(unit))
            }
            None => Ok(None),
        }
    }

    fn create_unit(&mut self, key: &UnitKey, from_file: bool) -> StoreResult<TransUnit> {
        if !key.is_valid() {
            return Err(StoreError::InvalidUnit(key.clone()));
        }

        let conn = self.begin()?;
        let now = Utc::now();
        conn.execute(
            "INSERT INTO trans_unit (key_name, domain, from_file, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![key.key, key.domain, from_file, now],
        )?;

        let id = conn.last_insert_rowid();
        debug!(unit = %key, id, "created translation unit");
        Ok(TransUnit {
            id,
            key: key.key.clone(),
            domain: key.domain.clone(),
            from_file,
            translations: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    fn put_translation(
        &mut self,
        unit_id: UnitId,
        locale: &str,
        content: &str,
    ) -> StoreResult<Translation> {
        let conn = self.begin()?;

        let exists = conn
            .query_row(
                "SELECT 1 FROM trans_unit WHERE id = ?1",
                params![unit_id],
                |_| Ok(()),
            )
            .optional()?;
        if exists.is_none() {
            return Err(StoreError::UnitNotFound(unit_id));
        }

        let now = Utc::now();
        let changed = conn.execute(
            "INSERT INTO trans_unit_translations
                 (trans_unit_id, locale, content, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT (trans_unit_id, locale) DO UPDATE
                 SET content = excluded.content, updated_at = excluded.updated_at
                 WHERE trans_unit_translations.content <> excluded.content",
            params![unit_id, locale, content, now],
        )?;

        if changed > 0 {
            conn.execute(
                "UPDATE trans_unit SET updated_at = ?1 WHERE id = ?2",
                params![now, unit_id],
            )?;
        }

        let translation = conn.query_row(
            "SELECT id, trans_unit_id, locale, content, created_at, updated_at
             FROM trans_unit_translations
             WHERE trans_unit_id = ?1 AND locale = ?2",
            params![unit_id, locale],
            row_to_translation,
        )?;
        Ok(translation)
    }

    fn flush(&mut self) -> StoreResult<()> {
        if self.in_transaction.get() {
            self.connection()?.execute_batch("COMMIT")?;
            self.in_transaction.set(false);
        }
        Ok(())
    }

    fn tables_exist(&self) -> bool {
        let Some(conn) = self.existing_connection() else {
            return false;
        };

        let found = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN (?1, ?2)",
            params![TRANS_UNIT_TABLE, TRANSLATION_TABLE],
            |row| row.get::<_, i64>(0),
        );
        match found {
            Ok(count) => count == 2,
            Err(e) => {
                warn!("cannot inspect database schema: {}", e);
                false
            }
        }
    }

    fn latest_updated_at(&self) -> StoreResult<Option<DateTime<Utc>>> {
        let Some(conn) = self.schema_connection() else {
            return Ok(None);
        };
        let latest = conn.query_row(
            "SELECT MAX(updated_at) FROM trans_unit_translations",
            [],
            |row| row.get::<_, Option<DateTime<Utc>>>(0),
        )?;
        Ok(latest)
    }

    fn count_units_by_domain(&self) -> StoreResult<BTreeMap<String, usize>> {
        let Some(conn) = self.schema_connection() else {
            return Ok(BTreeMap::new());
        };
        collect_counts(
            conn,
            "SELECT domain, COUNT(id) FROM trans_unit GROUP BY domain",
            None,
        )
    }

    fn count_translations_by_locale(&self, domain: &str) -> StoreResult<BTreeMap<String, usize>> {
        let Some(conn) = self.schema_connection() else {
            return Ok(BTreeMap::new());
        };
        collect_counts(
            conn,
            "SELECT t.locale, COUNT(t.id)
             FROM trans_unit_translations t
             JOIN trans_unit u ON u.id = t.trans_unit_id
             WHERE u.domain = ?1
             GROUP BY t.locale",
            Some(domain),
        )
    }
}

/// Set on every connection so `ON DELETE CASCADE` applies to all writes.
fn enable_foreign_keys(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)
}
