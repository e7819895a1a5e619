//! SQLite-backed annotation store.
//!
//! The store is append-only: rows are created by [`AnnotationStore::insert`]
//! or [`AnnotationStore::insert_many`] and never updated or deleted here. It
//! records boxes as given and does not check their geometry.
//!
//! All access goes through one connection behind a mutex, so concurrent
//! writers are serialized and a single insert is never interleaved with
//! another.

mod schema;
mod types;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use labelbench_core::{BBox, Label};
use rusqlite::{params, Connection, Row};

pub use schema::{schema_version, SCHEMA_VERSION};
pub use types::{Annotation, LabelCount, NewAnnotation, StoreError};

/// How long a writer waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const SELECT_COLUMNS: &str = "SELECT id, image_path, label, x1, y1, x2, y2, created_at FROM annotations";

/// Durable mapping from image path to labeled boxes.
pub struct AnnotationStore {
    conn: Mutex<Connection>,
}

impl AnnotationStore {
    /// Open or create a store at the given path with WAL mode.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path).map_err(StoreError::Open)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(StoreError::Open)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(StoreError::Open)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().map_err(StoreError::Open)?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Ensure the schema exists. Safe to call any number of times.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        schema::initialize(&conn)
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Append one annotation and return its id.
    pub fn insert(&self, image_path: &str, label: &Label, bbox: BBox) -> Result<i64, StoreError> {
        if image_path.is_empty() {
            return Err(StoreError::InvalidImagePath);
        }
        let conn = self.lock()?;
        insert_row(&conn, image_path, label, bbox)?;
        Ok(conn.last_insert_rowid())
    }

    /// Append a batch of annotations in one transaction.
    ///
    /// Either every row is committed or none is, so readers never see part
    /// of a batch. Returns the new ids in input order.
    pub fn insert_many(&self, annotations: &[NewAnnotation]) -> Result<Vec<i64>, StoreError> {
        if annotations.iter().any(|a| a.image_path.is_empty()) {
            return Err(StoreError::InvalidImagePath);
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction().map_err(StoreError::Write)?;
        let mut ids = Vec::with_capacity(annotations.len());
        for annotation in annotations {
            insert_row(&tx, &annotation.image_path, &annotation.label, annotation.bbox)?;
            ids.push(tx.last_insert_rowid());
        }
        tx.commit().map_err(StoreError::Write)?;
        Ok(ids)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Every annotation, ordered by id.
    pub fn fetch_all(&self) -> Result<Vec<Annotation>, StoreError> {
        let conn = self.lock()?;
        query_annotations(&conn, &format!("{SELECT_COLUMNS} ORDER BY id"), [])
    }

    /// The first `limit` annotations, ordered by id.
    pub fn fetch_annotations(&self, limit: usize) -> Result<Vec<Annotation>, StoreError> {
        let conn = self.lock()?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        query_annotations(
            &conn,
            &format!("{SELECT_COLUMNS} ORDER BY id LIMIT ?1"),
            params![limit],
        )
    }

    /// Annotations whose image path equals `image_path` exactly.
    pub fn fetch_by_image(&self, image_path: &str) -> Result<Vec<Annotation>, StoreError> {
        let conn = self.lock()?;
        query_annotations(
            &conn,
            &format!("{SELECT_COLUMNS} WHERE image_path = ?1 ORDER BY id"),
            params![image_path],
        )
    }

    /// Distinct image paths, sorted.
    pub fn image_paths(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT DISTINCT image_path FROM annotations ORDER BY image_path")
            .map_err(StoreError::Read)?;
        let paths = stmt
            .query_map([], |row| row.get(0))
            .map_err(StoreError::Read)?
            .collect::<Result<Vec<String>, _>>()
            .map_err(StoreError::Read)?;
        Ok(paths)
    }

    /// Annotation count per label, sorted by label.
    pub fn label_counts(&self) -> Result<Vec<LabelCount>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT label, COUNT(*) FROM annotations GROUP BY label ORDER BY label")
            .map_err(StoreError::Read)?;
        let counts = stmt
            .query_map([], |row| {
                Ok(LabelCount {
                    label: row.get(0)?,
                    count: row.get::<_, i64>(1)? as u64,
                })
            })
            .map_err(StoreError::Read)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::Read)?;
        Ok(counts)
    }

    /// Total number of annotations.
    pub fn count(&self) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM annotations", [], |row| row.get(0))
            .map_err(StoreError::Read)?;
        Ok(count as usize)
    }
}

fn insert_row(
    conn: &Connection,
    image_path: &str,
    label: &Label,
    bbox: BBox,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO annotations (image_path, label, x1, y1, x2, y2) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![image_path, label.as_str(), bbox.x1, bbox.y1, bbox.x2, bbox.y2],
    )
    .map_err(StoreError::Write)?;
    Ok(())
}

fn query_annotations<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Annotation>, StoreError> {
    let mut stmt = conn.prepare(sql).map_err(StoreError::Read)?;
    let rows = stmt
        .query_map(params, row_to_annotation)
        .map_err(StoreError::Read)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(StoreError::Read)?;
    Ok(rows)
}

fn row_to_annotation(row: &Row<'_>) -> rusqlite::Result<Annotation> {
    Ok(Annotation {
        id: row.get(0)?,
        image_path: row.get(1)?,
        label: row.get(2)?,
        bbox: BBox::new(row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?),
        created_at: row.get(7)?,
    })
}
