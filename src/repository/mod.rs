mod embedded;
pub mod query;

use embedded::migrations;

use chrono::{DateTime, SubsecRound, TimeDelta, Utc};
use rusqlite::{Connection, OptionalExtension, ToSql, params};

use std::path::{Path, PathBuf};

use crate::models::{Note, NotePatch};

use query::ListParams;

const SELECT_BY_ID: &str =
    "SELECT id, title, content, created_at, updated_at FROM notes WHERE id = ?1";

const SEED_NOTES: [(&str, &str); 2] = [
    ("Welcome", "This is your first note 🎉"),
    ("Hotkeys", "Create, edit, delete: it is all simple."),
];

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("migration error: {0}")]
    Migration(#[from] refinery::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub struct Repository {
    conn: Connection,
    path: PathBuf,
}

impl Repository {
    /// Open (or create) the database file with WAL journaling.
    pub fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        tracing::info!(
            "Opened database at {} (journal mode: {})",
            path.display(),
            journal_mode
        );

        Ok(Self { conn, path })
    }

    pub fn open_in_memory() -> RepositoryResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            path: PathBuf::from(":memory:"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn migrate(&mut self) -> RepositoryResult<()> {
        let migrations_report = migrations::runner().run(&mut self.conn)?;

        for migration in migrations_report.applied_migrations() {
            tracing::info!(
                "Migration Applied -  Name: {}, Version: {}",
                migration.name(),
                migration.version()
            );
        }

        tracing::info!("DB migrations finished!");

        Ok(())
    }

    pub fn create_note(&mut self, title: &str, content: &str) -> RepositoryResult<Note> {
        let now = now_millis();

        self.conn.execute(
            "INSERT INTO notes (title, content, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![title, content, now],
        )?;
        let id = self.conn.last_insert_rowid();

        Ok(self.conn.query_row(SELECT_BY_ID, [id], Note::from_row)?)
    }

    pub fn get_one_note(&self, id: i64) -> RepositoryResult<Option<Note>> {
        Ok(self
            .conn
            .query_row(SELECT_BY_ID, [id], Note::from_row)
            .optional()?)
    }

    /// Apply `patch` to the note, keeping omitted fields. `updated_at` always moves forward.
    pub fn update_note(&mut self, id: i64, patch: NotePatch) -> RepositoryResult<Option<Note>> {
        let tx = self.conn.transaction()?;

        let previous: Option<DateTime<Utc>> = tx
            .query_row("SELECT updated_at FROM notes WHERE id = ?1", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(previous) = previous else {
            return Ok(None);
        };

        tx.execute(
            "UPDATE notes SET title = COALESCE(?1, title), content = COALESCE(?2, content), \
             updated_at = ?3 WHERE id = ?4",
            params![patch.title, patch.content, next_timestamp(previous), id],
        )?;
        let note = tx.query_row(SELECT_BY_ID, [id], Note::from_row)?;
        tx.commit()?;

        Ok(Some(note))
    }

    pub fn delete_note(&mut self, id: i64) -> RepositoryResult<bool> {
        let rows = self.conn.execute("DELETE FROM notes WHERE id = ?1", [id])?;

        Ok(rows > 0)
    }

    pub fn list_notes(&self, list: &ListParams) -> RepositoryResult<Vec<Note>> {
        let sql = list.to_sql();
        let pattern = list.pattern();

        let mut bindings: Vec<(&str, &dyn ToSql)> = vec![
            (":limit", &list.limit as &dyn ToSql),
            (":offset", &list.offset as &dyn ToSql),
        ];
        if let Some(pattern) = &pattern {
            bindings.push((":pattern", pattern as &dyn ToSql));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let notes = stmt
            .query_map(bindings.as_slice(), Note::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    /// Insert the welcome notes used by `--init`.
    pub fn seed(&mut self) -> RepositoryResult<Vec<Note>> {
        SEED_NOTES
            .iter()
            .map(|(title, content)| self.create_note(title, content))
            .collect()
    }
}

fn now_millis() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    now_millis().max(previous + TimeDelta::milliseconds(1))
}
