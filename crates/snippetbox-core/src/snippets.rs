//! SQLite-backed snippet store.
//!
//! `SnippetModel` is the only component that talks to the database. It owns
//! the snippet lifecycle rules:
//!
//! - `created` is the insert instant and `expires` is derived from it
//! - reads only return rows whose `expires` is strictly after "now"
//! - "no rows" is reported as [`Error::NoRecord`], never as a driver error

use std::path::Path;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::schema;
use crate::{Error, Result};

/// Maximum number of snippets returned by [`SnippetModel::latest`].
pub const LATEST_LIMIT: usize = 10;

/// A single stored snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snippet {
    /// Store-assigned identifier.
    pub id: i64,
    /// Short title (at most 100 characters).
    pub title: String,
    /// Snippet body.
    pub content: String,
    /// When the snippet was created (UTC).
    pub created: DateTime<Utc>,
    /// When the snippet stops being visible (UTC).
    pub expires: DateTime<Utc>,
}

/// Snippet store over a single SQLite connection.
///
/// Every operation is one standalone statement executed under the mutex, so
/// the model can be shared across request handlers behind an `Arc`.
pub struct SnippetModel {
    conn: Mutex<Connection>,
}

impl SnippetModel {
    /// Open or create the snippet database at `path`.
    ///
    /// Creates the parent directory and the schema as needed, then pings the
    /// connection so a broken database is reported at startup.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        // WAL lets readers proceed while a write is in flight
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.busy_timeout(std::time::Duration::from_secs(5))?;

        schema::init_schema(&conn)?;

        let model = Self {
            conn: Mutex::new(conn),
        };
        model.ping()?;

        tracing::info!(path = %path.display(), "snippet database opened");

        Ok(model)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Check that the connection is usable.
    pub fn ping(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }

    /// Insert a new snippet that expires `expires_days` days from now.
    ///
    /// Returns the identifier assigned by the database.
    pub fn insert(&self, title: &str, content: &str, expires_days: i64) -> Result<i64> {
        self.insert_at(title, content, expires_days, Utc::now())
    }

    /// Insert a new snippet as if the current time were `now`.
    pub fn insert_at(
        &self,
        title: &str,
        content: &str,
        expires_days: i64,
        now: DateTime<Utc>,
    ) -> Result<i64> {
        let expires = TimeDelta::try_days(expires_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or(Error::InvalidExpiry(expires_days))?;

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO snippets (title, content, created, expires)
             VALUES (?, ?, ?, ?)",
            rusqlite::params![title, content, now.timestamp(), expires.timestamp()],
        )?;
        let id = conn.last_insert_rowid();

        tracing::debug!(id, expires_days, "snippet inserted");

        Ok(id)
    }

    /// Fetch a live snippet by id.
    ///
    /// Returns [`Error::NoRecord`] if the id doesn't exist or has expired.
    pub fn get(&self, id: i64) -> Result<Snippet> {
        self.get_at(id, Utc::now())
    }

    /// Fetch a snippet by id if it is still live at `now`.
    pub fn get_at(&self, id: i64, now: DateTime<Utc>) -> Result<Snippet> {
        let conn = self.conn.lock();
        conn.query_row(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? AND id = ?",
            rusqlite::params![now.timestamp(), id],
            snippet_from_row,
        )
        .optional()?
        .ok_or(Error::NoRecord)
    }

    /// Return the most recently created live snippets, newest first.
    ///
    /// At most [`LATEST_LIMIT`] snippets are returned; an empty store yields an
    /// empty vector.
    pub fn latest(&self) -> Result<Vec<Snippet>> {
        self.latest_at(Utc::now())
    }

    /// Return the latest snippets that are still live at `now`.
    pub fn latest_at(&self, now: DateTime<Utc>) -> Result<Vec<Snippet>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(
            "SELECT id, title, content, created, expires FROM snippets
             WHERE expires > ? ORDER BY id DESC LIMIT ?",
        )?;

        // Collecting into Result surfaces the first row error instead of
        // stopping silently mid-iteration
        let snippets = stmt
            .query_map(
                rusqlite::params![now.timestamp(), LATEST_LIMIT as i64],
                snippet_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(snippets)
    }
}

/// Decode a `snippets` row selected as `id, title, content, created, expires`.
fn snippet_from_row(row: &Row<'_>) -> rusqlite::Result<Snippet> {
    Ok(Snippet {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        created: timestamp_column(row, 3)?,
        expires: timestamp_column(row, 4)?,
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let secs: i64 = row.get(idx)?;
    DateTime::from_timestamp(secs, 0).ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn model() -> SnippetModel {
        SnippetModel::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_round_trip() {
        let model = model();
        let id = model.insert("T", "C", 7).unwrap();
        assert!(id > 0);

        let snippet = model.get(id).unwrap();
        assert_eq!(snippet.id, id);
        assert_eq!(snippet.title, "T");
        assert_eq!(snippet.content, "C");
        assert_eq!(snippet.expires - snippet.created, TimeDelta::days(7));
    }

    #[test]
    fn test_created_is_insert_time() {
        let model = model();
        let before = Utc::now().timestamp();
        let id = model.insert("T", "C", 1).unwrap();
        let after = Utc::now().timestamp();

        let created = model.get(id).unwrap().created.timestamp();
        assert!(created >= before && created <= after);
    }

    #[test]
    fn test_ids_are_monotonic() {
        let model = model();
        let first = model.insert("a", "a", 1).unwrap();
        let second = model.insert("b", "b", 1).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_get_unknown_id_is_no_record() {
        let model = model();
        assert!(matches!(model.get(42), Err(Error::NoRecord)));
    }

    #[test]
    fn test_get_expiry_equal_to_now_is_no_record() {
        let model = model();
        let now = Utc::now();
        let id = model
            .insert_at("T", "C", 1, now - TimeDelta::days(1))
            .unwrap();

        assert!(matches!(model.get_at(id, now), Err(Error::NoRecord)));
        // One second earlier it was still live
        assert!(model.get_at(id, now - TimeDelta::seconds(1)).is_ok());
    }

    #[test]
    fn test_get_past_expiry_is_no_record() {
        let model = model();
        let id = model
            .insert_at("old", "old", 7, Utc::now() - TimeDelta::days(30))
            .unwrap();
        assert!(matches!(model.get(id), Err(Error::NoRecord)));
    }

    #[test]
    fn test_latest_empty_store() {
        let model = model();
        assert!(model.latest().unwrap().is_empty());
    }

    #[test]
    fn test_latest_is_newest_first_and_bounded() {
        let model = model();
        let ids: Vec<i64> = (0..12)
            .map(|n| model.insert(&format!("title {n}"), "body", 365).unwrap())
            .collect();

        let latest = model.latest().unwrap();
        assert_eq!(latest.len(), LATEST_LIMIT);

        let latest_ids: Vec<i64> = latest.iter().map(|s| s.id).collect();
        let expected: Vec<i64> = ids.iter().rev().take(LATEST_LIMIT).copied().collect();
        assert_eq!(latest_ids, expected);
    }

    #[test]
    fn test_latest_excludes_expired() {
        let model = model();
        let now = Utc::now();
        let live = model.insert_at("live", "x", 7, now).unwrap();
        model
            .insert_at("boundary", "x", 1, now - TimeDelta::days(1))
            .unwrap();
        model
            .insert_at("gone", "x", 1, now - TimeDelta::days(10))
            .unwrap();

        let latest = model.latest_at(now).unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, live);
    }

    #[test]
    fn test_latest_only_expired_rows_is_empty() {
        let model = model();
        model
            .insert_at("gone", "x", 1, Utc::now() - TimeDelta::days(2))
            .unwrap();
        assert!(model.latest().unwrap().is_empty());
    }

    #[test]
    fn test_insert_rejects_unrepresentable_expiry() {
        let model = model();
        let err = model.insert("T", "C", i64::MAX).unwrap_err();
        assert!(matches!(err, Error::InvalidExpiry(i64::MAX)));
    }

    #[test]
    fn test_unicode_content_round_trip() {
        let model = model();
        let id = model.insert("héllo wörld", "日本語のテキスト", 1).unwrap();
        let snippet = model.get(id).unwrap();
        assert_eq!(snippet.title, "héllo wörld");
        assert_eq!(snippet.content, "日本語のテキスト");
    }

    #[test]
    fn test_open_on_disk_creates_parent_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("snippets.db");

        let id = {
            let model = SnippetModel::open(&path).unwrap();
            model.insert("persisted", "body", 7).unwrap()
        };

        let reopened = SnippetModel::open(&path).unwrap();
        assert_eq!(reopened.get(id).unwrap().title, "persisted");
    }

    #[test]
    fn test_ping() {
        model().ping().unwrap();
    }
}
