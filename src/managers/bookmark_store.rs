//! Bookmark store for timemark.
//!
//! Implements `BookmarkStoreTrait` — indexed CRUD and bulk operations for
//! timestamped video bookmarks, backed by SQLite via `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::bookmark::{Bookmark, BookmarkPatch, NewBookmark};
use crate::types::errors::StoreError;

const BOOKMARK_COLUMNS: &str = "id, subject_id, subject_title, time, time_label, \
     note, subtitle, tags, color, added_at, image_data";

/// Trait defining the persistent store operations.
pub trait BookmarkStoreTrait {
    /// Assigns a new unique id, persists the record, returns the assigned id.
    fn add(&mut self, record: &NewBookmark) -> Result<i64, StoreError>;
    /// Every record, unspecified order. Ordering is the view engine's job.
    fn get_all(&self) -> Result<Vec<Bookmark>, StoreError>;
    /// All records for one subject, via the subject-id index.
    fn get_by_subject(&self, subject_id: &str) -> Result<Vec<Bookmark>, StoreError>;
    /// Merges `patch` over the existing record inside one transaction.
    /// Returns `Ok(false)` when no record with that id exists.
    fn update(&mut self, id: i64, patch: &BookmarkPatch) -> Result<bool, StoreError>;
    /// Removes the record if present. Absence is not an error.
    fn delete(&mut self, id: i64) -> Result<(), StoreError>;
    /// Removes all records.
    fn clear(&mut self) -> Result<(), StoreError>;
    /// Persists all records as new entries in one all-or-nothing transaction.
    /// Returns the number of records inserted.
    fn bulk_import(&mut self, records: &[NewBookmark]) -> Result<usize, StoreError>;
    /// Replaces the tag set on every record of one subject, atomically.
    /// Returns the number of records updated.
    fn set_subject_tags(&mut self, subject_id: &str, tags: &[String]) -> Result<usize, StoreError>;
}

/// Bookmark store backed by a SQLite connection.
pub struct BookmarkStore<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkStore<'a> {
    /// Creates a new `BookmarkStore` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads a single bookmark row into a struct. A tags column that fails to
    /// parse as JSON is treated as having no tags.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        let tags_json: String = row.get(7)?;
        Ok(Bookmark {
            id: row.get(0)?,
            subject_id: row.get(1)?,
            subject_title: row.get(2)?,
            time: row.get(3)?,
            time_label: row.get(4)?,
            note: row.get(5)?,
            subtitle: row.get(6)?,
            tags: serde_json::from_str(&tags_json).unwrap_or_default(),
            color: row.get(8)?,
            added_at: row.get(9)?,
            image_data: row.get(10)?,
        })
    }

    fn tags_to_json(tags: &[String]) -> Result<String, StoreError> {
        serde_json::to_string(tags).map_err(|e| StoreError::DatabaseError(e.to_string()))
    }

    /// Validates and inserts one record, returning the assigned rowid.
    /// `conn` may be a transaction (it derefs to `Connection`).
    fn insert_record(conn: &Connection, record: &NewBookmark) -> Result<i64, StoreError> {
        record.validate()?;
        let tags_json = Self::tags_to_json(&record.tags)?;
        conn.execute(
            "INSERT INTO bookmarks (subject_id, subject_title, time, time_label, \
             note, subtitle, tags, color, added_at, image_data) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                record.subject_id,
                record.subject_title,
                record.time,
                record.time_label,
                record.note,
                record.subtitle,
                tags_json,
                record.color,
                record.added_at,
                record.image_data,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn collect_rows(
        stmt: &mut rusqlite::Statement,
        bind: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<Bookmark>, StoreError> {
        let rows = stmt.query_map(bind, Self::row_to_bookmark)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

impl<'a> BookmarkStoreTrait for BookmarkStore<'a> {
    fn add(&mut self, record: &NewBookmark) -> Result<i64, StoreError> {
        Self::insert_record(self.conn, record)
    }

    fn get_all(&self) -> Result<Vec<Bookmark>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM bookmarks", BOOKMARK_COLUMNS))?;
        Self::collect_rows(&mut stmt, &[])
    }

    fn get_by_subject(&self, subject_id: &str) -> Result<Vec<Bookmark>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM bookmarks WHERE subject_id = ?1",
            BOOKMARK_COLUMNS
        ))?;
        Self::collect_rows(&mut stmt, &[&subject_id])
    }

    fn update(&mut self, id: i64, patch: &BookmarkPatch) -> Result<bool, StoreError> {
        // Read-merge-write as one unit of work so concurrent updates to the
        // same record cannot interleave and lose a write.
        let tx = self.conn.unchecked_transaction()?;

        let existing = tx
            .query_row(
                &format!("SELECT {} FROM bookmarks WHERE id = ?1", BOOKMARK_COLUMNS),
                params![id],
                Self::row_to_bookmark,
            )
            .optional()?;

        let mut record = match existing {
            Some(record) => record,
            None => return Ok(false),
        };
        patch.apply(&mut record);

        let tags_json = Self::tags_to_json(&record.tags)?;
        tx.execute(
            "UPDATE bookmarks SET subject_title = ?1, time = ?2, time_label = ?3, \
             note = ?4, subtitle = ?5, tags = ?6, color = ?7 WHERE id = ?8",
            params![
                record.subject_title,
                record.time,
                record.time_label,
                record.note,
                record.subtitle,
                tags_json,
                record.color,
                id,
            ],
        )?;
        tx.commit()?;
        Ok(true)
    }

    fn delete(&mut self, id: i64) -> Result<(), StoreError> {
        // Idempotent: deleting an absent record is a no-op, not an error.
        self.conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.conn.execute("DELETE FROM bookmarks", [])?;
        Ok(())
    }

    fn bulk_import(&mut self, records: &[NewBookmark]) -> Result<usize, StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;
        for record in records {
            // A failing record aborts the transaction; nothing from this batch
            // is committed, earlier committed batches are untouched.
            Self::insert_record(&tx, record)?;
            inserted += 1;
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn set_subject_tags(&mut self, subject_id: &str, tags: &[String]) -> Result<usize, StoreError> {
        let tags_json = Self::tags_to_json(tags)?;
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            "UPDATE bookmarks SET tags = ?1 WHERE subject_id = ?2",
            params![tags_json, subject_id],
        )?;
        tx.commit()?;
        Ok(affected)
    }
}
