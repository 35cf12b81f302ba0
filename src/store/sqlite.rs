//! SQLite-backed question store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Category, NewQuestion, Question};

use super::{QuestionStore, StoreError, StoreResult};

const QUESTION_COLUMNS: &str = "id, question, answer, difficulty, category";

/// One connection, serialized behind a mutex.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens or creates the database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init_connection(conn)
    }

    #[allow(dead_code)]
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

fn question_from_row(row: &Row<'_>) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        text: row.get(1)?,
        answer: row.get(2)?,
        difficulty: row.get(3)?,
        category_id: row.get(4)?,
    })
}

impl QuestionStore for SqliteStore {
    fn categories(&self) -> StoreResult<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, type FROM categories ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| {
            Ok(Category { id: row.get(0)?, label: row.get(1)? })
        })?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn insert_category(&self, category: Category) -> StoreResult<()> {
        self.conn()?.execute(
            "INSERT INTO categories(id, type) VALUES (?1, ?2)",
            params![category.id, category.label],
        )?;
        Ok(())
    }

    fn questions(&self) -> StoreResult<Vec<Question>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("SELECT {QUESTION_COLUMNS} FROM questions ORDER BY id ASC"))?;
        let rows = stmt.query_map([], question_from_row)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn question(&self, id: i64) -> StoreResult<Option<Question>> {
        let q = self
            .conn()?
            .query_row(
                &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
                params![id],
                question_from_row,
            )
            .optional()?;
        Ok(q)
    }

    fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        let conn = self.conn()?;
        // NULLs go through untouched; the NOT NULL constraints do the rejecting.
        conn.execute(
            "INSERT INTO questions(question, answer, difficulty, category) VALUES (?1, ?2, ?3, ?4)",
            params![new.question, new.answer, new.difficulty, new.category],
        )?;
        let id = conn.last_insert_rowid();
        let q = conn.query_row(
            &format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = ?1"),
            params![id],
            question_from_row,
        )?;
        Ok(q)
    }

    fn delete_question(&self, id: i64) -> StoreResult<bool> {
        let n = self.conn()?.execute("DELETE FROM questions WHERE id = ?1", params![id])?;
        Ok(n > 0)
    }

    fn count_questions(&self) -> StoreResult<usize> {
        let n: i64 = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM questions", [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }
}
