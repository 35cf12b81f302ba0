//! Question store: the persistence seam.
//!
//! Calls are synchronous and complete-or-fail. Implementations own their own
//! locking; callers hold an `Arc<dyn QuestionStore>` and never see it.

pub mod memory;
pub mod sqlite;

use thiserror::Error;

use crate::domain::{Category, NewQuestion, Question};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("store lock poisoned")]
    Poisoned,
    #[error("record rejected: {0}")]
    Rejected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

pub trait QuestionStore: Send + Sync {
    /// All categories, ascending by id.
    fn categories(&self) -> StoreResult<Vec<Category>>;

    fn insert_category(&self, category: Category) -> StoreResult<()>;

    /// All questions, ascending by id.
    fn questions(&self) -> StoreResult<Vec<Question>>;

    fn question(&self, id: i64) -> StoreResult<Option<Question>>;

    /// Inserts a question and returns it with its assigned id.
    fn insert_question(&self, new: NewQuestion) -> StoreResult<Question>;

    /// Returns false when no question had that id.
    fn delete_question(&self, id: i64) -> StoreResult<bool>;

    /// Questions satisfying `pred`, ascending by id.
    fn questions_where(&self, pred: &dyn Fn(&Question) -> bool) -> StoreResult<Vec<Question>> {
        Ok(self.questions()?.into_iter().filter(|q| pred(q)).collect())
    }

    fn count_questions(&self) -> StoreResult<usize> {
        Ok(self.questions()?.len())
    }
}
