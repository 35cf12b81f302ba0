//! In-memory question store. Default when no database path is configured.

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::domain::{Category, NewQuestion, Question};

use super::{QuestionStore, StoreError, StoreResult};

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i64, Category>,
    questions: BTreeMap<i64, Question>,
    last_id: i64,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> StoreResult<T> {
        let guard = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&*guard))
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> StoreResult<T>) -> StoreResult<T> {
        let mut guard = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        f(&mut *guard)
    }
}

impl QuestionStore for MemoryStore {
    fn categories(&self) -> StoreResult<Vec<Category>> {
        self.read(|t| t.categories.values().cloned().collect())
    }

    fn insert_category(&self, category: Category) -> StoreResult<()> {
        self.write(|t| {
            if t.categories.contains_key(&category.id) {
                return Err(StoreError::Rejected(format!("duplicate category id {}", category.id)));
            }
            t.categories.insert(category.id, category);
            Ok(())
        })
    }

    fn questions(&self) -> StoreResult<Vec<Question>> {
        self.read(|t| t.questions.values().cloned().collect())
    }

    fn question(&self, id: i64) -> StoreResult<Option<Question>> {
        self.read(|t| t.questions.get(&id).cloned())
    }

    fn insert_question(&self, new: NewQuestion) -> StoreResult<Question> {
        // Same contract as a NOT NULL column: absent fields are rejected here, not upstream.
        let (text, answer, difficulty, category_id) =
            match (new.question, new.answer, new.difficulty, new.category) {
                (Some(text), Some(answer), Some(difficulty), Some(category_id)) => {
                    (text, answer, difficulty, category_id)
                }
                (text, answer, difficulty, category) => {
                    let probe = NewQuestion { question: text, answer, difficulty, category };
                    let field = probe.first_missing_field().unwrap_or("question");
                    return Err(StoreError::Rejected(format!("missing field `{field}`")));
                }
            };
        self.write(|t| {
            t.last_id += 1;
            let q = Question { id: t.last_id, text, answer, difficulty, category_id };
            t.questions.insert(q.id, q.clone());
            Ok(q)
        })
    }

    fn delete_question(&self, id: i64) -> StoreResult<bool> {
        self.write(|t| Ok(t.questions.remove(&id).is_some()))
    }

    fn questions_where(&self, pred: &dyn Fn(&Question) -> bool) -> StoreResult<Vec<Question>> {
        self.read(|t| t.questions.values().filter(|q| pred(*q)).cloned().collect())
    }

    fn count_questions(&self) -> StoreResult<usize> {
        self.read(|t| t.questions.len())
    }
}
