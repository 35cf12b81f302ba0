//! Candidate selection for browse and search.
//!
//! A filter is a predicate over stored questions. Search is global and
//! category browse is unscoped by text, so the two never combine.

use crate::domain::Question;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuestionFilter {
    /// Case-insensitive substring match on the question text. Empty matches everything.
    Term(String),
    Category(i64),
}

impl QuestionFilter {
    pub fn term(term: &str) -> Self {
        QuestionFilter::Term(term.to_lowercase())
    }

    pub fn category(id: i64) -> Self {
        QuestionFilter::Category(id)
    }

    pub fn matches(&self, q: &Question) -> bool {
        match self {
            QuestionFilter::Term(needle) => {
                needle.is_empty() || q.text.to_lowercase().contains(needle.as_str())
            }
            QuestionFilter::Category(id) => q.category_id == *id,
        }
    }

    /// Keeps the matching items, preserving input order.
    #[allow(dead_code)]
    pub fn apply(&self, items: Vec<Question>) -> Vec<Question> {
        items.into_iter().filter(|q| self.matches(q)).collect()
    }
}
