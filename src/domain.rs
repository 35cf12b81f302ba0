//! Domain models used by the backend: categories, questions, and the quiz scope.

use serde::{Deserialize, Serialize};

/// Labeled grouping of questions. The label is called `type` in seed files,
/// matching the trivia data set this service ships with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
  pub id: i64,
  #[serde(rename = "type")]
  pub label: String,
}

/// A single trivia item as stored.
/// Wire shape is `{ id, question, answer, difficulty, category }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
  pub id: i64,
  #[serde(rename = "question")]
  pub text: String,
  pub answer: String,
  pub difficulty: i64,
  #[serde(rename = "category")]
  pub category_id: i64,
}

/// Insert payload. Fields stay optional all the way down to the store,
/// which decides whether an incomplete record is acceptable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct NewQuestion {
  #[serde(default)] pub question: Option<String>,
  #[serde(default)] pub answer: Option<String>,
  #[serde(default)] pub difficulty: Option<i64>,
  #[serde(default)] pub category: Option<i64>,
}

impl NewQuestion {
  /// Name of the first required field that is absent, if any.
  pub fn first_missing_field(&self) -> Option<&'static str> {
    if self.question.is_none() { return Some("question"); }
    if self.answer.is_none() { return Some("answer"); }
    if self.difficulty.is_none() { return Some("difficulty"); }
    if self.category.is_none() { return Some("category"); }
    None
  }
}

/// Which questions a quiz draws from. On the wire `0` means every category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizScope {
  All,
  Category(i64),
}

impl QuizScope {
  pub fn from_wire_id(id: i64) -> Self {
    if id == 0 { QuizScope::All } else { QuizScope::Category(id) }
  }

  pub fn includes(&self, q: &Question) -> bool {
    match self {
      QuizScope::All => true,
      QuizScope::Category(id) => q.category_id == *id,
    }
  }
}
