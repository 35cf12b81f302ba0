//! Request orchestration shared by the HTTP handlers.
//!
//! Each operation composes store reads, the filter, the pager and the quiz
//! selector, then shapes the response. This is the only layer that turns
//! "empty where something was expected" into `NotFound`.

use std::collections::HashSet;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::domain::{NewQuestion, Question, QuizScope};
use crate::error::ApiError;
use crate::filter::QuestionFilter;
use crate::paging::paginate;
use crate::protocol::*;
use crate::quiz::{next_question, Selection};
use crate::store::QuestionStore;
use crate::util::trunc_for_log;

fn category_map(store: &dyn QuestionStore) -> Result<CategoryMap, ApiError> {
  Ok(store.categories()?.into_iter().map(|c| (c.id, c.label)).collect())
}

fn filtered(store: &dyn QuestionStore, filter: &QuestionFilter) -> Result<Vec<Question>, ApiError> {
  Ok(store.questions_where(&|q: &Question| filter.matches(q))?)
}

#[instrument(level = "info", skip(store))]
pub fn list_categories(store: &dyn QuestionStore) -> Result<CategoriesOut, ApiError> {
  Ok(CategoriesOut { success: true, categories: category_map(store)? })
}

#[instrument(level = "info", skip(store))]
pub fn list_questions(store: &dyn QuestionStore, page: i64) -> Result<QuestionsPageOut, ApiError> {
  let all = store.questions()?;
  let window = paginate(&all, page);
  if window.is_empty() {
    debug!(target: "questions", page, total = all.len(), "Empty question page");
    return Err(ApiError::NotFound);
  }
  Ok(QuestionsPageOut {
    success: true,
    questions: window.to_vec(),
    total_questions: all.len(),
    categories: category_map(store)?,
    current_category: None,
  })
}

#[instrument(level = "info", skip(store, term), fields(term = %trunc_for_log(term, 64)))]
pub fn search_questions(store: &dyn QuestionStore, term: &str, page: i64) -> Result<SearchOut, ApiError> {
  let hits = filtered(store, &QuestionFilter::term(term))?;
  info!(target: "questions", page, total = hits.len(), "Search served");
  Ok(SearchOut {
    success: true,
    questions: paginate(&hits, page).to_vec(),
    total_questions: hits.len(),
    current_category: None,
  })
}

#[instrument(level = "info", skip(store))]
pub fn delete_question(store: &dyn QuestionStore, id: i64, page: i64) -> Result<DeletedOut, ApiError> {
  if store.question(id)?.is_none() {
    return Err(ApiError::NotFound);
  }
  // Absent by now means a concurrent delete won; report it the same way.
  if !store.delete_question(id)? {
    return Err(ApiError::NotFound);
  }
  info!(target: "questions", id, "Question deleted");

  let remaining = store.questions()?;
  Ok(DeletedOut {
    success: true,
    deleted: id,
    questions: paginate(&remaining, page).to_vec(),
    total_questions: remaining.len(),
    categories: category_map(store)?,
    current_category: None,
  })
}

#[instrument(level = "info", skip(store, new))]
pub fn create_question(store: &dyn QuestionStore, new: NewQuestion) -> Result<CreatedOut, ApiError> {
  let q = store.insert_question(new)?;
  info!(target: "questions", id = q.id, category = q.category_id, "Question created");
  Ok(CreatedOut { success: true })
}

#[instrument(level = "info", skip(store))]
pub fn category_questions(store: &dyn QuestionStore, category_id: i64, page: i64) -> Result<CategoryQuestionsOut, ApiError> {
  let hits = filtered(store, &QuestionFilter::category(category_id))?;
  if hits.is_empty() {
    return Err(ApiError::NotFound);
  }
  Ok(CategoryQuestionsOut {
    questions: paginate(&hits, page).to_vec(),
    total_questions: hits.len(),
    current_category: category_id,
  })
}

#[instrument(level = "info", skip(store, previous, rng), fields(previous = previous.len()))]
pub fn play_quiz<R: Rng + ?Sized>(
  store: &dyn QuestionStore,
  scope: QuizScope,
  previous: &HashSet<i64>,
  rng: &mut R,
) -> Result<QuizOut, ApiError> {
  let snapshot = store.questions()?;
  let question = match next_question(&snapshot, scope, previous, rng) {
    Selection::Next(q) => {
      info!(target: "quiz", ?scope, id = q.id, "Quiz question drawn");
      Some(q.clone())
    }
    Selection::Exhausted => {
      info!(target: "quiz", ?scope, "Quiz pool exhausted");
      None
    }
  };
  Ok(QuizOut { success: true, question })
}
