//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Extractor rejections are folded into the uniform error envelope here.

use std::{collections::HashSet, sync::Arc};

use axum::{
  extract::{
    rejection::{JsonRejection, PathRejection},
    Path, Query, State,
  },
  response::IntoResponse,
  Json,
};
use tracing::{instrument, warn};

use crate::domain::QuizScope;
use crate::error::ApiError;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
  match body {
    Ok(Json(v)) => Ok(v),
    Err(e) => {
      warn!(target: "trivia_backend", error = %e, "Rejected request body");
      Err(ApiError::Unprocessable)
    }
  }
}

fn path_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  path.map(|Path(id)| id).map_err(|_| ApiError::NotFound)
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { success: true }) }

#[instrument(level = "info")]
pub async fn http_not_found() -> ApiError { ApiError::NotFound }

#[instrument(level = "info", skip(state))]
pub async fn http_get_categories(
  State(state): State<Arc<AppState>>,
) -> Result<Json<CategoriesOut>, ApiError> {
  list_categories(state.store.as_ref()).map(Json)
}

#[instrument(level = "info", skip(state), fields(page = q.page()))]
pub async fn http_get_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PageQuery>,
) -> Result<Json<QuestionsPageOut>, ApiError> {
  list_questions(state.store.as_ref(), q.page()).map(Json)
}

#[instrument(level = "info", skip(state, path), fields(page = q.page()))]
pub async fn http_delete_question(
  State(state): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  Query(q): Query<PageQuery>,
) -> Result<Json<DeletedOut>, ApiError> {
  let id = path_id(path)?;
  delete_question(state.store.as_ref(), id, q.page()).map(Json)
}

/// Compatibility route: create, or search when the body carries `searchTerm`.
#[instrument(level = "info", skip(state, body), fields(page = q.page()))]
pub async fn http_post_questions(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PageQuery>,
  body: Result<Json<QuestionsPostIn>, JsonRejection>,
) -> axum::response::Response {
  let result = json_body(body).and_then(|body| match body.dispatch() {
    QuestionsPost::Search(term) => {
      search_questions(state.store.as_ref(), &term, q.page()).map(|out| Json(out).into_response())
    }
    QuestionsPost::Create(new) => {
      create_question(state.store.as_ref(), new).map(|out| Json(out).into_response())
    }
  });
  result.unwrap_or_else(IntoResponse::into_response)
}

#[instrument(level = "info", skip(state, body), fields(page = q.page()))]
pub async fn http_post_search(
  State(state): State<Arc<AppState>>,
  Query(q): Query<PageQuery>,
  body: Result<Json<SearchIn>, JsonRejection>,
) -> Result<Json<SearchOut>, ApiError> {
  let body = json_body(body)?;
  search_questions(state.store.as_ref(), &body.search_term, q.page()).map(Json)
}

#[instrument(level = "info", skip(state, path), fields(page = q.page()))]
pub async fn http_get_category_questions(
  State(state): State<Arc<AppState>>,
  path: Result<Path<i64>, PathRejection>,
  Query(q): Query<PageQuery>,
) -> Result<Json<CategoryQuestionsOut>, ApiError> {
  let id = path_id(path)?;
  category_questions(state.store.as_ref(), id, q.page()).map(Json)
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_post_quiz(
  State(state): State<Arc<AppState>>,
  body: Result<Json<QuizIn>, JsonRejection>,
) -> Result<Json<QuizOut>, ApiError> {
  let body = json_body(body)?;
  let scope = QuizScope::from_wire_id(body.quiz_category.id);
  let previous: HashSet<i64> = body.previous_questions.unwrap_or_default().into_iter().collect();
  let mut rng = rand::thread_rng();
  play_quiz(state.store.as_ref(), scope, &previous, &mut rng).map(Json)
}
