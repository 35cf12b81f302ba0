//! Router assembly: HTTP endpoints, error envelopes, CORS, panic recovery and HTTP tracing.

use std::{any::Any, sync::Arc};

use axum::{
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, Level};

use crate::error::ApiError;
use crate::state::AppState;

pub mod http;

/// Build the application router with:
/// - the trivia JSON API at the root (`/categories`, `/questions`, `/quizzes`)
/// - JSON error envelopes for unknown routes (404), wrong methods (405) and panics (500)
/// - CORS (any origin; GET, PUT, POST, DELETE, OPTIONS)
/// - HTTP trace layer (per-request spans w/ method, path, status, latency)
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(http::http_health))
        .route("/categories", get(http::http_get_categories))
        .route("/questions", get(http::http_get_questions).post(http::http_post_questions))
        .route("/questions/search", post(http::http_post_search))
        .route("/questions/:id", delete(http::http_delete_question))
        .route("/categories/:id/questions", get(http::http_get_category_questions))
        .route("/categories/:id/questions/", get(http::http_get_category_questions))
        .route("/quizzes", post(http::http_post_quiz))
        .fallback(http::http_not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed_envelope))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                        .on_request(DefaultOnRequest::new().level(Level::INFO))
                        .on_response(DefaultOnResponse::new().level(Level::INFO)),
                )
                .layer(CatchPanicLayer::custom(panic_envelope))
                .layer(
                    CorsLayer::new()
                        .allow_origin(AnyOrigin)
                        .allow_methods([Method::GET, Method::PUT, Method::POST, Method::DELETE, Method::OPTIONS])
                        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
                ),
        )
}

/// axum answers a known path with the wrong method by an empty 405; give it the envelope.
async fn method_not_allowed_envelope(res: Response) -> Response {
    if res.status() != StatusCode::METHOD_NOT_ALLOWED || res.headers().contains_key(header::CONTENT_TYPE) {
        return res;
    }
    let allow = res.headers().get(header::ALLOW).cloned();
    let mut out = ApiError::MethodNotAllowed.into_response();
    if let Some(allow) = allow {
        out.headers_mut().insert(header::ALLOW, allow);
    }
    out
}

fn panic_envelope(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(target: "trivia_backend", %detail, "Handler panicked");
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::domain::{Category, NewQuestion};
    use crate::store::{MemoryStore, QuestionStore};

    fn app_with(n: usize, category: i64) -> Router {
        let store = MemoryStore::new();
        store.insert_category(Category { id: category, label: "Geography".into() }).expect("category");
        for i in 1..=n {
            store
                .insert_question(NewQuestion {
                    question: Some(format!("Trivia question {i}")),
                    answer: Some(format!("Answer {i}")),
                    difficulty: Some(2),
                    category: Some(category),
                })
                .expect("insert");
        }
        build_router(Arc::new(AppState::with_store(Arc::new(store))))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(v) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(v.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        let res = app.clone().oneshot(req).await.expect("response");
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.expect("body");
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json body") };
        (status, json)
    }

    fn ids(v: &Value) -> Vec<i64> {
        v["questions"]
            .as_array()
            .map(|qs| qs.iter().filter_map(|q| q["id"].as_i64()).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn second_page_of_twelve() {
        let app = app_with(12, 3);
        let (status, body) = send(&app, "GET", "/questions?page=2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body), vec![11, 12]);
        assert_eq!(body["total_questions"], 12);
        assert_eq!(body["categories"], json!({ "3": "Geography" }));
        assert_eq!(body["current_category"], Value::Null);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn junk_page_means_first_page_and_empty_page_is_404() {
        let app = app_with(12, 3);
        let (status, body) = send(&app, "GET", "/questions?page=abc", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&body).len(), 10);

        let (status, body) = send(&app, "GET", "/questions?page=9", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "success": false, "error": 404, "message": "resource not found" }));
    }

    #[tokio::test]
    async fn delete_then_list() {
        let app = app_with(12, 3);
        let (status, body) = send(&app, "DELETE", "/questions/5", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["deleted"], 5);
        assert_eq!(body["total_questions"], 11);

        let (_, listed) = send(&app, "GET", "/questions", None).await;
        assert!(!ids(&listed).contains(&5));

        let (status, body) = send(&app, "DELETE", "/questions/5", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], 404);

        let (status, _) = send(&app, "DELETE", "/questions/not-a-number", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn quiz_exhausted_returns_false() {
        let app = app_with(3, 1);
        let (status, body) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({ "previous_questions": [1, 2, 3], "quiz_category": { "id": 0, "type": "click" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "question": false }));
    }

    #[tokio::test]
    async fn quiz_returns_unseen_question() {
        let app = app_with(3, 1);
        let (status, body) = send(
            &app,
            "POST",
            "/quizzes",
            Some(json!({ "previous_questions": [1, 3], "quiz_category": { "id": "1" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["question"]["id"], 2);
        assert_eq!(body["question"]["category"], 1);
    }

    #[tokio::test]
    async fn malformed_quiz_body_is_422() {
        let app = app_with(3, 1);
        let (status, body) = send(&app, "POST", "/quizzes", Some(json!({ "previous_questions": [] }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, json!({ "success": false, "error": 422, "message": "unprocessable" }));
    }

    #[tokio::test]
    async fn category_browse_paths() {
        let app = app_with(3, 3);
        let (status, body) = send(&app, "GET", "/categories/99/questions/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);

        let (status, body) = send(&app, "GET", "/categories/3/questions", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 3);
        assert_eq!(body["current_category"], 3);
        assert!(body.get("success").is_none());
    }

    #[tokio::test]
    async fn post_questions_dispatches_on_search_term() {
        let app = app_with(12, 3);
        let (status, body) = send(&app, "POST", "/questions", Some(json!({ "searchTerm": "QUESTION 1" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 4); // 1, 10, 11, 12
        assert_eq!(body["current_category"], Value::Null);
        assert!(body.get("categories").is_none());

        let (status, body) = send(&app, "POST", "/questions/search", Some(json!({ "searchTerm": "" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_questions"], 12);

        let (status, body) = send(
            &app,
            "POST",
            "/questions",
            Some(json!({ "question": "Capital of Peru?", "answer": "Lima", "difficulty": 2, "category": "3" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (_, listed) = send(&app, "GET", "/questions?page=2", None).await;
        assert_eq!(listed["total_questions"], 13);

        let (status, body) = send(&app, "POST", "/questions", Some(json!({ "question": "No answer?" }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], 422);
    }

    #[tokio::test]
    async fn categories_map() {
        let app = app_with(1, 4);
        let (status, body) = send(&app, "GET", "/categories", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "categories": { "4": "Geography" } }));
    }

    #[tokio::test]
    async fn wrong_method_and_unknown_route_use_envelope() {
        let app = app_with(1, 1);
        let (status, body) = send(&app, "PATCH", "/questions", None).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "success": false, "error": 405, "message": "method not allowed" }));

        let (status, body) = send(&app, "GET", "/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "resource not found");
    }

    #[test]
    fn panic_payload_becomes_500() {
        let res = panic_envelope(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
