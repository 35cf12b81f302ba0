//! Public protocol structs for the HTTP endpoints (serde ready).
//! Field names follow the wire contract the trivia frontend already speaks.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::domain::{NewQuestion, Question};

/// Category id -> label. Integer keys serialize as JSON object keys ("1": "Science").
pub type CategoryMap = BTreeMap<i64, String>;

//
// Lenient numeric fields: the frontend sends some ids as strings.
//

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

impl IntOrString {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            IntOrString::Int(n) => Ok(n),
            IntOrString::Str(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("expected integer, got {s:?}"))),
        }
    }
}

fn lenient_i64<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    IntOrString::deserialize(d)?.into_i64()
}

fn lenient_i64_opt<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    match Option::<IntOrString>::deserialize(d)? {
        Some(v) => v.into_i64().map(Some),
        None => Ok(None),
    }
}

//
// Query strings
//

/// `?page=N`, kept raw so that junk falls back to page 1 instead of a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        crate::paging::parse_page(self.page.as_deref())
    }
}

//
// Request bodies
//

/// `POST /questions`: create, or search when `searchTerm` is present.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionsPostIn {
    #[serde(default, rename = "searchTerm")]
    pub search_term: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub difficulty: Option<i64>,
    #[serde(default, deserialize_with = "lenient_i64_opt")]
    pub category: Option<i64>,
}

/// What a `POST /questions` body turns out to mean.
#[derive(Debug, PartialEq, Eq)]
pub enum QuestionsPost {
    Search(String),
    Create(NewQuestion),
}

impl QuestionsPostIn {
    pub fn dispatch(self) -> QuestionsPost {
        match self.search_term {
            Some(term) => QuestionsPost::Search(term),
            None => QuestionsPost::Create(NewQuestion {
                question: self.question,
                answer: self.answer,
                difficulty: self.difficulty,
                category: self.category,
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchIn {
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

#[derive(Debug, Deserialize)]
pub struct QuizCategoryIn {
    #[serde(deserialize_with = "lenient_i64")]
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct QuizIn {
    #[serde(default)]
    pub previous_questions: Option<Vec<i64>>,
    pub quiz_category: QuizCategoryIn,
}

//
// Responses
//

#[derive(Debug, Serialize)]
pub struct CategoriesOut {
    pub success: bool,
    pub categories: CategoryMap,
}

#[derive(Debug, Serialize)]
pub struct QuestionsPageOut {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: CategoryMap,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeletedOut {
    pub success: bool,
    pub deleted: i64,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: CategoryMap,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SearchOut {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedOut {
    pub success: bool,
}

/// Category browse. No `success` key: existing clients read this shape as-is.
#[derive(Debug, Serialize)]
pub struct CategoryQuestionsOut {
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: i64,
}

/// `question` is the drawn question, or `false` once the pool is exhausted.
#[derive(Debug, Serialize)]
pub struct QuizOut {
    pub success: bool,
    #[serde(serialize_with = "question_or_false")]
    pub question: Option<Question>,
}

fn question_or_false<S: Serializer>(q: &Option<Question>, s: S) -> Result<S::Ok, S::Error> {
    match q {
        Some(q) => q.serialize(s),
        None => s.serialize_bool(false),
    }
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
    pub success: bool,
}
