//! Application state: the injected question store, plus startup seeding.
//!
//! Handlers get the store through `State<Arc<AppState>>`; nothing else is
//! shared between requests.

use std::{collections::BTreeMap, sync::Arc};
use tracing::{error, info, instrument, warn};

use crate::config::{load_config_from_env, TriviaConfig};
use crate::domain::NewQuestion;
use crate::seeds::{seed_categories, seed_questions};
use crate::store::{MemoryStore, QuestionStore, SqliteStore, StoreResult};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn QuestionStore>,
}

impl AppState {
    pub fn with_store(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// Build state from env: load config, open the store, seed it if empty.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> StoreResult<Self> {
        let cfg = load_config_from_env().unwrap_or_default();

        let store: Arc<dyn QuestionStore> = match cfg.database_path() {
            Some(path) => {
                info!(target: "trivia_backend", %path, "Using SQLite question store");
                Arc::new(SqliteStore::open(&path)?)
            }
            None => {
                info!(target: "trivia_backend", "No database path set. Using in-memory question store.");
                Arc::new(MemoryStore::new())
            }
        };

        let state = Self::with_store(store);
        state.seed_if_empty(&cfg)?;
        state.log_inventory()?;
        Ok(state)
    }

    /// Seed from the configured bank, else the built-in one. Non-empty stores are left alone.
    #[instrument(level = "info", skip_all)]
    pub fn seed_if_empty(&self, cfg: &TriviaConfig) -> StoreResult<()> {
        let populated = !self.store.categories()?.is_empty() || self.store.count_questions()? > 0;
        if populated {
            info!(target: "questions", "Store already populated; skipping seed");
            return Ok(());
        }

        let (categories, questions, source) = if cfg.has_bank() {
            let questions = cfg
                .questions
                .iter()
                .map(|q| NewQuestion {
                    question: Some(q.question.clone()),
                    answer: Some(q.answer.clone()),
                    difficulty: Some(q.difficulty),
                    category: Some(q.category),
                })
                .collect::<Vec<_>>();
            (cfg.categories.clone(), questions, "config_bank")
        } else if cfg.seed_builtin {
            (seed_categories(), seed_questions(), "builtin")
        } else {
            warn!(target: "questions", "Store is empty and seeding is disabled");
            return Ok(());
        };

        for c in categories {
            let id = c.id;
            if let Err(e) = self.store.insert_category(c) {
                error!(target: "questions", id, error = %e, "Skipping seed category");
            }
        }
        let mut inserted = 0usize;
        for q in questions {
            match self.store.insert_question(q) {
                Ok(_) => inserted += 1,
                Err(e) => error!(target: "questions", error = %e, "Skipping seed question"),
            }
        }
        info!(target: "questions", %source, inserted, "Seeded question store");
        Ok(())
    }

    fn log_inventory(&self) -> StoreResult<()> {
        let mut by_category: BTreeMap<i64, usize> = BTreeMap::new();
        for q in self.store.questions()? {
            *by_category.entry(q.category_id).or_default() += 1;
        }
        let categories = self.store.categories()?;
        for c in &categories {
            let count = by_category.get(&c.id).copied().unwrap_or(0);
            info!(target: "questions", category = c.id, label = %c.label, questions = count, "Startup question inventory");
        }
        let orphaned: usize = by_category
            .iter()
            .filter(|(id, _)| !categories.iter().any(|c| c.id == **id))
            .map(|(_, n)| *n)
            .sum();
        if orphaned > 0 {
            warn!(target: "questions", orphaned, "Questions reference unknown categories");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    fn memory_state() -> AppState {
        AppState::with_store(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn builtin_bank_seeds_empty_store() {
        let state = memory_state();
        state.seed_if_empty(&TriviaConfig::default()).expect("seed");
        assert_eq!(state.store.categories().expect("categories").len(), 6);
        assert_eq!(state.store.count_questions().expect("count"), seed_questions().len());
    }

    #[test]
    fn configured_bank_wins_and_reseed_is_noop() {
        let cfg = parse_config(r#"
            [[categories]]
            id = 7
            type = "Music"
            [[questions]]
            question = "How many strings does a standard violin have?"
            answer = "Four"
            difficulty = 1
            category = 7
        "#).expect("parse");
        let state = memory_state();
        state.seed_if_empty(&cfg).expect("seed");
        state.seed_if_empty(&cfg).expect("reseed");
        assert_eq!(state.store.categories().expect("categories").len(), 1);
        assert_eq!(state.store.count_questions().expect("count"), 1);
    }

    #[test]
    fn seeding_can_be_disabled() {
        let cfg = parse_config("seed_builtin = false").expect("parse");
        let state = memory_state();
        state.seed_if_empty(&cfg).expect("seed");
        assert_eq!(state.store.count_questions().expect("count"), 0);
        assert!(state.log_inventory().is_ok());
    }
}
