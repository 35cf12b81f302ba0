//! Loading service configuration (database path + optional seed bank) from TOML.
//!
//! See `TriviaConfig` for the expected schema.

use serde::Deserialize;
use tracing::{error, info};

use crate::domain::Category;

#[derive(Clone, Debug, Deserialize)]
pub struct TriviaConfig {
  /// SQLite file. `TRIVIA_DB_PATH` wins over this; neither means in-memory.
  #[serde(default)]
  pub database_path: Option<String>,
  /// Fall back to the built-in bank when the store starts empty and no bank is given.
  #[serde(default = "default_true")]
  pub seed_builtin: bool,
  #[serde(default)]
  pub categories: Vec<Category>,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

impl Default for TriviaConfig {
  fn default() -> Self {
    Self { database_path: None, seed_builtin: true, categories: Vec::new(), questions: Vec::new() }
  }
}

fn default_true() -> bool { true }

/// Question entry accepted in TOML configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub question: String,
  pub answer: String,
  pub difficulty: i64,
  pub category: i64,
}

impl TriviaConfig {
  pub fn has_bank(&self) -> bool {
    !self.categories.is_empty() || !self.questions.is_empty()
  }

  /// Resolve the database path, letting the environment override the file.
  pub fn database_path(&self) -> Option<String> {
    std::env::var("TRIVIA_DB_PATH")
      .ok()
      .filter(|p| !p.trim().is_empty())
      .or_else(|| self.database_path.clone())
  }
}

pub fn parse_config(s: &str) -> Result<TriviaConfig, toml::de::Error> {
  toml::from_str::<TriviaConfig>(s)
}

/// Attempt to load `TriviaConfig` from TRIVIA_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<TriviaConfig> {
  let path = std::env::var("TRIVIA_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_config(&s) {
      Ok(cfg) => {
        info!(target: "trivia_backend", %path, categories = cfg.categories.len(), questions = cfg.questions.len(), "Loaded trivia config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "trivia_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "trivia_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_bank_parses() {
    let cfg = parse_config(r#"
      database_path = "trivia.db"
      seed_builtin = false

      [[categories]]
      id = 1
      type = "Science"

      [[questions]]
      question = "What is the chemical symbol for gold?"
      answer = "Au"
      difficulty = 2
      category = 1
    "#).expect("parse");
    assert_eq!(cfg.database_path.as_deref(), Some("trivia.db"));
    assert!(!cfg.seed_builtin);
    assert_eq!(cfg.categories, vec![Category { id: 1, label: "Science".into() }]);
    assert_eq!(cfg.questions[0].answer, "Au");
    assert!(cfg.has_bank());
  }

  #[test]
  fn empty_file_uses_defaults() {
    let cfg = parse_config("").expect("parse");
    assert!(cfg.seed_builtin);
    assert!(cfg.database_path.is_none());
    assert!(!cfg.has_bank());
  }

  #[test]
  fn question_missing_answer_fails() {
    let bad = r#"
      [[questions]]
      question = "?"
      difficulty = 1
      category = 1
    "#;
    assert!(parse_config(bad).is_err());
  }
}
