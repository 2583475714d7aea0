//! Configuration for the todo list.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Startup content is configuration: the list starts empty unless sample
//! todos or explicit initial todos are requested.

use crate::types::{Todo, TodoId, TodoState};
use reducer_core::environment::IdGenerator;
use std::time::Duration;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Todos seeded when `TODO_SEED_SAMPLES` is set
pub const SAMPLE_TODOS: [&str; 3] = ["Learn React", "Design tattoo", "Swim in the pool"];

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "todo=info,reducer_runtime=info";

const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A flag was not a recognisable boolean
    #[error("{key} must be true or false, got {value:?}")]
    InvalidBool {
        /// Variable name
        key: &'static str,
        /// Rejected value
        value: String,
    },

    /// A number of seconds did not parse
    #[error("{key} must be a whole number of seconds, got {value:?}")]
    InvalidNumber {
        /// Variable name
        key: &'static str,
        /// Rejected value
        value: String,
    },

    /// `RUST_LOG` was not a valid filter directive
    #[error("RUST_LOG is not a valid log filter {value:?}: {source}")]
    InvalidLogFilter {
        /// Rejected value
        value: String,
        /// Why the directive did not parse
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    /// `TODO_INITIAL_TODOS` was not a JSON array of strings
    #[error("TODO_INITIAL_TODOS must be a JSON array of strings: {0}")]
    InvalidInitialTodos(#[source] serde_json::Error),
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Start with the sample todos
    pub seed_samples: bool,
    /// Texts of todos to start with, after the samples
    pub initial_todos: Vec<String>,
    /// `tracing_subscriber` filter directive, validated on load
    pub log_filter: String,
    /// How long to wait for running effects on exit
    pub shutdown_timeout: Duration,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            seed_samples: false,
            initial_todos: Vec::new(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }
}

impl TodoConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `TODO_SEED_SAMPLES` | `false` |
    /// | `TODO_INITIAL_TODOS` | `[]` |
    /// | `RUST_LOG` | [`DEFAULT_LOG_FILTER`] |
    /// | `TODO_SHUTDOWN_TIMEOUT_SECS` | `5` |
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let seed_samples = lookup("TODO_SEED_SAMPLES")
            .map(|value| parse_bool("TODO_SEED_SAMPLES", &value))
            .transpose()?
            .unwrap_or(defaults.seed_samples);

        let initial_todos = lookup("TODO_INITIAL_TODOS")
            .filter(|value| !value.trim().is_empty())
            .map(|value| serde_json::from_str(&value).map_err(ConfigError::InvalidInitialTodos))
            .transpose()?
            .unwrap_or(defaults.initial_todos);

        let log_filter = lookup("RUST_LOG")
            .filter(|value| !value.trim().is_empty())
            .map(|value| match EnvFilter::try_new(&value) {
                Ok(_) => Ok(value),
                Err(source) => Err(ConfigError::InvalidLogFilter { value, source }),
            })
            .transpose()?
            .unwrap_or(defaults.log_filter);

        let shutdown_timeout = lookup("TODO_SHUTDOWN_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse()
                    .map(Duration::from_secs)
                    .map_err(|_| ConfigError::InvalidNumber {
                        key: "TODO_SHUTDOWN_TIMEOUT_SECS",
                        value,
                    })
            })
            .transpose()?
            .unwrap_or(defaults.shutdown_timeout);

        Ok(Self {
            seed_samples,
            initial_todos,
            log_filter,
            shutdown_timeout,
        })
    }

    /// Enable the sample todos
    #[must_use]
    pub const fn with_samples(mut self) -> Self {
        self.seed_samples = true;
        self
    }

    /// Build the startup state
    ///
    /// Samples (if enabled) come first, then `initial_todos` in order. Every
    /// todo starts incomplete and the new-todo field starts empty.
    #[must_use]
    pub fn initial_state(&self, ids: &dyn IdGenerator) -> TodoState {
        let samples = SAMPLE_TODOS
            .iter()
            .copied()
            .filter(|_| self.seed_samples);

        let todos = samples
            .chain(self.initial_todos.iter().map(String::as_str))
            .map(|text| Todo::new(TodoId::from_uuid(ids.next_id()), text))
            .collect();

        TodoState::with_todos(todos)
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            key,
            value: value.to_string(),
        }),
    }
}
