//! Single-page todo list built on the reducer architecture.
//!
//! All state changes go through [`TodoReducer`]: the view turns user input
//! into [`TodoAction`]s, the store applies them one at a time, and the view
//! re-renders from the resulting [`TodoState`].
//!
//! # Quick Start
//!
//! ```no_run
//! use reducer_runtime::Store;
//! use todo::{TodoAction, TodoConfig, TodoEnvironment, TodoReducer};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let env = TodoEnvironment::production();
//! let state = TodoConfig::default().with_samples().initial_state(env.ids.as_ref());
//! let store = Store::new(state, TodoReducer::new(), env);
//!
//! store.send(TodoAction::EditNewTodo("Buy milk".to_string())).await?;
//! store.send(TodoAction::AddTodo).await?;
//!
//! let state = store.snapshot().await;
//! print!("{}", todo::view::render(&state));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod reducer;
pub mod types;
pub mod view;

pub use config::{ConfigError, TodoConfig};
pub use reducer::{reduce, TodoEnvironment, TodoReducer};
pub use types::{Todo, TodoAction, TodoId, TodoState};
pub use view::{Command, ViewError};
