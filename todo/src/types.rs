//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of items plus the text typed into the
//! "new todo" field. Items keep their position for their whole lifetime;
//! new items are appended.

use reducer_macros::Action;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a new random `TodoId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TodoId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    /// Unique identifier, fixed at creation
    pub id: TodoId,
    /// What needs doing
    pub text: String,
    /// Whether the todo is done
    pub is_completed: bool,
}

impl Todo {
    /// Creates a new, not yet completed todo
    #[must_use]
    pub fn new(id: TodoId, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            is_completed: false,
        }
    }

    /// Flips the completion flag
    pub const fn toggle(&mut self) {
        self.is_completed = !self.is_completed;
    }
}

/// State of the todo list
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoState {
    /// All todos, in insertion order
    pub todos: Vec<Todo>,
    /// Pending text for the next `AddTodo`
    pub new_todo_text: String,
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            todos: Vec::new(),
            new_todo_text: String::new(),
        }
    }

    /// Creates a state holding `todos` with an empty new-todo field
    #[must_use]
    pub const fn with_todos(todos: Vec<Todo>) -> Self {
        Self {
            todos,
            new_todo_text: String::new(),
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.todos.len()
    }

    /// Returns the number of completed todos
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.todos.iter().filter(|t| t.is_completed).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == *id)
    }

    pub(crate) fn get_mut(&mut self, id: &TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|t| t.id == *id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: &TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Returns the 0-based position of a todo
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|t| t.id == *id)
    }
}

/// Everything that can happen to the todo list
///
/// Serialized adjacently tagged, e.g. `{"type":"TOGGLE_TODO","payload":"<id>"}`.
/// The `type` tag equals
/// [`ActionType::action_type`](reducer_core::action::ActionType::action_type).
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TodoAction {
    /// Append a todo made from the pending new-todo text, then clear it
    AddTodo,

    /// Flip completion of a todo
    ToggleTodo(TodoId),

    /// Replace the text of a todo
    EditTodo {
        /// Todo to edit
        id: TodoId,
        /// Replacement text
        text: String,
    },

    /// Remove a todo
    DeleteTodo(TodoId),

    /// Replace the pending new-todo text
    EditNewTodo(String),
}
