//! Reducer logic for the todo list.
//!
//! Every action either transforms the state or, when it names a todo that
//! does not exist, leaves it untouched. The reducer never fails and never
//! produces effects.

use crate::types::{Todo, TodoAction, TodoId, TodoState};
use reducer_core::{
    effect::Effect,
    environment::{IdGenerator, RandomIdGenerator},
    reducer::Reducer,
    SmallVec,
};
use std::sync::Arc;

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Source of ids for newly added todos
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self { ids }
    }

    /// Environment backed by random v4 UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(Arc::new(RandomIdGenerator))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Applies an action to state in place
    fn apply(state: &mut TodoState, action: TodoAction, env: &TodoEnvironment) {
        match action {
            TodoAction::AddTodo => {
                let text = std::mem::take(&mut state.new_todo_text);
                let id = TodoId::from_uuid(env.ids.next_id());
                state.todos.push(Todo::new(id, text));
            }
            TodoAction::ToggleTodo(id) => {
                if let Some(todo) = state.get_mut(&id) {
                    todo.toggle();
                }
            }
            TodoAction::EditTodo { id, text } => {
                if let Some(todo) = state.get_mut(&id) {
                    todo.text = text;
                }
            }
            TodoAction::DeleteTodo(id) => {
                state.todos.retain(|todo| todo.id != id);
            }
            TodoAction::EditNewTodo(text) => {
                state.new_todo_text = text;
            }
        }
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        Self::apply(state, action, env);
        SmallVec::new()
    }
}

/// Computes the next state without touching `state`
///
/// Snapshot form of [`TodoReducer`]: the input is cloned, the action
/// applied to the clone, and the clone returned.
#[must_use]
pub fn reduce(state: &TodoState, action: TodoAction, env: &TodoEnvironment) -> TodoState {
    let mut next = state.clone();
    TodoReducer::apply(&mut next, action, env);
    next
}
