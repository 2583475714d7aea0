//! Terminal view for the todo list.
//!
//! Renders state as text and turns typed commands into actions. This layer
//! holds the required-field gate: adding with an empty new-todo field is
//! refused here and never reaches the reducer.

use crate::types::{TodoAction, TodoId, TodoState};
use thiserror::Error;

/// Errors shown to the user instead of dispatching
#[derive(Debug, Error)]
pub enum ViewError {
    /// Tried to add a todo with nothing typed
    #[error("enter a todo before adding it")]
    EmptyTodo,

    /// First word is not a command
    #[error("unknown command {0:?}, type `help` for a list")]
    UnknownCommand(String),

    /// Command given without its argument
    #[error("`{0}` needs an argument, type `help` for usage")]
    MissingArgument(&'static str),

    /// Row argument is not a positive number
    #[error("{0:?} is not a row number")]
    InvalidRow(String),

    /// Row number past the end of the list
    #[error("there is no row {0}")]
    NoSuchRow(usize),

    /// `dispatch` payload did not decode as an action
    #[error("invalid action: {0}")]
    InvalidAction(#[from] serde_json::Error),
}

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Replace the new-todo text
    EditNewTodo(String),
    /// Add a todo from the current new-todo text
    Submit,
    /// Type `text` into the new-todo field and add it
    SubmitText(String),
    /// Toggle the todo on a 1-based row
    Toggle(usize),
    /// Replace the text of the todo on a 1-based row
    Edit(usize, String),
    /// Delete the todo on a 1-based row
    Delete(usize),
    /// Send a raw action
    Dispatch(TodoAction),
    /// Redraw the list
    Show,
    /// Print usage
    Help,
    /// Leave
    Quit,
}

impl Command {
    /// Resolve the command into the actions to dispatch against `state`
    ///
    /// Rows are looked up in `state`; `Show`, `Help` and `Quit` yield no actions.
    ///
    /// # Errors
    ///
    /// - [`ViewError::EmptyTodo`] when adding with an empty new-todo field
    /// - [`ViewError::NoSuchRow`] when a row number is past the end of the list
    pub fn into_actions(self, state: &TodoState) -> Result<Vec<TodoAction>, ViewError> {
        let actions = match self {
            Self::EditNewTodo(text) => vec![TodoAction::EditNewTodo(text)],
            Self::Submit => {
                require_text(&state.new_todo_text)?;
                vec![TodoAction::AddTodo]
            },
            Self::SubmitText(text) => {
                require_text(&text)?;
                vec![TodoAction::EditNewTodo(text), TodoAction::AddTodo]
            },
            Self::Toggle(row) => vec![TodoAction::ToggleTodo(row_id(state, row)?)],
            Self::Edit(row, text) => vec![TodoAction::EditTodo {
                id: row_id(state, row)?,
                text,
            }],
            Self::Delete(row) => vec![TodoAction::DeleteTodo(row_id(state, row)?)],
            Self::Dispatch(action) => vec![action],
            Self::Show | Self::Help | Self::Quit => Vec::new(),
        };

        Ok(actions)
    }
}

/// Only an empty field is refused; whitespace counts as text
fn require_text(text: &str) -> Result<(), ViewError> {
    if text.is_empty() {
        return Err(ViewError::EmptyTodo);
    }
    Ok(())
}

fn row_id(state: &TodoState, row: usize) -> Result<TodoId, ViewError> {
    row.checked_sub(1)
        .and_then(|index| state.todos.get(index))
        .map(|todo| todo.id)
        .ok_or(ViewError::NoSuchRow(row))
}

fn parse_row(arg: &str, command: &'static str) -> Result<usize, ViewError> {
    if arg.is_empty() {
        return Err(ViewError::MissingArgument(command));
    }
    match arg.parse::<usize>() {
        Ok(row) if row > 0 => Ok(row),
        _ => Err(ViewError::InvalidRow(arg.to_string())),
    }
}

/// Splits `line` into its first word and the trimmed remainder
fn split_word(line: &str) -> (&str, &str) {
    let line = line.trim();
    line.split_once(char::is_whitespace)
        .map_or((line, ""), |(word, rest)| (word, rest.trim()))
}

/// Parse one line of input
///
/// A blank line redraws the list.
///
/// # Errors
///
/// Returns a [`ViewError`] for unknown commands, missing or malformed
/// arguments, and undecodable `dispatch` payloads.
pub fn parse_command(line: &str) -> Result<Command, ViewError> {
    let (word, rest) = split_word(line);

    match word.to_ascii_lowercase().as_str() {
        "" | "show" | "ls" => Ok(Command::Show),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        "new" => Ok(Command::EditNewTodo(rest.to_string())),
        "add" if rest.is_empty() => Ok(Command::Submit),
        "add" => Ok(Command::SubmitText(rest.to_string())),
        "toggle" | "t" => parse_row(rest, "toggle").map(Command::Toggle),
        "delete" | "rm" => parse_row(rest, "delete").map(Command::Delete),
        "edit" => {
            let (row, text) = split_word(rest);
            Ok(Command::Edit(parse_row(row, "edit")?, text.to_string()))
        },
        "dispatch" => {
            if rest.is_empty() {
                return Err(ViewError::MissingArgument("dispatch"));
            }
            Ok(Command::Dispatch(serde_json::from_str(rest)?))
        },
        _ => Err(ViewError::UnknownCommand(word.to_string())),
    }
}

/// Render the list
///
/// Completed todos are shown struck through.
#[must_use]
pub fn render(state: &TodoState) -> String {
    let mut out = String::from("Todo List\n");
    out.push_str(&format!("  new: {}\n", state.new_todo_text));

    if state.todos.is_empty() {
        out.push_str("  (no todos)\n");
        return out;
    }

    for (index, todo) in state.todos.iter().enumerate() {
        let line = if todo.is_completed {
            format!("{:>3}. [x] ~~{}~~\n", index + 1, todo.text)
        } else {
            format!("{:>3}. [ ] {}\n", index + 1, todo.text)
        };
        out.push_str(&line);
    }

    out.push_str(&format!(
        "  {}/{} completed\n",
        state.completed_count(),
        state.count()
    ));
    out
}

/// Usage text
#[must_use]
pub fn help() -> String {
    format!(
        "\
Commands:
  new <text>          type into the new-todo field
  add [text]          add the new todo (optionally typing <text> first)
  toggle <row>        mark a todo done or not done
  edit <row> <text>   change a todo's text
  delete <row>        remove a todo
  dispatch <json>     send a raw action, e.g. {{\"type\":\"ADD_TODO\"}}
  show                redraw the list
  help                show this help
  quit                leave
Action types: {}
",
        TodoAction::ACTION_TYPES.join(", ")
    )
}
