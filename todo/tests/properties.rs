//! Property-based invariant tests for the todo reducer.
//!
//! 1. Actions naming an absent id leave the state unchanged.
//! 2. Toggling the same todo twice is the identity.
//! 3. Adding appends exactly one incomplete todo with the pending text.
//! 4. Adding clears the pending text.
//! 5. Deleting removes the todo and keeps the others in order.
//! 6. Editing changes only the text of the target.
//! 7. Editing the new-todo text never touches the todos.
//! 8. Ids stay unique across any action sequence.

use proptest::prelude::*;
use proptest::sample::Index;
use reducer_testing::SequentialIdGenerator;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{reduce, Todo, TodoAction, TodoEnvironment, TodoId, TodoState};
use uuid::Uuid;

// ── Helpers ─────────────────────────────────────────────────────────────

/// Ids for generated todos, above anything `SequentialIdGenerator` issues
fn state_id(i: usize) -> TodoId {
    TodoId::from_uuid(Uuid::from_u128((1u128 << 64) + i as u128))
}

fn env() -> TodoEnvironment {
    TodoEnvironment::new(Arc::new(SequentialIdGenerator::new()))
}

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{0,24}"
}

fn state_strategy() -> impl Strategy<Value = TodoState> {
    (
        prop::collection::vec((text_strategy(), any::<bool>()), 0..8),
        text_strategy(),
    )
        .prop_map(|(items, new_todo_text)| TodoState {
            todos: items
                .into_iter()
                .enumerate()
                .map(|(i, (text, is_completed))| Todo {
                    id: state_id(i),
                    text,
                    is_completed,
                })
                .collect(),
            new_todo_text,
        })
}

fn non_empty_state_strategy() -> impl Strategy<Value = TodoState> {
    state_strategy().prop_filter("needs at least one todo", |state| !state.todos.is_empty())
}

/// Ids that never appear in generated states or sequential ids
fn absent_id_strategy() -> impl Strategy<Value = TodoId> {
    (0u128..1000).prop_map(|n| TodoId::from_uuid(Uuid::from_u128(u128::MAX - n)))
}

fn action_strategy() -> impl Strategy<Value = TodoAction> {
    let id = (0usize..8).prop_map(state_id);
    prop_oneof![
        Just(TodoAction::AddTodo),
        id.clone().prop_map(TodoAction::ToggleTodo),
        (id.clone(), text_strategy()).prop_map(|(id, text)| TodoAction::EditTodo { id, text }),
        id.prop_map(TodoAction::DeleteTodo),
        text_strategy().prop_map(TodoAction::EditNewTodo),
    ]
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Absent ids are no-ops
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn absent_id_is_noop(
        state in state_strategy(),
        id in absent_id_strategy(),
        text in text_strategy(),
    ) {
        let env = env();

        prop_assert_eq!(&reduce(&state, TodoAction::ToggleTodo(id), &env), &state);
        prop_assert_eq!(&reduce(&state, TodoAction::EditTodo { id, text }, &env), &state);
        prop_assert_eq!(&reduce(&state, TodoAction::DeleteTodo(id), &env), &state);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Toggle is an involution
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn toggle_twice_is_identity(state in non_empty_state_strategy(), pick in any::<Index>()) {
        let env = env();
        let target = pick.get(&state.todos).id;

        let once = reduce(&state, TodoAction::ToggleTodo(target), &env);
        let twice = reduce(&once, TodoAction::ToggleTodo(target), &env);

        prop_assert_ne!(&once, &state);
        prop_assert_eq!(&twice, &state);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. + 4. Add appends one incomplete todo and clears the pending text
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn add_appends_pending_text(state in state_strategy()) {
        let env = env();

        let next = reduce(&state, TodoAction::AddTodo, &env);

        prop_assert_eq!(next.count(), state.count() + 1);
        prop_assert_eq!(&next.todos[..state.count()], &state.todos[..]);

        let added = &next.todos[state.count()];
        prop_assert_eq!(&added.text, &state.new_todo_text);
        prop_assert!(!added.is_completed);
        prop_assert!(!state.exists(&added.id));
        prop_assert_eq!(next.new_todo_text.as_str(), "");
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Delete removes exactly the target
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn delete_removes_target(state in non_empty_state_strategy(), pick in any::<Index>()) {
        let env = env();
        let target = pick.get(&state.todos).id;

        let next = reduce(&state, TodoAction::DeleteTodo(target), &env);

        let expected: Vec<Todo> = state.todos.iter().filter(|t| t.id != target).cloned().collect();
        prop_assert!(!next.exists(&target));
        prop_assert_eq!(next.todos, expected);
        prop_assert_eq!(next.new_todo_text, state.new_todo_text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Edit keeps identity, position and completion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edit_changes_only_text(
        state in non_empty_state_strategy(),
        pick in any::<Index>(),
        text in text_strategy(),
    ) {
        let env = env();
        let index = pick.index(state.todos.len());
        let target = state.todos[index].id;

        let next = reduce(&state, TodoAction::EditTodo { id: target, text: text.clone() }, &env);

        prop_assert_eq!(next.count(), state.count());
        for (i, (before, after)) in state.todos.iter().zip(&next.todos).enumerate() {
            prop_assert_eq!(before.id, after.id);
            prop_assert_eq!(before.is_completed, after.is_completed);
            if i == index {
                prop_assert_eq!(&after.text, &text);
            } else {
                prop_assert_eq!(&after.text, &before.text);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Editing the new-todo text leaves the todos alone
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edit_new_todo_only_sets_text(state in state_strategy(), text in text_strategy()) {
        let next = reduce(&state, TodoAction::EditNewTodo(text.clone()), &env());

        prop_assert_eq!(next.todos, state.todos);
        prop_assert_eq!(next.new_todo_text, text);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Ids stay unique
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn ids_stay_unique(
        state in state_strategy(),
        actions in prop::collection::vec(action_strategy(), 0..32),
    ) {
        let env = env();

        let end = actions
            .into_iter()
            .fold(state, |state, action| reduce(&state, action, &env));

        let ids: HashSet<TodoId> = end.todos.iter().map(|t| t.id).collect();
        prop_assert_eq!(ids.len(), end.count());
    }
}
