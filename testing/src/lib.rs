//! # Reducer Testing
//!
//! Testing utilities and helpers for the reducer architecture.
//!
//! This crate provides:
//! - Deterministic implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use reducer_testing::{assertions, ReducerTest, SequentialIdGenerator};
//!
//! ReducerTest::new(TodoReducer::new())
//!     .with_env(TodoEnvironment::new(Arc::new(SequentialIdGenerator::new())))
//!     .given_state(TodoState::new())
//!     .when_action(TodoAction::EditNewTodo("Buy milk".to_string()))
//!     .then_state(|state| assert_eq!(state.new_todo_text, "Buy milk"))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use reducer_core::environment::IdGenerator;
use reducer_core::Uuid;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{IdGenerator, Uuid};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Id generator that hands out predictable ids
    ///
    /// The n-th call (1-based) returns `Uuid::from_u128(n)`, so tests can
    /// name ids before they are generated with [`SequentialIdGenerator::nth`].
    /// Clones share the same counter.
    ///
    /// # Example
    ///
    /// ```
    /// use reducer_core::environment::IdGenerator;
    /// use reducer_testing::SequentialIdGenerator;
    ///
    /// let ids = SequentialIdGenerator::new();
    /// assert_eq!(ids.next_id(), SequentialIdGenerator::nth(1));
    /// assert_eq!(ids.next_id(), SequentialIdGenerator::nth(2));
    /// ```
    #[derive(Debug, Clone, Default)]
    pub struct SequentialIdGenerator {
        issued: Arc<AtomicU64>,
    }

    impl SequentialIdGenerator {
        /// Create a generator whose first id is `nth(1)`
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// The id returned by the n-th call to `next_id`
        #[must_use]
        pub const fn nth(n: u64) -> Uuid {
            Uuid::from_u128(n as u128)
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.issued.load(Ordering::SeqCst)
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Self::nth(n)
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use reducer_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if any effect does something when executed.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().all(Effect::is_none),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

// Re-export commonly used items
pub use mocks::SequentialIdGenerator;
pub use reducer_test::ReducerTest;
