//! # Session Gate Testing
//!
//! Testing utilities for reducers built on `session-gate-core`.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for a single reducer step
//! - [`assertions`]: effect shape assertions
//! - [`effects::drain`]: runs an effect without a `Store`, returning the
//!   action it would feed back
//! - [`init_test_tracing`]: opt-in log output for test runs
//!
//! ## Example
//!
//! ```ignore
//! use session_gate_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(LoginReducer::new())
//!     .with_env(test_environment())
//!     .given_state(LoginState::default())
//!     .when_action(LoginAction::Submit)
//!     .then_state(|state| assert!(state.form.error.is_some()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```


pub use reducer_test::{ReducerTest, assertions};

/// Execute effects outside of a `Store`
pub mod effects {
    use session_gate_core::effect::Effect;

    /// Run an effect to completion and collect the action it yields, if any
    pub async fn drain<A: Send + 'static>(effect: Effect<A>) -> Vec<A> {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(fut) => fut.await.into_iter().collect(),
        }
    }

    /// Run every effect a reducer returned, in order
    pub async fn drain_all<A, I>(effects: I) -> Vec<A>
    where
        A: Send + 'static,
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();
        for effect in effects {
            actions.extend(drain(effect).await);
        }
        actions
    }
}

/// Install a `tracing` subscriber for the current test binary
///
/// Honours `RUST_LOG` and writes through the test writer so output is only
/// shown for failing tests. Safe to call from every test.
pub fn init_test_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::effects::{drain, drain_all};
    use session_gate_core::effect::Effect;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Signal {
        A,
        B,
    }

    #[test]
    fn test_drain_none_yields_nothing() {
        let actions = tokio_test::block_on(drain(Effect::<Signal>::None));
        assert!(actions.is_empty());
    }

    #[tokio::test]
    async fn test_drain_all_runs_effects_in_order() {
        let effects = vec![
            Effect::Future(Box::pin(async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Some(Signal::A)
            })),
            Effect::None,
            Effect::Future(Box::pin(async { None })),
            Effect::Future(Box::pin(async { Some(Signal::B) })),
        ];

        assert_eq!(drain_all(effects).await, vec![Signal::A, Signal::B]);
    }

    #[test]
    fn test_init_test_tracing_is_idempotent() {
        super::init_test_tracing();
        super::init_test_tracing();
    }
}
