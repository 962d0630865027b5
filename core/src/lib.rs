//! # Session Gate Core
//!
//! Reducer and effect primitives shared by every Session Gate crate.
//!
//! A feature is expressed as:
//!
//! - **State**: owned data describing what the user currently sees
//! - **Action**: every input the feature reacts to (user input, async results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a description of a side effect, executed by the runtime
//! - **Environment**: injected capabilities (gateways, navigators)
//!
//! Reducers never perform I/O. Anything that talks to the outside world is
//! returned as an [`effect::Effect`] and run by the `Store` in
//! `session-gate-runtime`, which feeds resulting actions back in.
//!
//! ## Example
//!
//! ```
//! use session_gate_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! #[derive(Default)]
//! struct Toggle {
//!     on: bool,
//! }
//!
//! enum ToggleAction {
//!     Flip,
//! }
//!
//! struct ToggleReducer;
//!
//! impl Reducer for ToggleReducer {
//!     type State = Toggle;
//!     type Action = ToggleAction;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut Toggle,
//!         action: ToggleAction,
//!         _env: &(),
//!     ) -> SmallVec<[Effect<ToggleAction>; 4]> {
//!         match action {
//!             ToggleAction::Flip => state.on = !state.on,
//!         }
//!         smallvec![Effect::None]
//!     }
//! }
//!
//! let mut state = Toggle::default();
//! let _ = ToggleReducer.reduce(&mut state, ToggleAction::Flip, &());
//! assert!(state.on);
//! ```

pub use smallvec::{SmallVec, smallvec};

mod effect_macros;

/// Reducer module - the core trait for feature logic
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They are deterministic and can be tested without a runtime.
pub mod reducer {
    use super::SmallVec;
    use super::effect::Effect;

    /// The Reducer trait - core abstraction for feature logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates `state` in place and returns effect descriptions for the
        /// runtime to execute. Most actions produce zero or one effect, so the
        /// effects are collected inline without a heap allocation.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. A reducer returns them and the runtime
/// decides when and where they run.
pub mod effect {
    use futures::future::BoxFuture;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Resolves to `Option<Action>` - if `Some`, the action is fed back into the reducer
        Future(BoxFuture<'static, Option<Action>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action> {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Returns `true` for [`Effect::None`].
        #[must_use]
        pub const fn is_none(&self) -> bool {
            matches!(self, Effect::None)
        }
    }
}
