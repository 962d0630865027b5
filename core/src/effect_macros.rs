//! Declarative macros for ergonomic effect construction

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```
/// use session_gate_core::async_effect;
///
/// #[derive(Debug)]
/// enum LookupAction {
///     Resolved { value: u32 },
/// }
///
/// let effect = async_effect! {
///     Some(LookupAction::Resolved { value: 7 })
/// };
/// assert!(matches!(effect, session_gate_core::effect::Effect::Future(_)));
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}
