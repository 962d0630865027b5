//! Mock provider implementations for testing.
//!
//! In-memory, deterministic stand-ins for every provider trait, for use in
//! unit and integration tests.

pub mod gateway;
pub mod navigator;
pub mod observer;

pub use gateway::{GatewayCall, MockIdentityGateway};
pub use navigator::RecordingNavigator;
pub use observer::ManualAuthObserver;
