//! Gateway implementations for the ResourceGateway trait
//!
//! The production implementation is `holonet_connect::HttpGateway`; this
//! module provides:
//! - `MockGateway`: In-memory implementation for testing, with failure and
//!   latency injection

pub mod mock;

pub use holonet_core_interface::{GatewayError, ResourceGateway};
pub use mock::MockGateway;
