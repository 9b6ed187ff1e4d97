//! Holonet Connect: HTTP connectivity to the public REST catalog
//!
//! This crate provides the production implementation of the
//! `ResourceGateway` contract defined in `holonet-core-interface`.
//!
//! # Architecture
//!
//! - **HttpGateway**: Implements `ResourceGateway` with a shared `reqwest` client
//! - **decode_entity / decode_page**: Per-kind JSON decoding of catalog payloads
//!
//! Timeouts are a property of the gateway; the resolver layers above never
//! impose their own.
//!
//! # Example
//!
//! ```rust,no_run
//! use holonet_connect::{GatewayConfig, HttpGateway};
//! use holonet_core_interface::{ResourceGateway, ResourceKind};
//!
//! async fn example() -> anyhow::Result<()> {
//!     let gateway = HttpGateway::new(GatewayConfig::default())?;
//!     let page = gateway.fetch_page(ResourceKind::Planet, 1).await?;
//!     for planet in &page.results {
//!         println!("{}", planet.display_name());
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod gateway;

pub use error::ConnectError;
pub use gateway::{
    decode_entity, decode_page, GatewayConfig, HttpGateway, DEFAULT_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_USER_AGENT,
};
