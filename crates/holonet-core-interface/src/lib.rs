//! Holonet Core Interface: Remote Resource Gateway contract
//!
//! This crate defines the `ResourceGateway` trait, which abstracts how typed
//! catalog records are fetched so that the resolver layers can run against an
//! HTTP backend in production and an in-memory backend in tests.
//!
//! # Architecture
//!
//! The gateway offers two operations per resource kind:
//!
//! 1. **Lookup**: fetch one record by its numeric id
//! 2. **Listing**: fetch one page of a collection by page number
//!
//! Records come back as [`Entity`], a union over the six typed records, with
//! uniform access to display name, canonical URL and fields by wire name.
//!
//! # Example
//!
//! ```rust,no_run
//! use holonet_core_interface::{ResourceGateway, ResourceKind};
//!
//! async fn print_title<G: ResourceGateway>(gateway: &G) -> holonet_core_interface::Result<()> {
//!     let film = gateway.fetch_by_id(ResourceKind::Film, 1).await?;
//!     println!("{}", film.display_name());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use thiserror::Error;

pub mod kind;
pub mod models;

pub use kind::ResourceKind;
pub use models::{
    Entity, FieldValue, Film, Page, PageEnvelope, Person, Planet, Species, Starship, Vehicle,
};

/// Any failure reported by a gateway implementation
///
/// The resolver layers treat every variant identically; the distinction only
/// matters for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ResourceKind, id: u32 },

    #[error("Unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode {kind} payload: {reason}")]
    Decode { kind: ResourceKind, reason: String },

    #[error("Gateway error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

/// The Remote Resource Gateway
///
/// Implementations must be `Send + Sync + 'static` so that fetches can be
/// spawned onto a runtime's worker pool.
#[async_trait]
pub trait ResourceGateway: Send + Sync + 'static {
    /// Fetch a single record of `kind` by id (`id >= 1`)
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::NotFound` when the catalog has no such record,
    /// and any other variant for transport or decode failures.
    async fn fetch_by_id(&self, kind: ResourceKind, id: u32) -> Result<Entity>;

    /// Fetch page `page` (`page >= 1`) of the `kind` collection
    async fn fetch_page(&self, kind: ResourceKind, page: u32) -> Result<Page>;

    /// Fetch the first page of people without a page cursor
    ///
    /// Used by the legacy people listing; equivalent to page 1 unless an
    /// implementation has a dedicated endpoint for it.
    async fn fetch_all_people_first_page(&self) -> Result<Page> {
        self.fetch_page(ResourceKind::Person, 1).await
    }
}
