/*!
 * Holonet - client-side aggregation over a paginated REST catalog
 *
 * Turns the catalog's link-heavy records into ready-to-display views:
 * - Reference URL decoding (entity ids and page cursors)
 * - Concurrent relation fan-out with source-order results
 * - Per-kind detail projections driven by field layouts
 * - Paginated name lists with loading/error sentinels
 * - Staleness suppression for overlapping detail requests
 * - Optional highlight decoration for two-pane layouts
 *
 * Transport lives behind the `ResourceGateway` trait; see `holonet-connect`
 * for the HTTP implementation and `gateway::mock` for the in-memory one.
 */

pub mod accumulator;
pub mod codec;
pub mod config;
pub mod details;
pub mod display;
pub mod error;
pub mod gateway;
pub mod join;
pub mod layout;
pub mod logging;
pub mod resolver;

// Re-export commonly used types
pub use accumulator::{ListSnapshot, NameAccumulator, PageOutcome};
pub use config::{ClientConfig, LogLevel};
pub use details::{DetailAggregator, DetailOutcome, DetailState, Projection};
pub use display::{DisplayItem, Highlighter, WorkingList};
pub use error::{HolonetError, Result};
pub use gateway::{GatewayError, MockGateway, ResourceGateway};
pub use holonet_core_interface::{Entity, Page, ResourceKind};
pub use resolver::RelationResolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
    }
}
