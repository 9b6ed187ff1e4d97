//! Relation Fan-Out Resolver
//!
//! Turns one relation field (an ordered list of reference URLs of a single
//! kind) into the ordered list of related entities.

use holonet_core_interface::{Entity, ResourceGateway, ResourceKind};
use std::sync::Arc;
use tracing::debug;

use crate::codec;
use crate::error::{HolonetError, Result};
use crate::join::gather;

/// Resolves lists of reference URLs through a gateway
///
/// Cloning is cheap; clones share the gateway.
pub struct RelationResolver<G: ResourceGateway + ?Sized> {
    gateway: Arc<G>,
}

impl<G: ResourceGateway + ?Sized> Clone for RelationResolver<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
        }
    }
}

impl<G: ResourceGateway + ?Sized> RelationResolver<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self { gateway }
    }

    /// Fetch every entity referenced by `urls`, in `urls` order
    ///
    /// All ids are decoded before any fetch is issued; one malformed URL, or
    /// one naming a collection other than `kind`, fails the whole fan-out with
    /// `MalformedReference` and nothing is fetched.
    /// Otherwise one fetch per id is started concurrently, with no admission
    /// limit, and any fetch failure fails the fan-out as an aggregate.
    pub async fn resolve_all(&self, kind: ResourceKind, urls: &[String]) -> Result<Vec<Entity>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        let ids = urls
            .iter()
            .map(|url| codec::extract_id_of(url, kind))
            .collect::<Result<Vec<u32>>>()?;

        debug!("resolving {} {} reference(s)", ids.len(), kind);

        let branches = ids
            .into_iter()
            .map(|id| {
                let gateway = Arc::clone(&self.gateway);
                async move {
                    gateway
                        .fetch_by_id(kind, id)
                        .await
                        .map_err(HolonetError::from)
                }
            })
            .collect();

        gather(branches).await
    }
}
