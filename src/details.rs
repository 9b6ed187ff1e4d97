//! Detail Aggregator
//!
//! Resolves one entity plus every relation its layout declares, and flattens
//! the result into an ordered label/value [`Projection`].
//!
//! # Flow
//!
//! ```text
//! get_details(id)
//!   │  state: loading=true, show_error=false
//!   ▼
//! fetch primary ──► relation fan-outs (all fields at once, each one concurrent)
//!   │                        │
//!   └──────── join ◄─────────┘
//!   ▼
//! state: loading=false + projection      (success)
//! state: loading=false + show_error=true (any failure)
//! ```
//!
//! Each call takes a ticket from a monotonically increasing counter. When a
//! call finishes after a newer one was issued, its outcome is dropped
//! instead of overwriting the newer call's state. In-flight work is never
//! cancelled.

use holonet_core_interface::{Entity, FieldValue, ResourceGateway, ResourceKind};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{HolonetError, Result};
use crate::join::gather;
use crate::layout::{self, FieldLayout, FieldShape, FieldSpec};
use crate::resolver::RelationResolver;

/// Separator between related names
pub const NAME_SEPARATOR: &str = ", ";

/// One label/value row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionEntry {
    pub label: &'static str,
    pub value: String,
}

/// Ordered, human-readable view of one resolved entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub kind: ResourceKind,
    pub entries: Vec<ProjectionEntry>,
}

impl Projection {
    /// Value shown under `label`
    pub fn get(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.label == label)
            .map(|entry| entry.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.label, entry.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What the UI observes for a detail screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub loading: bool,
    pub show_error: bool,

    /// Projection of the latest call, once it succeeded
    ///
    /// Cleared as soon as a new call starts, so it never belongs to another id.
    pub projection: Option<Arc<Projection>>,
}

/// How a `get_details` call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOutcome {
    /// A new projection was published
    Applied,

    /// The error state was published
    Failed,

    /// A newer call was issued meanwhile; nothing was published
    Superseded,
}

/// Per-kind detail resolution, one instance per detail screen
pub struct DetailAggregator<G: ResourceGateway + ?Sized> {
    kind: ResourceKind,
    layout: &'static FieldLayout,
    gateway: Arc<G>,
    resolver: RelationResolver<G>,

    /// Ticket of the most recently issued call
    issued: AtomicU64,

    state: watch::Sender<DetailState>,
}

impl<G: ResourceGateway + ?Sized> DetailAggregator<G> {
    pub fn new(gateway: Arc<G>, kind: ResourceKind) -> Self {
        let (state, _) = watch::channel(DetailState::default());
        Self {
            kind,
            layout: layout::for_kind(kind),
            resolver: RelationResolver::new(Arc::clone(&gateway)),
            gateway,
            issued: AtomicU64::new(0),
            state,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Read-only view of the state for the UI layer
    pub fn subscribe(&self) -> watch::Receiver<DetailState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state
    pub fn state(&self) -> DetailState {
        self.state.borrow().clone()
    }

    /// Resolve `id` and publish the outcome
    ///
    /// Never fails: errors become `show_error = true` plus a log line.
    /// Calling again with the same id repeats every fetch; nothing is cached.
    pub async fn get_details(&self, id: u32) -> DetailOutcome {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;

        self.state.send_modify(|state| {
            state.loading = true;
            state.show_error = false;
            state.projection = None;
        });

        let result = self.resolve(id).await;

        let mut outcome = DetailOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if self.issued.load(Ordering::SeqCst) != ticket {
                return false;
            }

            state.loading = false;
            match &result {
                Ok(projection) => {
                    state.projection = Some(Arc::new(projection.clone()));
                    outcome = DetailOutcome::Applied;
                }
                Err(_) => {
                    state.show_error = true;
                    outcome = DetailOutcome::Failed;
                }
            }
            true
        });

        match (&outcome, &result) {
            (DetailOutcome::Superseded, _) => {
                debug!("{} {} resolution superseded by a newer request", self.kind, id);
            }
            (_, Ok(projection)) => {
                info!("Resolved {} {} ({} fields)", self.kind, id, projection.len());
            }
            (_, Err(e)) => {
                warn!(category = %e.category(), "Failed to resolve {} {}: {}", self.kind, id, e);
            }
        }

        outcome
    }

    /// Fetch `id` and all its relations, without touching the published state
    pub async fn resolve(&self, id: u32) -> Result<Projection> {
        let primary = self.gateway.fetch_by_id(self.kind, id).await?;

        let mut inputs = Vec::new();
        for spec in self.layout.relations() {
            inputs.push(relation_input(self.kind, spec, &primary)?);
        }

        debug!(
            "{} {}: resolving {} relation field(s)",
            self.kind,
            id,
            inputs.len()
        );

        let branches = inputs
            .into_iter()
            .map(|(kind, urls)| {
                let resolver = self.resolver.clone();
                async move { resolver.resolve_all(kind, &urls).await }
            })
            .collect();

        let related = gather(branches).await?;

        build_projection(self.layout, &primary, related)
    }
}

/// Target kind and reference URLs of one relation field
fn relation_input(
    kind: ResourceKind,
    spec: &'static FieldSpec,
    entity: &Entity,
) -> Result<(ResourceKind, Vec<String>)> {
    match (spec.shape, entity.field(spec.key)) {
        (FieldShape::One(target), Some(FieldValue::Reference(url))) => {
            Ok((target, url.map(str::to_string).into_iter().collect()))
        }
        (FieldShape::Many(target), Some(FieldValue::References(urls))) => {
            Ok((target, urls.to_vec()))
        }
        _ => Err(HolonetError::MissingField {
            kind,
            field: spec.key,
        }),
    }
}

/// Assemble the projection in layout order
///
/// `related` holds one resolved list per relation field, in declared order.
pub fn build_projection(
    layout: &FieldLayout,
    primary: &Entity,
    related: Vec<Vec<Entity>>,
) -> Result<Projection> {
    let missing = |spec: &FieldSpec| HolonetError::MissingField {
        kind: layout.kind,
        field: spec.key,
    };

    let mut related = related.into_iter();
    let mut entries = Vec::with_capacity(layout.fields.len());

    for spec in layout.fields {
        let value = match spec.shape {
            FieldShape::Scalar => match primary.field(spec.key) {
                Some(FieldValue::Text(text)) => text.to_string(),
                _ => return Err(missing(spec)),
            },
            FieldShape::One(_) => {
                let entities = related.next().ok_or_else(|| missing(spec))?;
                entities
                    .first()
                    .map(|entity| entity.display_name().to_string())
                    .unwrap_or_default()
            }
            FieldShape::Many(_) => {
                let entities = related.next().ok_or_else(|| missing(spec))?;
                entities
                    .iter()
                    .map(Entity::display_name)
                    .collect::<Vec<_>>()
                    .join(NAME_SEPARATOR)
            }
        };

        entries.push(ProjectionEntry {
            label: spec.label,
            value,
        });
    }

    Ok(Projection {
        kind: layout.kind,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{film, planet, reference, MockGateway};
    use crate::layout::{PERSON_LAYOUT, SPECIES_LAYOUT};
    use holonet_core_interface::{Person, Species};
    use std::time::Duration;

    #[test]
    fn test_projection_follows_layout_order() {
        let luke: Entity = Person {
            name: "Luke Skywalker".into(),
            birth_year: "19BBY".into(),
            gender: "male".into(),
            height: "172".into(),
            url: reference(ResourceKind::Person, 1),
            ..Default::default()
        }
        .into();

        let related = vec![
            vec![planet(1, "Tatooine").into()],
            vec![],
            vec![
                film(1, "A New Hope").into(),
                film(2, "The Empire Strikes Back").into(),
            ],
            vec![],
            vec![],
        ];

        let projection = build_projection(&PERSON_LAYOUT, &luke, related).unwrap();
        let labels: Vec<&str> = projection.iter().map(|(label, _)| label).collect();
        assert_eq!(labels, PERSON_LAYOUT.labels().collect::<Vec<_>>());

        assert_eq!(projection.get("Name"), Some("Luke Skywalker"));
        assert_eq!(projection.get("Homeworld"), Some("Tatooine"));
        assert_eq!(projection.get("Species"), Some(""));
        assert_eq!(
            projection.get("Films"),
            Some("A New Hope, The Empire Strikes Back")
        );
        assert_eq!(projection.get("Height"), Some("172"));
    }

    #[test]
    fn test_missing_homeworld_renders_empty() {
        let droid: Entity = Species {
            name: "Droid".into(),
            homeworld: None,
            url: reference(ResourceKind::Species, 2),
            ..Default::default()
        }
        .into();

        let projection =
            build_projection(&SPECIES_LAYOUT, &droid, vec![vec![], vec![], vec![]]).unwrap();
        assert_eq!(projection.get("Homeworld"), Some(""));
    }

    #[test]
    fn test_wrong_kind_is_missing_field() {
        let tatooine: Entity = planet(1, "Tatooine").into();
        let err = build_projection(&PERSON_LAYOUT, &tatooine, vec![]).unwrap_err();
        assert!(matches!(
            err,
            HolonetError::MissingField { kind: ResourceKind::Person, .. }
        ));
    }

    #[tokio::test]
    async fn test_homeworld_resolved_as_bare_name() {
        let gateway = MockGateway::new();
        gateway.add_entity(planet(1, "Tatooine"));
        gateway.add_entity(Person {
            name: "Luke Skywalker".into(),
            homeworld: Some(reference(ResourceKind::Planet, 1)),
            url: reference(ResourceKind::Person, 1),
            ..Default::default()
        });

        let aggregator = DetailAggregator::new(Arc::new(gateway), ResourceKind::Person);
        let projection = aggregator.resolve(1).await.unwrap();
        assert_eq!(projection.get("Homeworld"), Some("Tatooine"));
    }

    #[tokio::test]
    async fn test_failed_call_drops_previous_projection() {
        let gateway = MockGateway::new();
        gateway.add_entity(planet(1, "Tatooine"));
        let aggregator = DetailAggregator::new(Arc::new(gateway), ResourceKind::Planet);

        assert_eq!(aggregator.get_details(1).await, DetailOutcome::Applied);
        assert!(aggregator.state().projection.is_some());

        assert_eq!(aggregator.get_details(2).await, DetailOutcome::Failed);
        let state = aggregator.state();
        assert!(state.show_error);
        assert!(!state.loading);
        assert!(state.projection.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_call_does_not_overwrite_newer_state() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_entity(Person {
            name: "Slow".into(),
            url: reference(ResourceKind::Person, 1),
            ..Default::default()
        });
        gateway.add_entity(Person {
            name: "Fast".into(),
            url: reference(ResourceKind::Person, 2),
            ..Default::default()
        });
        gateway.set_delay(ResourceKind::Person, 1, Duration::from_millis(500));

        let aggregator = Arc::new(DetailAggregator::new(gateway, ResourceKind::Person));

        let slow = {
            let aggregator = Arc::clone(&aggregator);
            tokio::spawn(async move { aggregator.get_details(1).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert_eq!(aggregator.get_details(2).await, DetailOutcome::Applied);
        assert_eq!(slow.await.unwrap(), DetailOutcome::Superseded);

        let state = aggregator.state();
        assert!(!state.loading);
        assert_eq!(state.projection.unwrap().get("Name"), Some("Fast"));
    }
}
