//! Mock gateway implementation for testing
//!
//! This provides an in-memory implementation of ResourceGateway that can be
//! used in unit and integration tests without network access.

use async_trait::async_trait;
use holonet_core_interface::{
    Entity, Film, GatewayError, Page, Person, Planet, ResourceGateway, ResourceKind, Result,
    Species, Starship, Vehicle,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Base URL used by the fixture helpers
pub const MOCK_BASE_URL: &str = "https://swapi.dev/api";

#[derive(Debug, Default)]
struct MockState {
    entities: HashMap<(ResourceKind, u32), Entity>,
    pages: HashMap<(ResourceKind, u32), Page>,
    failing_entities: HashSet<(ResourceKind, u32)>,
    failing_pages: HashSet<(ResourceKind, u32)>,
    entity_delays: HashMap<(ResourceKind, u32), Duration>,
    page_delays: HashMap<(ResourceKind, u32), Duration>,
}

/// Mock gateway implementation for testing
///
/// Records are keyed by the id decoded from their own `url`. Unknown ids
/// answer `NotFound`; unknown pages answer an empty last page, the way the
/// catalog behaves past the end of a collection.
///
/// # Example
///
/// ```rust
/// use holonet::gateway::mock::{person, MockGateway};
/// use holonet_core_interface::{ResourceGateway, ResourceKind};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gateway = MockGateway::new();
/// gateway.add_entity(person(1, "Luke Skywalker"));
///
/// let luke = gateway.fetch_by_id(ResourceKind::Person, 1).await.unwrap();
/// assert_eq!(luke.display_name(), "Luke Skywalker");
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
    fetches: AtomicUsize,
    page_fetches: AtomicUsize,
}

impl MockGateway {
    /// Create a new empty mock gateway
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not take the other branches down with it
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Store a record under the id found in its `url`
    ///
    /// Records whose URL does not decode are ignored.
    pub fn add_entity(&self, entity: impl Into<Entity>) {
        let entity = entity.into();
        if let Some(id) = trailing_id(entity.url()) {
            self.state().entities.insert((entity.kind(), id), entity);
        }
    }

    /// Store a listing page
    pub fn add_page(&self, kind: ResourceKind, page: u32, contents: Page) {
        self.state().pages.insert((kind, page), contents);
    }

    /// Make every fetch of one record fail
    pub fn fail_entity(&self, kind: ResourceKind, id: u32) {
        self.state().failing_entities.insert((kind, id));
    }

    /// Make every fetch of one page fail
    pub fn fail_page(&self, kind: ResourceKind, page: u32) {
        self.state().failing_pages.insert((kind, page));
    }

    /// Undo `fail_page`
    pub fn restore_page(&self, kind: ResourceKind, page: u32) {
        self.state().failing_pages.remove(&(kind, page));
    }

    /// Delay the answer for one record
    pub fn set_delay(&self, kind: ResourceKind, id: u32, delay: Duration) {
        self.state().entity_delays.insert((kind, id), delay);
    }

    /// Delay the answer for one page
    pub fn set_page_delay(&self, kind: ResourceKind, page: u32, delay: Duration) {
        self.state().page_delays.insert((kind, page), delay);
    }

    /// Number of `fetch_by_id` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of page fetches served so far
    pub fn page_fetch_count(&self) -> usize {
        self.page_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResourceGateway for MockGateway {
    async fn fetch_by_id(&self, kind: ResourceKind, id: u32) -> Result<Entity> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.state().entity_delays.get(&(kind, id)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if state.failing_entities.contains(&(kind, id)) {
            return Err(GatewayError::Status {
                status: 500,
                url: reference(kind, id),
            });
        }

        state
            .entities
            .get(&(kind, id))
            .cloned()
            .ok_or(GatewayError::NotFound { kind, id })
    }

    async fn fetch_page(&self, kind: ResourceKind, page: u32) -> Result<Page> {
        self.page_fetches.fetch_add(1, Ordering::SeqCst);

        let delay = self.state().page_delays.get(&(kind, page)).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if state.failing_pages.contains(&(kind, page)) {
            return Err(GatewayError::Network(format!(
                "injected failure for {} page {}",
                kind, page
            )));
        }

        Ok(state.pages.get(&(kind, page)).cloned().unwrap_or_default())
    }
}

fn trailing_id(url: &str) -> Option<u32> {
    url.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

// ═══════════════════════════════════════════════════════════════════════
// Fixture helpers
// ═══════════════════════════════════════════════════════════════════════

/// Canonical reference URL for `kind` and `id`
pub fn reference(kind: ResourceKind, id: u32) -> String {
    format!("{}/{}/{}/", MOCK_BASE_URL, kind.path_segment(), id)
}

/// Canonical cursor URL for `kind` and `page`
pub fn cursor(kind: ResourceKind, page: u32) -> String {
    format!("{}/{}/?page={}", MOCK_BASE_URL, kind.path_segment(), page)
}

/// Reference URLs for several ids of one kind
pub fn references(kind: ResourceKind, ids: &[u32]) -> Vec<String> {
    ids.iter().map(|id| reference(kind, *id)).collect()
}

pub fn film(id: u32, title: &str) -> Film {
    Film {
        title: title.to_string(),
        episode_id: id.to_string(),
        url: reference(ResourceKind::Film, id),
        ..Default::default()
    }
}

pub fn person(id: u32, name: &str) -> Person {
    Person {
        name: name.to_string(),
        url: reference(ResourceKind::Person, id),
        ..Default::default()
    }
}

pub fn planet(id: u32, name: &str) -> Planet {
    Planet {
        name: name.to_string(),
        url: reference(ResourceKind::Planet, id),
        ..Default::default()
    }
}

pub fn species(id: u32, name: &str) -> Species {
    Species {
        name: name.to_string(),
        url: reference(ResourceKind::Species, id),
        ..Default::default()
    }
}

pub fn starship(id: u32, name: &str) -> Starship {
    Starship {
        name: name.to_string(),
        url: reference(ResourceKind::Starship, id),
        ..Default::default()
    }
}

pub fn vehicle(id: u32, name: &str) -> Vehicle {
    Vehicle {
        name: name.to_string(),
        url: reference(ResourceKind::Vehicle, id),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_entity_is_not_found() {
        let gateway = MockGateway::new();
        let err = gateway.fetch_by_id(ResourceKind::Planet, 3).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::NotFound {
                kind: ResourceKind::Planet,
                id: 3
            }
        );
        assert_eq!(gateway.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_page_is_empty_and_last() {
        let gateway = MockGateway::new();
        let page = gateway.fetch_page(ResourceKind::Film, 7).await.unwrap();
        assert!(page.results.is_empty());
        assert!(page.is_last());
    }

    #[tokio::test]
    async fn test_page_failure_can_be_restored() {
        let gateway = MockGateway::new();
        gateway.add_page(ResourceKind::Person, 1, Page::new(vec![person(1, "Luke").into()], None));
        gateway.fail_page(ResourceKind::Person, 1);
        assert!(gateway.fetch_page(ResourceKind::Person, 1).await.is_err());

        gateway.restore_page(ResourceKind::Person, 1);
        let page = gateway.fetch_page(ResourceKind::Person, 1).await.unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(gateway.page_fetch_count(), 2);
    }

    #[test]
    fn test_fixture_urls() {
        assert_eq!(reference(ResourceKind::Person, 1), "https://swapi.dev/api/people/1/");
        assert_eq!(cursor(ResourceKind::Planet, 2), "https://swapi.dev/api/planets/?page=2");
        assert_eq!(trailing_id("https://swapi.dev/api/people/12/"), Some(12));
        assert_eq!(trailing_id("not a url"), None);
    }
}
