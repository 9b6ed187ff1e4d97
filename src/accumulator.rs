//! Paginated Name Accumulator
//!
//! Builds a growing list of entity names one page at a time. Each load
//! publishes twice: once with a `Loading` sentinel at the tail before any I/O,
//! and once with the merged page (or an `Error` sentinel) afterwards.
//!
//! Page loads are serialized by ownership: [`NameAccumulator::load_page`]
//! takes `&mut self`, so a second load on the same instance cannot start
//! while one is in flight. Observers only ever get read-only snapshots.

use holonet_core_interface::{Page, ResourceGateway, ResourceKind};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::codec;
use crate::display::{DisplayItem, WorkingList};
use crate::error::Result;

/// First page of every collection
pub const FIRST_PAGE: u32 = 1;

/// Published view of the accumulator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSnapshot {
    pub items: Vec<DisplayItem>,
    pub exhausted: bool,
    pub next_page: u32,
}

/// How a page load ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Entries were merged; `exhausted` is the flag after the merge
    Loaded { appended: usize, exhausted: bool },

    /// The fetch or its decoding failed; an `Error` sentinel was appended
    Failed,
}

#[derive(Debug, Clone)]
struct AccumulatorState {
    list: WorkingList,
    next_page: u32,
    exhausted: bool,
}

impl Default for AccumulatorState {
    fn default() -> Self {
        Self {
            list: WorkingList::new(),
            next_page: FIRST_PAGE,
            exhausted: false,
        }
    }
}

impl AccumulatorState {
    fn snapshot(&self) -> ListSnapshot {
        ListSnapshot {
            items: self.list.items().to_vec(),
            exhausted: self.exhausted,
            next_page: self.next_page,
        }
    }
}

/// Accumulates the names of one resource kind across pages
pub struct NameAccumulator<G: ResourceGateway + ?Sized> {
    gateway: Arc<G>,
    kind: ResourceKind,
    state: AccumulatorState,
    published: watch::Sender<ListSnapshot>,
}

impl<G: ResourceGateway + ?Sized> NameAccumulator<G> {
    pub fn new(gateway: Arc<G>, kind: ResourceKind) -> Self {
        let state = AccumulatorState::default();
        let (published, _) = watch::channel(state.snapshot());
        Self {
            gateway,
            kind,
            state,
            published,
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Read-only view for the UI layer
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot> {
        self.published.subscribe()
    }

    pub fn snapshot(&self) -> ListSnapshot {
        self.state.snapshot()
    }

    pub fn items(&self) -> &[DisplayItem] {
        self.state.list.items()
    }

    /// Cursor of the next page to request
    pub fn next_page(&self) -> u32 {
        self.state.next_page
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted
    }

    /// Load the page at the stored cursor
    pub async fn load_next(&mut self) -> PageOutcome {
        let page = self.state.next_page;
        self.load_page(page).await
    }

    /// Fetch `page` and merge it into the working list
    ///
    /// Never fails: a failed fetch appends an `Error` sentinel and leaves the
    /// cursor and exhaustion flag as they were, so a retry is simply another
    /// `load_next`. Loading past the end is allowed and usually merges an
    /// empty page.
    pub async fn load_page(&mut self, page: u32) -> PageOutcome {
        self.begin();
        debug!("Fetching {} page {}", self.kind, page);

        let fetched = self.gateway.fetch_page(self.kind, page).await;
        self.finish(fetched.map_err(Into::into), page)
    }

    /// Load the first people page through the gateway's legacy listing call
    ///
    /// Merges exactly like `load_page(1)`. Only meaningful for people lists.
    pub async fn load_legacy_people_page(&mut self) -> PageOutcome {
        self.begin();
        debug!("Fetching legacy people listing");

        let fetched = self.gateway.fetch_all_people_first_page().await;
        self.finish(fetched.map_err(Into::into), FIRST_PAGE)
    }

    fn begin(&mut self) {
        self.state.list.begin_loading();
        self.publish();
    }

    fn finish(&mut self, fetched: Result<Page>, page: u32) -> PageOutcome {
        let merged = fetched.and_then(|contents| {
            let entries = named_entries(&contents)?;
            Ok((contents, entries))
        });

        let outcome = match merged {
            Ok((contents, entries)) => {
                let appended = entries.len();
                self.state.list.complete(entries);
                self.advance_cursor(contents.next.as_deref());

                info!(
                    "Loaded {} page {}: {} entries{}",
                    self.kind,
                    page,
                    appended,
                    if self.state.exhausted { " (last page)" } else { "" }
                );
                PageOutcome::Loaded {
                    appended,
                    exhausted: self.state.exhausted,
                }
            }
            Err(e) => {
                self.state.list.fail();
                warn!(category = %e.category(), "Failed to load {} page {}: {}", self.kind, page, e);
                PageOutcome::Failed
            }
        };

        self.publish();
        outcome
    }

    fn advance_cursor(&mut self, next: Option<&str>) {
        let Some(next) = next else {
            self.state.exhausted = true;
            return;
        };

        match codec::extract_page_number(next) {
            Ok(number) => self.state.next_page = number,
            Err(e) => {
                warn!(
                    "Ignoring undecodable next cursor for {}: {}; staying on page {}",
                    self.kind, e, self.state.next_page
                );
            }
        }
    }

    fn publish(&self) {
        self.published.send_replace(self.state.snapshot());
    }
}

/// Map a page's records to named entries, in page order
fn named_entries(page: &Page) -> Result<Vec<DisplayItem>> {
    page.results
        .iter()
        .map(|entity| {
            let id = codec::extract_id_of(entity.url(), entity.kind())?;
            Ok(DisplayItem::named(id, entity.display_name()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{cursor, film, person, MockGateway};
    use holonet_core_interface::Person;
    use std::time::Duration;
    use tempfile::NamedTempFile;
    use tracing_subscriber::layer::SubscriberExt;

    fn people_page(ids: std::ops::RangeInclusive<u32>, next: Option<String>) -> Page {
        Page::new(
            ids.map(|id| person(id, &format!("Person {}", id)).into())
                .collect(),
            next,
        )
    }

    #[tokio::test]
    async fn test_first_page_advances_cursor() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(
            ResourceKind::Person,
            1,
            people_page(1..=10, Some(cursor(ResourceKind::Person, 2))),
        );

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Person);
        let outcome = accumulator.load_page(1).await;

        assert_eq!(
            outcome,
            PageOutcome::Loaded {
                appended: 10,
                exhausted: false
            }
        );
        assert_eq!(accumulator.next_page(), 2);
        assert_eq!(accumulator.items().len(), 10);
        assert_eq!(accumulator.items()[0], DisplayItem::named(1, "Person 1"));
    }

    #[tokio::test]
    async fn test_missing_next_marks_exhausted() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(ResourceKind::Film, 1, Page::new(vec![film(1, "A New Hope").into()], None));

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Film);
        accumulator.load_next().await;

        assert!(accumulator.is_exhausted());
        assert_eq!(accumulator.next_page(), 1);
        assert_eq!(accumulator.items(), &[DisplayItem::named(1, "A New Hope")]);
    }

    #[tokio::test]
    async fn test_malformed_next_is_tolerated_and_logged() {
        let log_file = NamedTempFile::new().unwrap();
        let subscriber = tracing_subscriber::registry().with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file.reopen().unwrap())
                .with_ansi(false),
        );
        // Current-thread runtime: the guard covers the whole load
        let _guard = tracing::subscriber::set_default(subscriber);

        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(
            ResourceKind::Person,
            1,
            people_page(1..=2, Some("https://swapi.dev/api/people/?page=two".into())),
        );

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Person);
        let outcome = accumulator.load_page(1).await;

        assert!(matches!(outcome, PageOutcome::Loaded { appended: 2, .. }));
        assert_eq!(accumulator.next_page(), 1);
        assert!(!accumulator.is_exhausted());
        assert!(!accumulator.items().contains(&DisplayItem::Error));

        let contents = std::fs::read_to_string(log_file.path()).unwrap();
        let warning = contents
            .lines()
            .find(|line| line.contains("Ignoring undecodable next cursor"))
            .expect("malformed cursor is logged");
        assert!(warning.contains("WARN"));
        assert!(warning.contains("?page=two"));
    }

    #[tokio::test]
    async fn test_malformed_entity_url_fails_page() {
        let gateway = Arc::new(MockGateway::new());
        let broken = Person {
            name: "Nobody".into(),
            url: "https://swapi.dev/api/people/x/".into(),
            ..Default::default()
        };
        gateway.add_page(
            ResourceKind::Person,
            1,
            Page::new(vec![person(1, "Luke").into(), broken.into()], None),
        );

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Person);
        assert_eq!(accumulator.load_page(1).await, PageOutcome::Failed);
        assert_eq!(accumulator.items(), &[DisplayItem::Error]);
        assert!(!accumulator.is_exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_sentinel_published_before_io() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(ResourceKind::Person, 1, people_page(1..=3, None));
        gateway.set_page_delay(ResourceKind::Person, 1, Duration::from_millis(200));

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Person);
        let mut rx = accumulator.subscribe();

        let observer = tokio::spawn(async move {
            rx.changed().await.unwrap();
            let first = rx.borrow_and_update().clone();
            rx.changed().await.unwrap();
            let second = rx.borrow_and_update().clone();
            (first, second)
        });

        accumulator.load_page(1).await;
        let (first, second) = observer.await.unwrap();

        assert_eq!(first.items, vec![DisplayItem::Loading]);
        assert_eq!(second.items.len(), 3);
        assert!(second.exhausted);
    }

    #[tokio::test]
    async fn test_exhaustion_is_monotonic() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(ResourceKind::Person, 1, people_page(1..=2, None));
        gateway.add_page(
            ResourceKind::Person,
            2,
            people_page(3..=4, Some(cursor(ResourceKind::Person, 3))),
        );

        let mut accumulator = NameAccumulator::new(gateway, ResourceKind::Person);
        accumulator.load_page(1).await;
        assert!(accumulator.is_exhausted());

        accumulator.load_page(2).await;
        assert!(accumulator.is_exhausted());
        assert_eq!(accumulator.items().len(), 4);
    }

    #[tokio::test]
    async fn test_legacy_people_path_merges_like_first_page() {
        let gateway = Arc::new(MockGateway::new());
        gateway.add_page(
            ResourceKind::Person,
            1,
            people_page(1..=3, Some(cursor(ResourceKind::Person, 2))),
        );

        let mut accumulator = NameAccumulator::new(gateway.clone(), ResourceKind::Person);
        let outcome = accumulator.load_legacy_people_page().await;

        assert_eq!(
            outcome,
            PageOutcome::Loaded {
                appended: 3,
                exhausted: false
            }
        );
        assert_eq!(accumulator.next_page(), 2);
        assert_eq!(gateway.page_fetch_count(), 1);
    }
}
