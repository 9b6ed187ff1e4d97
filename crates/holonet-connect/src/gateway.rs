//! HttpGateway: ResourceGateway implementation over the public REST catalog

use async_trait::async_trait;
use holonet_core_interface::{
    Entity, Film, GatewayError, Page, PageEnvelope, Person, Planet, ResourceGateway, ResourceKind,
    Result, Species, Starship, Vehicle,
};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::ConnectError;

pub const DEFAULT_BASE_URL: &str = "https://swapi.dev/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_USER_AGENT: &str = concat!("holonet/", env!("CARGO_PKG_VERSION"));

const FIRST_PAGE: u32 = 1;

/// Connection settings for [`HttpGateway`]
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Catalog root, e.g. `https://swapi.dev/api` (a trailing slash is tolerated)
    pub base_url: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Value of the `User-Agent` header
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// A [`ResourceGateway`] that talks to the catalog over HTTP.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```rust,no_run
/// use holonet_connect::{GatewayConfig, HttpGateway};
/// use holonet_core_interface::{ResourceGateway, ResourceKind};
///
/// # async fn example() -> anyhow::Result<()> {
/// let gateway = HttpGateway::new(GatewayConfig::default())?;
/// let luke = gateway.fetch_by_id(ResourceKind::Person, 1).await?;
/// println!("{}", luke.display_name());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> std::result::Result<Self, ConnectError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ConnectError::InvalidBaseUrl(config.base_url));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Canonical entity URL: `{base}/{kind-plural}/{id}/`
    pub fn entity_url(&self, kind: ResourceKind, id: u32) -> String {
        format!("{}/{}/{}/", self.base_url, kind.path_segment(), id)
    }

    /// Canonical page URL: `{base}/{kind-plural}/?page={n}`
    pub fn page_url(&self, kind: ResourceKind, page: u32) -> String {
        format!("{}/{}/?page={}", self.base_url, kind.path_segment(), page)
    }

    /// Collection root without a page cursor
    pub fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}/", self.base_url, kind.path_segment())
    }

    /// GET `url`, returning the status and raw body
    async fn get(&self, url: &str) -> std::result::Result<(StatusCode, Vec<u8>), ConnectError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok((status, body.to_vec()))
    }

    async fn get_page(&self, kind: ResourceKind, page: u32, url: String) -> Result<Page> {
        let (status, body) = self.get(&url).await.map_err(GatewayError::from)?;

        match classify_listing(status, page, &url)? {
            Listing::Body => decode_page(kind, &body).map_err(GatewayError::from),
            Listing::PastEnd => {
                debug!("{} is past the end of the {} collection", url, kind);
                Ok(Page::default())
            }
        }
    }
}

/// How a listing response is consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listing {
    Body,
    PastEnd,
}

/// Map a listing status to how its body is used
///
/// The catalog answers 404 for pages past the end of a collection. The first
/// page always exists, so a 404 there means a wrong base URL or kind and is
/// reported like any other non-2xx status.
fn classify_listing(
    status: StatusCode,
    page: u32,
    url: &str,
) -> std::result::Result<Listing, ConnectError> {
    if status.is_success() {
        return Ok(Listing::Body);
    }
    if status == StatusCode::NOT_FOUND && page > FIRST_PAGE {
        return Ok(Listing::PastEnd);
    }
    Err(ConnectError::Status {
        status: status.as_u16(),
        url: url.to_string(),
    })
}

#[async_trait]
impl ResourceGateway for HttpGateway {
    async fn fetch_by_id(&self, kind: ResourceKind, id: u32) -> Result<Entity> {
        let url = self.entity_url(kind, id);
        let (status, body) = self.get(&url).await.map_err(GatewayError::from)?;

        if status == StatusCode::NOT_FOUND {
            return Err(ConnectError::NotFound { kind, id }.into());
        }
        if !status.is_success() {
            return Err(ConnectError::Status {
                status: status.as_u16(),
                url,
            }
            .into());
        }

        decode_entity(kind, &body).map_err(GatewayError::from)
    }

    async fn fetch_page(&self, kind: ResourceKind, page: u32) -> Result<Page> {
        self.get_page(kind, page, self.page_url(kind, page)).await
    }

    async fn fetch_all_people_first_page(&self) -> Result<Page> {
        let url = self.collection_url(ResourceKind::Person);
        self.get_page(ResourceKind::Person, FIRST_PAGE, url).await
    }
}

fn decode<T: DeserializeOwned>(
    kind: ResourceKind,
    body: &[u8],
) -> std::result::Result<T, ConnectError> {
    serde_json::from_slice(body).map_err(|source| ConnectError::Decode { kind, source })
}

/// Decode a single record payload of `kind`
pub fn decode_entity(kind: ResourceKind, body: &[u8]) -> std::result::Result<Entity, ConnectError> {
    let entity = match kind {
        ResourceKind::Film => Entity::Film(decode::<Film>(kind, body)?),
        ResourceKind::Person => Entity::Person(decode::<Person>(kind, body)?),
        ResourceKind::Planet => Entity::Planet(decode::<Planet>(kind, body)?),
        ResourceKind::Species => Entity::Species(decode::<Species>(kind, body)?),
        ResourceKind::Starship => Entity::Starship(decode::<Starship>(kind, body)?),
        ResourceKind::Vehicle => Entity::Vehicle(decode::<Vehicle>(kind, body)?),
    };
    Ok(entity)
}

/// Decode a listing payload of `kind`
pub fn decode_page(kind: ResourceKind, body: &[u8]) -> std::result::Result<Page, ConnectError> {
    let page = match kind {
        ResourceKind::Film => decode::<PageEnvelope<Film>>(kind, body)?.into(),
        ResourceKind::Person => decode::<PageEnvelope<Person>>(kind, body)?.into(),
        ResourceKind::Planet => decode::<PageEnvelope<Planet>>(kind, body)?.into(),
        ResourceKind::Species => decode::<PageEnvelope<Species>>(kind, body)?.into(),
        ResourceKind::Starship => decode::<PageEnvelope<Starship>>(kind, body)?.into(),
        ResourceKind::Vehicle => decode::<PageEnvelope<Vehicle>>(kind, body)?.into(),
    };
    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> HttpGateway {
        HttpGateway::new(GatewayConfig {
            base_url: base.to_string(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_canonical_urls() {
        let gw = gateway("https://swapi.dev/api/");
        assert_eq!(gw.base_url(), "https://swapi.dev/api");
        assert_eq!(
            gw.entity_url(ResourceKind::Person, 1),
            "https://swapi.dev/api/people/1/"
        );
        assert_eq!(
            gw.page_url(ResourceKind::Starship, 3),
            "https://swapi.dev/api/starships/?page=3"
        );
        assert_eq!(
            gw.collection_url(ResourceKind::Person),
            "https://swapi.dev/api/people/"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        let result = HttpGateway::new(GatewayConfig {
            base_url: "swapi.dev/api".to_string(),
            ..Default::default()
        });
        assert!(matches!(result, Err(ConnectError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_decode_person() {
        let body = br#"{
            "name": "Luke Skywalker",
            "height": "172",
            "mass": "77",
            "hair_color": "blond",
            "skin_color": "fair",
            "eye_color": "blue",
            "birth_year": "19BBY",
            "gender": "male",
            "homeworld": "https://swapi.dev/api/planets/1/",
            "films": ["https://swapi.dev/api/films/1/", "https://swapi.dev/api/films/2/"],
            "species": [],
            "vehicles": ["https://swapi.dev/api/vehicles/14/"],
            "starships": ["https://swapi.dev/api/starships/12/"],
            "created": "2014-12-09T13:50:51.644000Z",
            "edited": "2014-12-20T21:17:56.891000Z",
            "url": "https://swapi.dev/api/people/1/"
        }"#;

        let entity = decode_entity(ResourceKind::Person, body).unwrap();
        assert_eq!(entity.kind(), ResourceKind::Person);
        assert_eq!(entity.display_name(), "Luke Skywalker");
        match entity {
            Entity::Person(p) => {
                assert_eq!(p.birth_year, "19BBY");
                assert_eq!(p.homeworld.as_deref(), Some("https://swapi.dev/api/planets/1/"));
                assert_eq!(p.films.len(), 2);
            }
            other => panic!("decoded wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_decode_starship_page() {
        let body = br#"{
            "count": 36,
            "next": "https://swapi.dev/api/starships/?page=2",
            "previous": null,
            "results": [
                {
                    "name": "CR90 corvette",
                    "model": "CR90 corvette",
                    "hyperdrive_rating": "2.0",
                    "MGLT": "60",
                    "starship_class": "corvette",
                    "pilots": [],
                    "films": ["https://swapi.dev/api/films/1/"],
                    "url": "https://swapi.dev/api/starships/2/"
                }
            ]
        }"#;

        let page = decode_page(ResourceKind::Starship, body).unwrap();
        assert_eq!(page.count, Some(36));
        assert_eq!(page.next.as_deref(), Some("https://swapi.dev/api/starships/?page=2"));
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].url(), "https://swapi.dev/api/starships/2/");
    }

    #[test]
    fn test_missing_first_page_is_a_failure() {
        let url = "http://localhost/wrong-root/people/?page=1";
        let err = classify_listing(StatusCode::NOT_FOUND, 1, url).unwrap_err();
        assert!(matches!(err, ConnectError::Status { status: 404, .. }));
    }

    #[test]
    fn test_listing_status_classification() {
        let url = "https://swapi.dev/api/people/?page=10";
        assert_eq!(classify_listing(StatusCode::OK, 1, url).unwrap(), Listing::Body);
        assert_eq!(
            classify_listing(StatusCode::NOT_FOUND, 10, url).unwrap(),
            Listing::PastEnd
        );
        assert!(matches!(
            classify_listing(StatusCode::INTERNAL_SERVER_ERROR, 2, url),
            Err(ConnectError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_decode_failure_is_reported() {
        let err = decode_entity(ResourceKind::Film, b"<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, ConnectError::Decode { kind: ResourceKind::Film, .. }));
    }
}
