//! URL Reference Codec
//!
//! Decodes canonical catalog URLs into the numbers the gateway needs:
//!
//! - entity references `<scheme>://<host>/api/<kind>/<digits>/` yield the id
//! - listing cursors `<scheme>://<host>/api/<kind>/?page=<digits>` yield the page
//!
//! Pure functions; no I/O.

use holonet_core_interface::ResourceKind;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{HolonetError, Result};

/// Pattern an entity reference must match
pub const REFERENCE_PATTERN: &str = "<scheme>://<host>/api/<kind>/<id>/";

/// Pattern a listing cursor must match
pub const CURSOR_PATTERN: &str = "<scheme>://<host>/api/<kind>/?page=<n>";

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#\s]+/api/([a-z]+)/([0-9]+)/$")
        .expect("reference pattern is valid")
});

static CURSOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://[^/?#\s]+/api/([a-z]+)/\?(?:[^#]*&)?page=([0-9]+)(?:&[^#]*)?$")
        .expect("cursor pattern is valid")
});

/// A decoded entity reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// Plural path segment, e.g. `people`
    pub segment: String,
    pub id: u32,
}

/// Decode an entity reference into its kind segment and id
pub fn parse_reference(url: &str) -> Result<EntityRef> {
    let captures = REFERENCE_RE
        .captures(url.trim())
        .ok_or_else(|| malformed(url, REFERENCE_PATTERN))?;

    let id = positive(&captures[2]).ok_or_else(|| malformed(url, REFERENCE_PATTERN))?;

    Ok(EntityRef {
        segment: captures[1].to_string(),
        id,
    })
}

/// Extract the numeric id from a canonical entity URL
///
/// ```
/// use holonet::codec::extract_id;
///
/// assert_eq!(extract_id("https://swapi.dev/api/people/7/").unwrap(), 7);
/// assert!(extract_id("not a url").is_err());
/// ```
pub fn extract_id(url: &str) -> Result<u32> {
    parse_reference(url).map(|r| r.id)
}

/// Extract the id from a reference that must point at `kind`
///
/// A well-formed URL naming another collection is rejected as malformed.
pub fn extract_id_of(url: &str, kind: ResourceKind) -> Result<u32> {
    let reference = parse_reference(url)?;
    match ResourceKind::from_path_segment(&reference.segment) {
        Some(found) if found == kind => Ok(reference.id),
        _ => Err(malformed(url, kind_pattern(kind))),
    }
}

fn kind_pattern(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Film => "<scheme>://<host>/api/films/<id>/",
        ResourceKind::Person => "<scheme>://<host>/api/people/<id>/",
        ResourceKind::Planet => "<scheme>://<host>/api/planets/<id>/",
        ResourceKind::Species => "<scheme>://<host>/api/species/<id>/",
        ResourceKind::Starship => "<scheme>://<host>/api/starships/<id>/",
        ResourceKind::Vehicle => "<scheme>://<host>/api/vehicles/<id>/",
    }
}

/// Extract the `page` query parameter from a listing cursor URL
pub fn extract_page_number(next_url: &str) -> Result<u32> {
    let captures = CURSOR_RE
        .captures(next_url.trim())
        .ok_or_else(|| malformed(next_url, CURSOR_PATTERN))?;

    positive(&captures[2]).ok_or_else(|| malformed(next_url, CURSOR_PATTERN))
}

/// Parse a digit run as a strictly positive id; overflow and zero are rejected
fn positive(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|n| *n >= 1)
}

fn malformed(value: &str, expected: &'static str) -> HolonetError {
    HolonetError::MalformedReference {
        value: value.to_string(),
        expected,
    }
}
