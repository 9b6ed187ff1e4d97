//! Typed catalog records
//!
//! Scalar fields are carried as the verbatim strings the catalog publishes
//! ("unknown", "n/a", "1,000" and friends included). Relation fields hold the
//! canonical reference URLs exactly as received; decoding them into ids is the
//! caller's business.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::kind::ResourceKind;

/// A film record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Film {
    pub title: String,
    #[serde(deserialize_with = "string_or_number")]
    pub episode_id: String,
    #[serde(default)]
    pub opening_crawl: String,
    #[serde(default)]
    pub director: String,
    #[serde(default)]
    pub producer: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub planets: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    pub url: String,
}

/// A person (character) record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub height: String,
    #[serde(default)]
    pub mass: String,
    #[serde(default)]
    pub hair_color: String,
    #[serde(default)]
    pub skin_color: String,
    #[serde(default)]
    pub eye_color: String,
    #[serde(default)]
    pub birth_year: String,
    #[serde(default)]
    pub gender: String,
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default)]
    pub films: Vec<String>,
    #[serde(default)]
    pub species: Vec<String>,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub starships: Vec<String>,
    pub url: String,
}

/// A planet record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    #[serde(default)]
    pub rotation_period: String,
    #[serde(default)]
    pub orbital_period: String,
    #[serde(default)]
    pub diameter: String,
    #[serde(default)]
    pub climate: String,
    #[serde(default)]
    pub gravity: String,
    #[serde(default)]
    pub terrain: String,
    #[serde(default)]
    pub surface_water: String,
    #[serde(default)]
    pub population: String,
    #[serde(default)]
    pub residents: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

/// A species record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub name: String,
    #[serde(default)]
    pub classification: String,
    #[serde(default)]
    pub designation: String,
    #[serde(default)]
    pub average_height: String,
    #[serde(default)]
    pub skin_colors: String,
    #[serde(default)]
    pub hair_colors: String,
    #[serde(default)]
    pub eye_colors: String,
    #[serde(default)]
    pub average_lifespan: String,
    /// Several species have no known homeworld (`null` on the wire)
    #[serde(default)]
    pub homeworld: Option<String>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub people: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

/// A starship record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Starship {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub starship_class: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub cost_in_credits: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub hyperdrive_rating: String,
    #[serde(rename = "MGLT", default)]
    pub mglt: String,
    #[serde(default)]
    pub max_atmosphering_speed: String,
    #[serde(default)]
    pub crew: String,
    #[serde(default)]
    pub passengers: String,
    #[serde(default)]
    pub cargo_capacity: String,
    #[serde(default)]
    pub consumables: String,
    #[serde(default)]
    pub pilots: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

/// A vehicle record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    pub name: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub vehicle_class: String,
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub cost_in_credits: String,
    #[serde(default)]
    pub length: String,
    #[serde(default)]
    pub max_atmosphering_speed: String,
    #[serde(default)]
    pub crew: String,
    #[serde(default)]
    pub passengers: String,
    #[serde(default)]
    pub cargo_capacity: String,
    #[serde(default)]
    pub consumables: String,
    #[serde(default)]
    pub pilots: Vec<String>,
    #[serde(default)]
    pub films: Vec<String>,
    pub url: String,
}

/// Borrowed view of one field of an entity, looked up by wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Scalar value, passed through verbatim
    Text(&'a str),

    /// Single optional reference URL (e.g. `homeworld`)
    Reference(Option<&'a str>),

    /// Ordered list of reference URLs
    References(&'a [String]),
}

/// A decoded record of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entity {
    Film(Film),
    Person(Person),
    Planet(Planet),
    Species(Species),
    Starship(Starship),
    Vehicle(Vehicle),
}

impl Entity {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Entity::Film(_) => ResourceKind::Film,
            Entity::Person(_) => ResourceKind::Person,
            Entity::Planet(_) => ResourceKind::Planet,
            Entity::Species(_) => ResourceKind::Species,
            Entity::Starship(_) => ResourceKind::Starship,
            Entity::Vehicle(_) => ResourceKind::Vehicle,
        }
    }

    /// Human-readable name: `title` for films, `name` for everything else
    pub fn display_name(&self) -> &str {
        match self {
            Entity::Film(f) => &f.title,
            Entity::Person(p) => &p.name,
            Entity::Planet(p) => &p.name,
            Entity::Species(s) => &s.name,
            Entity::Starship(s) => &s.name,
            Entity::Vehicle(v) => &v.name,
        }
    }

    /// Canonical URL of this record
    pub fn url(&self) -> &str {
        match self {
            Entity::Film(f) => &f.url,
            Entity::Person(p) => &p.url,
            Entity::Planet(p) => &p.url,
            Entity::Species(s) => &s.url,
            Entity::Starship(s) => &s.url,
            Entity::Vehicle(v) => &v.url,
        }
    }

    /// Look up a field by its wire name
    ///
    /// Returns `None` when the kind has no such field.
    pub fn field(&self, key: &str) -> Option<FieldValue<'_>> {
        use FieldValue::{Reference, References, Text};

        let value = match self {
            Entity::Film(f) => match key {
                "title" => Text(&f.title),
                "episode_id" => Text(&f.episode_id),
                "opening_crawl" => Text(&f.opening_crawl),
                "director" => Text(&f.director),
                "producer" => Text(&f.producer),
                "release_date" => Text(&f.release_date),
                "characters" => References(&f.characters),
                "planets" => References(&f.planets),
                "starships" => References(&f.starships),
                "vehicles" => References(&f.vehicles),
                "species" => References(&f.species),
                "url" => Text(&f.url),
                _ => return None,
            },
            Entity::Person(p) => match key {
                "name" => Text(&p.name),
                "height" => Text(&p.height),
                "mass" => Text(&p.mass),
                "hair_color" => Text(&p.hair_color),
                "skin_color" => Text(&p.skin_color),
                "eye_color" => Text(&p.eye_color),
                "birth_year" => Text(&p.birth_year),
                "gender" => Text(&p.gender),
                "homeworld" => Reference(p.homeworld.as_deref()),
                "films" => References(&p.films),
                "species" => References(&p.species),
                "vehicles" => References(&p.vehicles),
                "starships" => References(&p.starships),
                "url" => Text(&p.url),
                _ => return None,
            },
            Entity::Planet(p) => match key {
                "name" => Text(&p.name),
                "rotation_period" => Text(&p.rotation_period),
                "orbital_period" => Text(&p.orbital_period),
                "diameter" => Text(&p.diameter),
                "climate" => Text(&p.climate),
                "gravity" => Text(&p.gravity),
                "terrain" => Text(&p.terrain),
                "surface_water" => Text(&p.surface_water),
                "population" => Text(&p.population),
                "residents" => References(&p.residents),
                "films" => References(&p.films),
                "url" => Text(&p.url),
                _ => return None,
            },
            Entity::Species(s) => match key {
                "name" => Text(&s.name),
                "classification" => Text(&s.classification),
                "designation" => Text(&s.designation),
                "average_height" => Text(&s.average_height),
                "skin_colors" => Text(&s.skin_colors),
                "hair_colors" => Text(&s.hair_colors),
                "eye_colors" => Text(&s.eye_colors),
                "average_lifespan" => Text(&s.average_lifespan),
                "homeworld" => Reference(s.homeworld.as_deref()),
                "language" => Text(&s.language),
                "people" => References(&s.people),
                "films" => References(&s.films),
                "url" => Text(&s.url),
                _ => return None,
            },
            Entity::Starship(s) => match key {
                "name" => Text(&s.name),
                "model" => Text(&s.model),
                "starship_class" => Text(&s.starship_class),
                "manufacturer" => Text(&s.manufacturer),
                "cost_in_credits" => Text(&s.cost_in_credits),
                "length" => Text(&s.length),
                "hyperdrive_rating" => Text(&s.hyperdrive_rating),
                "MGLT" => Text(&s.mglt),
                "max_atmosphering_speed" => Text(&s.max_atmosphering_speed),
                "crew" => Text(&s.crew),
                "passengers" => Text(&s.passengers),
                "cargo_capacity" => Text(&s.cargo_capacity),
                "consumables" => Text(&s.consumables),
                "pilots" => References(&s.pilots),
                "films" => References(&s.films),
                "url" => Text(&s.url),
                _ => return None,
            },
            Entity::Vehicle(v) => match key {
                "name" => Text(&v.name),
                "model" => Text(&v.model),
                "vehicle_class" => Text(&v.vehicle_class),
                "manufacturer" => Text(&v.manufacturer),
                "cost_in_credits" => Text(&v.cost_in_credits),
                "length" => Text(&v.length),
                "max_atmosphering_speed" => Text(&v.max_atmosphering_speed),
                "crew" => Text(&v.crew),
                "passengers" => Text(&v.passengers),
                "cargo_capacity" => Text(&v.cargo_capacity),
                "consumables" => Text(&v.consumables),
                "pilots" => References(&v.pilots),
                "films" => References(&v.films),
                "url" => Text(&v.url),
                _ => return None,
            },
        };

        Some(value)
    }
}

impl From<Film> for Entity {
    fn from(value: Film) -> Self {
        Entity::Film(value)
    }
}

impl From<Person> for Entity {
    fn from(value: Person) -> Self {
        Entity::Person(value)
    }
}

impl From<Planet> for Entity {
    fn from(value: Planet) -> Self {
        Entity::Planet(value)
    }
}

impl From<Species> for Entity {
    fn from(value: Species) -> Self {
        Entity::Species(value)
    }
}

impl From<Starship> for Entity {
    fn from(value: Starship) -> Self {
        Entity::Starship(value)
    }
}

impl From<Vehicle> for Entity {
    fn from(value: Vehicle) -> Self {
        Entity::Vehicle(value)
    }
}

/// One page of a collection listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Total number of records in the collection, when the server reports it
    pub count: Option<u64>,

    /// Cursor URL of the following page; `None` once the collection is exhausted
    pub next: Option<String>,

    /// Cursor URL of the preceding page
    pub previous: Option<String>,

    /// Records in server order
    pub results: Vec<Entity>,
}

impl Page {
    /// A page with results and an optional next cursor
    pub fn new(results: Vec<Entity>, next: Option<String>) -> Self {
        Self {
            count: None,
            next,
            previous: None,
            results,
        }
    }

    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }
}

/// Wire shape of a listing response, before the results are wrapped as [`Entity`]
#[derive(Debug, Clone, Deserialize)]
pub struct PageEnvelope<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

impl<T: Into<Entity>> From<PageEnvelope<T>> for Page {
    fn from(envelope: PageEnvelope<T>) -> Self {
        Page {
            count: envelope.count,
            next: envelope.next,
            previous: envelope.previous,
            results: envelope.results.into_iter().map(Into::into).collect(),
        }
    }
}

/// Accept a JSON string or number and keep it as its decimal text
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct Verbatim;

    impl<'de> serde::de::Visitor<'de> for Verbatim {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: serde::de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(Verbatim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_film_episode_accepts_number() {
        let json = r#"{
            "title": "A New Hope",
            "episode_id": 4,
            "director": "George Lucas",
            "characters": ["https://swapi.dev/api/people/1/"],
            "url": "https://swapi.dev/api/films/1/"
        }"#;

        let film: Film = serde_json::from_str(json).unwrap();
        assert_eq!(film.episode_id, "4");
        assert_eq!(film.characters.len(), 1);
        assert!(film.planets.is_empty());
    }

    #[test]
    fn test_species_null_homeworld() {
        let json = r#"{
            "name": "Droid",
            "homeworld": null,
            "people": [],
            "url": "https://swapi.dev/api/species/2/"
        }"#;

        let species: Species = serde_json::from_str(json).unwrap();
        let entity = Entity::from(species);
        assert_eq!(entity.field("homeworld"), Some(FieldValue::Reference(None)));
    }

    #[test]
    fn test_entity_field_lookup() {
        let entity = Entity::Starship(Starship {
            name: "X-wing".to_string(),
            mglt: "100".to_string(),
            url: "https://swapi.dev/api/starships/12/".to_string(),
            ..Default::default()
        });

        assert_eq!(entity.kind(), ResourceKind::Starship);
        assert_eq!(entity.display_name(), "X-wing");
        assert_eq!(entity.field("MGLT"), Some(FieldValue::Text("100")));
        assert_eq!(entity.field("pilots"), Some(FieldValue::References(&[])));
        assert_eq!(entity.field("vehicle_class"), None);
    }

    #[test]
    fn test_film_display_name_is_title() {
        let entity = Entity::from(Film {
            title: "The Empire Strikes Back".to_string(),
            ..Default::default()
        });
        assert_eq!(entity.display_name(), "The Empire Strikes Back");
    }

    #[test]
    fn test_page_envelope_conversion() {
        let json = r#"{
            "count": 82,
            "next": "https://swapi.dev/api/people/?page=2",
            "previous": null,
            "results": [
                {"name": "Luke Skywalker", "url": "https://swapi.dev/api/people/1/"}
            ]
        }"#;

        let envelope: PageEnvelope<Person> = serde_json::from_str(json).unwrap();
        let page = Page::from(envelope);
        assert_eq!(page.count, Some(82));
        assert!(!page.is_last());
        assert_eq!(page.results[0].display_name(), "Luke Skywalker");
    }
}
