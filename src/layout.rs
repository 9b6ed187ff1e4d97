//! Per-kind field layouts
//!
//! A layout is the ordered list of fields shown for one resource kind, each
//! either a scalar passed through verbatim or a relation to another kind.
//! The detail aggregator is driven entirely by these tables.

use holonet_core_interface::{Entity, FieldValue, Film, Person, Planet, ResourceKind};
use holonet_core_interface::{Species, Starship, Vehicle};

use FieldSpec as F;
use ResourceKind as K;

/// How a field is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// Verbatim string value
    Scalar,

    /// Single reference, rendered as the related entity's bare name
    One(ResourceKind),

    /// Reference list, rendered as comma-joined names in source order
    Many(ResourceKind),
}

/// One row of a layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Display label
    pub label: &'static str,

    /// Wire name of the field on the entity
    pub key: &'static str,

    pub shape: FieldShape,
}

impl FieldSpec {
    const fn scalar(label: &'static str, key: &'static str) -> Self {
        Self {
            label,
            key,
            shape: FieldShape::Scalar,
        }
    }

    const fn one(label: &'static str, key: &'static str, kind: ResourceKind) -> Self {
        Self {
            label,
            key,
            shape: FieldShape::One(kind),
        }
    }

    const fn many(label: &'static str, key: &'static str, kind: ResourceKind) -> Self {
        Self {
            label,
            key,
            shape: FieldShape::Many(kind),
        }
    }

    pub fn is_relation(&self) -> bool {
        !matches!(self.shape, FieldShape::Scalar)
    }
}

/// Ordered field layout for one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub kind: ResourceKind,
    pub fields: &'static [FieldSpec],
}

impl FieldLayout {
    /// Relation fields in declared order
    pub fn relations(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|spec| spec.is_relation())
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> {
        self.fields.iter().map(|spec| spec.label)
    }

    /// Check every field against an entity of the layout's kind
    ///
    /// Returns the first field whose key is missing or whose shape does not
    /// match what the entity carries.
    pub fn mismatch(&self, entity: &Entity) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|spec| {
            !matches!(
                (spec.shape, entity.field(spec.key)),
                (FieldShape::Scalar, Some(FieldValue::Text(_)))
                    | (FieldShape::One(_), Some(FieldValue::Reference(_)))
                    | (FieldShape::Many(_), Some(FieldValue::References(_)))
            )
        })
    }
}

pub static PERSON_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Person,
    fields: &[
        F::scalar("Name", "name"),
        F::one("Homeworld", "homeworld", K::Planet),
        F::scalar("Birth year", "birth_year"),
        F::many("Species", "species", K::Species),
        F::scalar("Gender", "gender"),
        F::scalar("Height", "height"),
        F::scalar("Mass", "mass"),
        F::scalar("Hair color", "hair_color"),
        F::scalar("Eye color", "eye_color"),
        F::scalar("Skin color", "skin_color"),
        F::many("Films", "films", K::Film),
        F::many("Starships", "starships", K::Starship),
        F::many("Vehicles", "vehicles", K::Vehicle),
    ],
};

pub static FILM_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Film,
    fields: &[
        F::scalar("Title", "title"),
        F::scalar("Episode", "episode_id"),
        F::scalar("Release date", "release_date"),
        F::scalar("Director", "director"),
        F::scalar("Producer", "producer"),
        F::scalar("Opening crawl", "opening_crawl"),
        F::many("Characters", "characters", K::Person),
        F::many("Planets", "planets", K::Planet),
        F::many("Species", "species", K::Species),
        F::many("Starships", "starships", K::Starship),
        F::many("Vehicles", "vehicles", K::Vehicle),
    ],
};

pub static PLANET_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Planet,
    fields: &[
        F::scalar("Name", "name"),
        F::scalar("Rotation period", "rotation_period"),
        F::scalar("Orbital period", "orbital_period"),
        F::scalar("Diameter", "diameter"),
        F::scalar("Climate", "climate"),
        F::scalar("Gravity", "gravity"),
        F::scalar("Terrain", "terrain"),
        F::scalar("Surface water", "surface_water"),
        F::scalar("Population", "population"),
        F::many("Residents", "residents", K::Person),
        F::many("Films", "films", K::Film),
    ],
};

pub static SPECIES_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Species,
    fields: &[
        F::scalar("Name", "name"),
        F::scalar("Classification", "classification"),
        F::scalar("Designation", "designation"),
        F::scalar("Average height", "average_height"),
        F::scalar("Skin colors", "skin_colors"),
        F::scalar("Hair colors", "hair_colors"),
        F::scalar("Eye colors", "eye_colors"),
        F::scalar("Average lifespan", "average_lifespan"),
        F::one("Homeworld", "homeworld", K::Planet),
        F::scalar("Language", "language"),
        F::many("People", "people", K::Person),
        F::many("Films", "films", K::Film),
    ],
};

pub static STARSHIP_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Starship,
    fields: &[
        F::scalar("Name", "name"),
        F::scalar("Model", "model"),
        F::scalar("Class", "starship_class"),
        F::scalar("Manufacturer", "manufacturer"),
        F::scalar("Cost in credits", "cost_in_credits"),
        F::scalar("Length", "length"),
        F::scalar("Hyperdrive rating", "hyperdrive_rating"),
        F::scalar("MGLT", "MGLT"),
        F::scalar("Max atmosphering speed", "max_atmosphering_speed"),
        F::scalar("Crew", "crew"),
        F::scalar("Passengers", "passengers"),
        F::scalar("Cargo capacity", "cargo_capacity"),
        F::scalar("Consumables", "consumables"),
        F::many("Pilots", "pilots", K::Person),
        F::many("Films", "films", K::Film),
    ],
};

pub static VEHICLE_LAYOUT: FieldLayout = FieldLayout {
    kind: K::Vehicle,
    fields: &[
        F::scalar("Name", "name"),
        F::scalar("Model", "model"),
        F::scalar("Class", "vehicle_class"),
        F::scalar("Manufacturer", "manufacturer"),
        F::scalar("Cost in credits", "cost_in_credits"),
        F::scalar("Length", "length"),
        F::scalar("Max atmosphering speed", "max_atmosphering_speed"),
        F::scalar("Crew", "crew"),
        F::scalar("Passengers", "passengers"),
        F::scalar("Cargo capacity", "cargo_capacity"),
        F::scalar("Consumables", "consumables"),
        F::many("Pilots", "pilots", K::Person),
        F::many("Films", "films", K::Film),
    ],
};

/// The layout declared for `kind`
pub fn for_kind(kind: ResourceKind) -> &'static FieldLayout {
    match kind {
        ResourceKind::Film => &FILM_LAYOUT,
        ResourceKind::Person => &PERSON_LAYOUT,
        ResourceKind::Planet => &PLANET_LAYOUT,
        ResourceKind::Species => &SPECIES_LAYOUT,
        ResourceKind::Starship => &STARSHIP_LAYOUT,
        ResourceKind::Vehicle => &VEHICLE_LAYOUT,
    }
}

/// An empty entity of `kind`, used to validate layouts
fn blank(kind: ResourceKind) -> Entity {
    match kind {
        ResourceKind::Film => Film::default().into(),
        ResourceKind::Person => Person::default().into(),
        ResourceKind::Planet => Planet::default().into(),
        ResourceKind::Species => Species::default().into(),
        ResourceKind::Starship => Starship::default().into(),
        ResourceKind::Vehicle => Vehicle::default().into(),
    }
}

/// Check every declared layout against the entity shapes
///
/// Returns `(kind, field key)` for the first mismatch.
pub fn validate_all() -> Option<(ResourceKind, &'static str)> {
    ResourceKind::ALL.into_iter().find_map(|kind| {
        for_kind(kind)
            .mismatch(&blank(kind))
            .map(|spec| (kind, spec.key))
    })
}
