//! Decorative objects anchored to a terrain.

use std::fmt;

use glam::Vec3;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Kind of decorative object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlacedObjectKind {
    #[default]
    Tree,
    Rock,
}

impl PlacedObjectKind {
    /// Numeric code accepted by the file-format boundary.
    pub fn code(self) -> u8 {
        match self {
            PlacedObjectKind::Tree => 0,
            PlacedObjectKind::Rock => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PlacedObjectKind::Tree),
            1 => Some(PlacedObjectKind::Rock),
            _ => None,
        }
    }

    /// Symbolic name written by the original editor ("ROCK_OBJ"
    /// distinguishes the object from the rock surface type).
    pub fn name(self) -> &'static str {
        match self {
            PlacedObjectKind::Tree => "TREE",
            PlacedObjectKind::Rock => "ROCK_OBJ",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "TREE" => Some(PlacedObjectKind::Tree),
            "ROCK_OBJ" => Some(PlacedObjectKind::Rock),
            _ => None,
        }
    }
}

// Legacy records store object kinds as either "TREE"/"ROCK_OBJ" or 0/1.
// Encode writes the name (what the original wrote); decode accepts both.

impl Serialize for PlacedObjectKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

struct KindVisitor;

impl Visitor<'_> for KindVisitor {
    type Value = PlacedObjectKind;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an object kind name or code (0/1)")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<PlacedObjectKind, E> {
        u8::try_from(v)
            .ok()
            .and_then(PlacedObjectKind::from_code)
            .ok_or_else(|| E::custom(format!("unknown object kind code {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<PlacedObjectKind, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(format!("unknown object kind code {v}")))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<PlacedObjectKind, E> {
        PlacedObjectKind::from_name(v).ok_or_else(|| E::custom(format!("unknown object kind {v:?}")))
    }
}

impl<'de> Deserialize<'de> for PlacedObjectKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(KindVisitor)
    }
}

/// Per-kind size descriptor: trees carry an anisotropic box scale, rocks a
/// sphere radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObjectScale {
    Box { x: f32, y: f32, z: f32 },
    Radius(f32),
}

impl ObjectScale {
    /// Default tree scale used when a saved record omits scale fields.
    pub const DEFAULT_TREE: ObjectScale = ObjectScale::Box {
        x: 0.75,
        y: 3.0,
        z: 0.75,
    };
    /// Default rock scale used when a saved record omits scale fields.
    pub const DEFAULT_ROCK: ObjectScale = ObjectScale::Radius(1.0);

    pub fn default_for(kind: PlacedObjectKind) -> Self {
        match kind {
            PlacedObjectKind::Tree => Self::DEFAULT_TREE,
            PlacedObjectKind::Rock => Self::DEFAULT_ROCK,
        }
    }
}

/// A decorative entity owned by exactly one terrain. The position is in the
/// terrain's local space; the terrain offset is applied by the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedObject {
    pub kind: PlacedObjectKind,
    pub position: Vec3,
    pub scale: ObjectScale,
}

/// Scale fields as they appear in a persisted record, any of which may be
/// absent. Per-kind defaults are applied on restore.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialScale {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
    pub radius: Option<f32>,
}

/// A placed-object entry as read from a persisted record. Entries with no
/// kind or position are unusable and are skipped on restore; everything
/// else is recovered via defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedObject {
    pub kind: Option<PlacedObjectKind>,
    pub position: Option<Vec3>,
    pub scale: PartialScale,
}
