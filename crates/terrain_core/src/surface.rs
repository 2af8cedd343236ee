//! Per-vertex surface classification.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Discrete surface category assigned to every heightfield vertex.
///
/// Drives both the derived display color and object placement eligibility.
/// `Lava` and `Gravel` are reachable only through the paint tool; initial
/// generation classifies strictly by height thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SurfaceType {
    #[default]
    Grass,
    Sand,
    Rock,
    Snow,
    Lava,
    Gravel,
}

impl SurfaceType {
    /// All variants in legacy-code order.
    pub const ALL: [SurfaceType; 6] = [
        SurfaceType::Grass,
        SurfaceType::Sand,
        SurfaceType::Rock,
        SurfaceType::Snow,
        SurfaceType::Lava,
        SurfaceType::Gravel,
    ];

    /// Numeric code used by the persisted file format.
    pub fn code(self) -> u8 {
        match self {
            SurfaceType::Grass => 0,
            SurfaceType::Sand => 1,
            SurfaceType::Rock => 2,
            SurfaceType::Snow => 3,
            SurfaceType::Lava => 4,
            SurfaceType::Gravel => 5,
        }
    }

    /// Decode a numeric file-format code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Symbolic name as it appears in legacy records and tool state.
    pub fn name(self) -> &'static str {
        match self {
            SurfaceType::Grass => "GRASS",
            SurfaceType::Sand => "SAND",
            SurfaceType::Rock => "ROCK",
            SurfaceType::Snow => "SNOW",
            SurfaceType::Lava => "LAVA",
            SurfaceType::Gravel => "GRAVEL",
        }
    }

    /// Decode a symbolic name (legacy records store either form).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Display color in linear RGB. Derived, never persisted.
    pub fn color(self) -> [f32; 3] {
        match self {
            SurfaceType::Grass => rgb(0x559955),
            SurfaceType::Sand => rgb(0xC2B280),
            SurfaceType::Rock => rgb(0x888888),
            SurfaceType::Snow => rgb(0xFFFFFF),
            SurfaceType::Lava => rgb(0xFF4500),
            SurfaceType::Gravel => rgb(0xA9A9A9),
        }
    }
}

fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

// File-format boundary: legacy records store surface types interchangeably
// as small integers or upper-case names. Encode writes the numeric code
// (what the original editor wrote); decode accepts both.

impl Serialize for SurfaceType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

struct SurfaceTypeVisitor;

impl Visitor<'_> for SurfaceTypeVisitor {
    type Value = SurfaceType;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a surface type code (0-5) or name")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<SurfaceType, E> {
        u8::try_from(v)
            .ok()
            .and_then(SurfaceType::from_code)
            .ok_or_else(|| E::custom(format!("unknown surface type code {v}")))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<SurfaceType, E> {
        u64::try_from(v)
            .map_err(|_| E::custom(format!("unknown surface type code {v}")))
            .and_then(|v| self.visit_u64(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<SurfaceType, E> {
        SurfaceType::from_name(v).ok_or_else(|| E::custom(format!("unknown surface type {v:?}")))
    }
}

impl<'de> Deserialize<'de> for SurfaceType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SurfaceTypeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for t in SurfaceType::ALL {
            assert_eq!(SurfaceType::from_code(t.code()), Some(t));
            assert_eq!(SurfaceType::from_name(t.name()), Some(t));
        }
        assert_eq!(SurfaceType::from_code(6), None);
        assert_eq!(SurfaceType::from_name("MUD"), None);
    }

    #[test]
    fn palette_matches_legacy() {
        assert_eq!(SurfaceType::Sand.color(), rgb(0xC2B280));
        assert_eq!(SurfaceType::Snow.color(), [1.0, 1.0, 1.0]);
    }
}
