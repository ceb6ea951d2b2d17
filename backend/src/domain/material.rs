//! Recyclable material categories and their static policy table.
//!
//! Every figure the scoring and impact code needs per material lives here:
//! the points earned per kilogram, how long the material takes to decompose,
//! and the environmental savings recycling one kilogram is credited with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Material category of a disposal.
///
/// The wire form is the upper-case name. Parsing is exact: `"glass"` and
/// `" GLASS"` are rejected.
///
/// # Examples
/// ```
/// use backend::domain::MaterialType;
///
/// let material: MaterialType = "METAL".parse().unwrap();
/// assert_eq!(material.base_rate(), 20);
/// assert!("metal".parse::<MaterialType>().is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialType {
    Plastic,
    Glass,
    Paper,
    Metal,
    Organic,
    Electronic,
}

/// Environmental savings credited per kilogram recycled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFactors {
    pub co2_kg: f64,
    pub water_litres: f64,
    pub energy_kwh: f64,
}

impl MaterialType {
    /// Every material in the canonical order used for summation and output.
    pub const ALL: [Self; 6] = [
        Self::Plastic,
        Self::Glass,
        Self::Paper,
        Self::Metal,
        Self::Organic,
        Self::Electronic,
    ];

    /// Upper-case wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Plastic => "PLASTIC",
            Self::Glass => "GLASS",
            Self::Paper => "PAPER",
            Self::Metal => "METAL",
            Self::Organic => "ORGANIC",
            Self::Electronic => "ELECTRONIC",
        }
    }

    /// Points awarded per kilogram.
    pub fn base_rate(self) -> u32 {
        match self {
            Self::Plastic => 10,
            Self::Glass => 15,
            Self::Paper => 5,
            Self::Metal => 20,
            Self::Organic => 3,
            Self::Electronic => 25,
        }
    }

    /// Approximate months the material takes to decompose in a landfill.
    pub fn decomposition_months(self) -> u32 {
        match self {
            Self::Plastic => 5_400,
            Self::Glass => 48_000,
            Self::Paper => 6,
            Self::Metal => 2_400,
            Self::Organic => 3,
            Self::Electronic => 12_000,
        }
    }

    pub fn impact_factors(self) -> ImpactFactors {
        let (co2_kg, water_litres, energy_kwh) = match self {
            Self::Plastic => (1.5, 17.0, 5.8),
            Self::Glass => (0.3, 2.5, 0.7),
            Self::Paper => (0.9, 26.0, 4.1),
            Self::Metal => (4.0, 40.0, 14.0),
            Self::Organic => (0.5, 0.0, 0.2),
            Self::Electronic => (2.0, 50.0, 10.0),
        };
        ImpactFactors {
            co2_kg,
            water_litres,
            energy_kwh,
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a string does not name a known material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown material type: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialType {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|material| material.as_str() == s)
            .ok_or_else(|| UnknownMaterial(s.to_owned()))
    }
}
