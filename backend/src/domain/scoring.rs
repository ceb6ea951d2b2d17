//! Points earned for a single disposal.
//!
//! Scoring is pure: the same material and weight always yield the same
//! points, and invalid input is rejected before anything is persisted.

use std::fmt;

use crate::domain::MaterialType;

/// Upper bound, inclusive, on the weight of a single disposal.
pub const MAX_WEIGHT_KG: f64 = 1_000.0;

/// Reasons a disposal request is rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum DisposalValidationError {
    /// The material string names none of the known categories.
    UnknownMaterial { value: String },
    /// The weight is not finite or lies outside `(0, 1000]`.
    WeightOutOfRange { value: f64 },
}

impl DisposalValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnknownMaterial { .. } => "materialType",
            Self::WeightOutOfRange { .. } => "weightKg",
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownMaterial { .. } => "invalid_material_type",
            Self::WeightOutOfRange { .. } => "weight_out_of_range",
        }
    }
}

impl fmt::Display for DisposalValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMaterial { value } => write!(
                f,
                "materialType must be one of PLASTIC, GLASS, PAPER, METAL, ORGANIC, ELECTRONIC (got {value:?})"
            ),
            Self::WeightOutOfRange { value } => write!(
                f,
                "weightKg must be greater than 0 and at most {MAX_WEIGHT_KG} (got {value})"
            ),
        }
    }
}

impl std::error::Error for DisposalValidationError {}

/// Validated disposal weight in kilograms, within `(0, 1000]`.
///
/// # Examples
/// ```
/// use backend::domain::Weight;
///
/// assert!(Weight::new(1_000.0).is_ok());
/// assert!(Weight::new(0.0).is_err());
/// assert!(Weight::new(f64::NAN).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Weight(f64);

impl Weight {
    pub fn new(kg: f64) -> Result<Self, DisposalValidationError> {
        if kg.is_finite() && kg > 0.0 && kg <= MAX_WEIGHT_KG {
            Ok(Self(kg))
        } else {
            Err(DisposalValidationError::WeightOutOfRange { value: kg })
        }
    }

    pub fn kg(self) -> f64 {
        self.0
    }
}

/// Points for recycling `weight` of `material`.
///
/// Multiplies the material's base rate by the weight and rounds half away
/// from zero.
///
/// # Examples
/// ```
/// use backend::domain::{compute_points, MaterialType, Weight};
///
/// let points = compute_points(MaterialType::Metal, Weight::new(2.0).unwrap());
/// assert_eq!(points, 40);
/// ```
pub fn compute_points(material: MaterialType, weight: Weight) -> u32 {
    let raw = (f64::from(material.base_rate()) * weight.kg()).round();
    // Bounded by 25 points/kg * 1000 kg.
    raw as u32
}

/// A validated disposal request together with its points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDisposal {
    pub material: MaterialType,
    pub weight: Weight,
    pub points: u32,
}

/// Validate raw request values and score them.
///
/// The material is checked before the weight, so a request with both wrong
/// reports `materialType`.
pub fn score_disposal(
    material: &str,
    weight_kg: f64,
) -> Result<ScoredDisposal, DisposalValidationError> {
    let material = material
        .parse::<MaterialType>()
        .map_err(|err| DisposalValidationError::UnknownMaterial { value: err.0 })?;
    let weight = Weight::new(weight_kg)?;
    Ok(ScoredDisposal {
        material,
        weight,
        points: compute_points(material, weight),
    })
}
