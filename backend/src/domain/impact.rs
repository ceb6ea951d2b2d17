//! Environmental impact projections.
//!
//! The global aggregate is a projection derived entirely from the disposal
//! and user tables. It can be thrown away and recomputed at any time; two
//! recomputations over the same data produce identical figures because the
//! weights are summed in the fixed [`MaterialType::ALL`] order.
//!
//! Per-user summaries use the per-material factors from the policy table,
//! while the global aggregate credits a flat [`GLOBAL_CO2_KG_PER_KG`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::MaterialType;

/// Identifier of the singleton aggregate row.
pub const AGGREGATE_ID: &str = "global";

/// CO2 credited per kilogram of any material in the global aggregate.
pub const GLOBAL_CO2_KG_PER_KG: f64 = 2.5;

/// Raw figures read from storage in one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactInputs {
    /// Summed disposal weight for each material that has any disposals.
    pub weight_by_material: BTreeMap<MaterialType, f64>,
    /// Number of users.
    pub active_users: u64,
    /// Sum of every user's current points total.
    pub total_points: i64,
}

/// Global figures derived from [`ImpactInputs`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactProjection {
    /// Weight per material. Every material is present, zero when unused.
    pub total_weight_per_material: BTreeMap<MaterialType, f64>,
    pub co2_reduction: f64,
    pub active_users: u64,
    pub total_points: i64,
}

impl ImpactProjection {
    /// Projection over no data at all.
    pub fn empty() -> Self {
        Self::from_inputs(&ImpactInputs::default())
    }

    /// Derive the projection.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{ImpactInputs, ImpactProjection, MaterialType};
    ///
    /// let mut inputs = ImpactInputs::default();
    /// inputs.weight_by_material.insert(MaterialType::Glass, 5.0);
    /// let projection = ImpactProjection::from_inputs(&inputs);
    /// assert_eq!(projection.co2_reduction, 12.5);
    /// ```
    pub fn from_inputs(inputs: &ImpactInputs) -> Self {
        let total_weight_per_material: BTreeMap<MaterialType, f64> = MaterialType::ALL
            .into_iter()
            .map(|material| {
                let weight = inputs
                    .weight_by_material
                    .get(&material)
                    .copied()
                    .unwrap_or(0.0);
                (material, weight)
            })
            .collect();
        let total_weight: f64 = MaterialType::ALL
            .iter()
            .filter_map(|material| total_weight_per_material.get(material))
            .sum();
        Self {
            total_weight_per_material,
            co2_reduction: total_weight * GLOBAL_CO2_KG_PER_KG,
            active_users: inputs.active_users,
            total_points: inputs.total_points,
        }
    }
}

/// Stored singleton aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateImpactData {
    pub id: String,
    #[serde(flatten)]
    pub projection: ImpactProjection,
    pub updated_at: DateTime<Utc>,
}

impl AggregateImpactData {
    pub fn new(projection: ImpactProjection, updated_at: DateTime<Utc>) -> Self {
        Self {
            id: AGGREGATE_ID.to_owned(),
            projection,
            updated_at,
        }
    }

    /// Recompute from `inputs`, stamped with `now`.
    pub fn recompute(inputs: &ImpactInputs, now: DateTime<Utc>) -> Self {
        Self::new(ImpactProjection::from_inputs(inputs), now)
    }
}

/// Savings credited for one material in a user's history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialImpact {
    pub material: MaterialType,
    pub weight_kg: f64,
    pub co2_kg: f64,
    pub water_litres: f64,
    pub energy_kwh: f64,
    /// Months the material would have spent decomposing in a landfill.
    pub decomposition_months_avoided: u32,
}

impl MaterialImpact {
    pub fn for_weight(material: MaterialType, weight_kg: f64) -> Self {
        let factors = material.impact_factors();
        Self {
            material,
            weight_kg,
            co2_kg: weight_kg * factors.co2_kg,
            water_litres: weight_kg * factors.water_litres,
            energy_kwh: weight_kg * factors.energy_kwh,
            decomposition_months_avoided: material.decomposition_months(),
        }
    }
}

/// Per-user environmental summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserImpactSummary {
    /// Materials the user has recycled, in canonical order.
    pub materials: Vec<MaterialImpact>,
    pub total_weight_kg: f64,
    pub total_co2_kg: f64,
    pub total_water_litres: f64,
    pub total_energy_kwh: f64,
}

impl UserImpactSummary {
    /// Build a summary from per-material weight totals. Materials with no
    /// weight are omitted.
    pub fn from_weights(weights: &BTreeMap<MaterialType, f64>) -> Self {
        let materials: Vec<MaterialImpact> = MaterialType::ALL
            .into_iter()
            .filter_map(|material| {
                weights
                    .get(&material)
                    .filter(|weight| **weight > 0.0)
                    .map(|weight| MaterialImpact::for_weight(material, *weight))
            })
            .collect();
        Self {
            total_weight_kg: materials.iter().map(|m| m.weight_kg).sum(),
            total_co2_kg: materials.iter().map(|m| m.co2_kg).sum(),
            total_water_litres: materials.iter().map(|m| m.water_litres).sum(),
            total_energy_kwh: materials.iter().map(|m| m.energy_kwh).sum(),
            materials,
        }
    }
}
