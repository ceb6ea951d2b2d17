//! Response bodies shared by several handlers.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{AggregateImpactData, Disposal, MaterialType, UnlockedAchievement};

/// One logged disposal.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisposalBody {
    #[schema(example = "0b6f1c5e-3d8a-4c1f-9e2b-7a5d4c3b2a10")]
    pub id: String,
    pub material_type: MaterialType,
    #[schema(example = 5.0)]
    pub weight_kg: f64,
    #[schema(example = 75)]
    pub points_awarded: u32,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl From<Disposal> for DisposalBody {
    fn from(value: Disposal) -> Self {
        Self {
            id: value.id.to_string(),
            material_type: value.material,
            weight_kg: value.weight.kg(),
            points_awarded: value.points_awarded,
            created_at: value.created_at.to_rfc3339(),
        }
    }
}

/// An unlocked achievement.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AchievementBody {
    #[schema(example = "Primeiro Passo")]
    pub title: String,
    #[schema(example = "Registrou o primeiro descarte")]
    pub description: String,
    /// Bonus points granted on unlock.
    #[schema(example = 50)]
    pub points: u32,
    /// Stable icon identifier.
    #[schema(example = "seedling")]
    pub icon: String,
    /// Display glyph for the icon.
    pub emoji: String,
    pub unlocked_at: String,
}

impl From<UnlockedAchievement> for AchievementBody {
    fn from(value: UnlockedAchievement) -> Self {
        Self {
            title: value.title,
            description: value.description,
            points: value.points,
            icon: value.icon.identifier().to_owned(),
            emoji: value.icon.emoji().to_owned(),
            unlocked_at: value.unlocked_at.to_rfc3339(),
        }
    }
}

/// Global impact aggregate.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateImpactBody {
    /// Kilograms per material; every material is listed.
    #[schema(value_type = Object, example = json!({"GLASS": 5.0, "PLASTIC": 0.0}))]
    pub total_weight_per_material: BTreeMap<MaterialType, f64>,
    #[schema(example = 12.5)]
    pub co2_reduction: f64,
    pub active_users: u64,
    pub total_points: i64,
    pub updated_at: String,
}

impl From<AggregateImpactData> for AggregateImpactBody {
    fn from(value: AggregateImpactData) -> Self {
        Self {
            total_weight_per_material: value.projection.total_weight_per_material,
            co2_reduction: value.projection.co2_reduction,
            active_users: value.projection.active_users,
            total_points: value.projection.total_points,
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AchievementRule, ImpactInputs, NewlyUnlocked, UserId};
    use crate::test_support::fixture_timestamp;

    #[test]
    fn achievement_body_carries_icon_identifier_and_glyph() {
        let unlocked = UnlockedAchievement::grant(
            UserId::random(),
            NewlyUnlocked {
                rule: AchievementRule::Centennial,
            },
            fixture_timestamp(),
        );
        let value = serde_json::to_value(AchievementBody::from(unlocked)).expect("json");
        assert_eq!(value["title"], "Centenário");
        assert_eq!(value["icon"], "hundred_points");
        assert_eq!(value["unlockedAt"], "2026-03-01T09:00:00+00:00");
    }

    #[test]
    fn aggregate_body_keys_weights_by_material_name() {
        let mut inputs = ImpactInputs::default();
        inputs.weight_by_material.insert(MaterialType::Glass, 5.0);
        let body = AggregateImpactBody::from(AggregateImpactData::recompute(
            &inputs,
            fixture_timestamp(),
        ));
        let value = serde_json::to_value(body).expect("json");
        assert_eq!(value["totalWeightPerMaterial"]["GLASS"], 5.0);
        assert_eq!(value["totalWeightPerMaterial"]["ELECTRONIC"], 0.0);
        assert_eq!(value["co2Reduction"], 12.5);
    }
}
