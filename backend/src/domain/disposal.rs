//! Disposal records.
//!
//! A disposal is immutable once created: its points are fixed at scoring
//! time and there is no update path.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{MaterialType, ScoredDisposal, UserId, Weight};

/// Stable disposal identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct DisposalId(Uuid);

impl DisposalId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for DisposalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A logged disposal.
#[derive(Debug, Clone, PartialEq)]
pub struct Disposal {
    pub id: DisposalId,
    pub user_id: UserId,
    pub material: MaterialType,
    pub weight: Weight,
    pub points_awarded: u32,
    pub created_at: DateTime<Utc>,
}

impl Disposal {
    /// Create a new disposal for `user_id` from a scored request.
    pub fn record(user_id: UserId, scored: ScoredDisposal, created_at: DateTime<Utc>) -> Self {
        Self {
            id: DisposalId::random(),
            user_id,
            material: scored.material,
            weight: scored.weight,
            points_awarded: scored.points,
            created_at,
        }
    }
}

/// Page size used when the caller does not ask for one.
pub const DEFAULT_DISPOSAL_LIST_LIMIT: u32 = 20;
/// Largest page size a caller may ask for.
pub const MAX_DISPOSAL_LIST_LIMIT: u32 = 100;

/// Validated page size for disposal history reads.
///
/// # Examples
/// ```
/// use backend::domain::DisposalListLimit;
///
/// assert_eq!(DisposalListLimit::new(None).unwrap().get(), 20);
/// assert!(DisposalListLimit::new(Some(0)).is_err());
/// assert!(DisposalListLimit::new(Some(101)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisposalListLimit(u32);

/// Raised when a requested page size is outside `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("limit must be between 1 and {MAX_DISPOSAL_LIST_LIMIT} (got {0})")]
pub struct DisposalListLimitError(pub u32);

impl DisposalListLimit {
    pub fn new(requested: Option<u32>) -> Result<Self, DisposalListLimitError> {
        match requested {
            None => Ok(Self(DEFAULT_DISPOSAL_LIST_LIMIT)),
            Some(limit) if (1..=MAX_DISPOSAL_LIST_LIMIT).contains(&limit) => Ok(Self(limit)),
            Some(limit) => Err(DisposalListLimitError(limit)),
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for DisposalListLimit {
    fn default() -> Self {
        Self(DEFAULT_DISPOSAL_LIST_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    use crate::domain::score_disposal;

    #[rstest]
    fn record_copies_scored_values() {
        let user_id = UserId::random();
        let scored = score_disposal("METAL", 2.0).expect("valid request");
        let now = Utc::now();
        let disposal = Disposal::record(user_id, scored, now);
        assert_eq!(disposal.user_id, user_id);
        assert_eq!(disposal.material, MaterialType::Metal);
        assert_eq!(disposal.weight.kg(), 2.0);
        assert_eq!(disposal.points_awarded, 40);
        assert_eq!(disposal.created_at, now);
    }

    #[rstest]
    fn each_record_gets_a_fresh_id() {
        let scored = score_disposal("PAPER", 1.0).expect("valid request");
        let now = Utc::now();
        let first = Disposal::record(UserId::random(), scored, now);
        let second = Disposal::record(UserId::random(), scored, now);
        assert_ne!(first.id, second.id);
    }

    #[rstest]
    #[case(Some(1), Ok(1))]
    #[case(Some(100), Ok(100))]
    #[case(None, Ok(20))]
    #[case(Some(0), Err(DisposalListLimitError(0)))]
    #[case(Some(101), Err(DisposalListLimitError(101)))]
    fn list_limit_bounds(
        #[case] requested: Option<u32>,
        #[case] expected: Result<u32, DisposalListLimitError>,
    ) {
        assert_eq!(DisposalListLimit::new(requested).map(DisposalListLimit::get), expected);
    }
}
