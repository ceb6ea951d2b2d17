//! Tests for user identifiers and level progression.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn user_id() -> UserId {
    UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id")
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn serde_uses_string_form(user_id: UserId) {
    let value = serde_json::to_value(user_id).expect("serialise");
    assert_eq!(value, serde_json::json!("3fa85f64-5717-4562-b3fc-2c963f66afa6"));
    let back: UserId = serde_json::from_value(value).expect("deserialise");
    assert_eq!(back, user_id);
}

#[rstest]
#[case(0, 1)]
#[case(499, 1)]
#[case(500, 2)]
#[case(1_250, 3)]
fn level_is_experience_over_five_hundred_plus_one(#[case] experience: u64, #[case] level: u32) {
    assert_eq!(Level::from_experience(experience).get(), level);
}

#[rstest]
fn level_saturates_for_huge_experience() {
    assert_eq!(Level::from_experience(u64::MAX).get(), u32::MAX);
}

#[rstest]
#[case(0, 500)]
#[case(125, 375)]
#[case(500, 500)]
#[case(999, 1)]
fn experience_to_next_level(user_id: UserId, #[case] experience: u64, #[case] missing: u64) {
    let standing = UserStanding {
        experience,
        ..UserStanding::empty(user_id)
    };
    assert_eq!(standing.experience_to_next_level(), missing);
}

#[rstest]
fn earning_moves_both_counters(user_id: UserId) {
    let standing = UserStanding {
        points_total: 10,
        experience: 400,
        ..UserStanding::empty(user_id)
    }
    .earn(125);
    assert_eq!(standing.points_total, 135);
    assert_eq!(standing.experience, 525);
    assert_eq!(standing.level().get(), 2);
}
