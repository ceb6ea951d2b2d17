//! Domain primitives, policies and services.
//!
//! Purpose: model disposals, scoring, achievements and impact projections
//! without knowledge of HTTP or SQL. Services implement the driving ports in
//! [`ports`] and depend only on driven ports.
//!
//! Public surface:
//! - Error, ErrorCode: transport-agnostic failure payload.
//! - MaterialType: material categories and their policy table.
//! - compute_points / score_disposal: pure scoring.
//! - AchievementPolicy: ordered achievement rules.
//! - ImpactProjection / AggregateImpactData: global impact projection.
//! - DisposalService, ProgressService, ImpactService: driving port
//!   implementations.

pub mod achievements;
pub mod auth;
pub mod disposal;
pub mod disposal_service;
pub mod error;
pub mod impact;
pub mod impact_service;
pub mod material;
pub mod notification;
pub mod ports;
pub mod progress_service;
pub mod scoring;
pub mod trace_id;
pub mod user;

pub use self::achievements::{
    AchievementIcon, AchievementPolicy, AchievementRule, AchievementSnapshot, NewlyUnlocked,
    UnlockedAchievement,
};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::disposal::{
    DEFAULT_DISPOSAL_LIST_LIMIT, Disposal, DisposalId, DisposalListLimit, DisposalListLimitError,
    MAX_DISPOSAL_LIST_LIMIT,
};
pub use self::disposal_service::DisposalService;
pub use self::error::{Error, ErrorCode};
pub use self::impact::{
    AGGREGATE_ID, AggregateImpactData, GLOBAL_CO2_KG_PER_KG, ImpactInputs, ImpactProjection,
    MaterialImpact, UserImpactSummary,
};
pub use self::impact_service::{AggregateRefresh, ImpactService};
pub use self::material::{ImpactFactors, MaterialType, UnknownMaterial};
pub use self::notification::{Notification, NotificationKind, NotificationPayload};
pub use self::progress_service::ProgressService;
pub use self::scoring::{
    DisposalValidationError, MAX_WEIGHT_KG, ScoredDisposal, Weight, compute_points,
    score_disposal,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{EXPERIENCE_PER_LEVEL, Level, UserId, UserStanding, UserValidationError};
