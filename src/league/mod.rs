//! League model: teams, their owners, and season aggregates.

pub mod ownership;

pub use ownership::{
    collapse_owners, display_name, resolve, CoOwnerPolicy, LabelCollision, OwnershipMap,
    ResolvedLeague, SeasonStats, Team,
};
