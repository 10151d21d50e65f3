use crate::Road;
use thiserror::Error;

/// Errors raised while planning a signal schedule.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The junction arity has no phase table; only 3 and 4 roads are supported.
    #[error("unsupported junction with {0} roads (expected 3 or 4)")]
    UnsupportedJunction(u8),

    /// A phase references a road that has no recorded vehicle count.
    #[error("no vehicle count recorded for road {0}")]
    MissingRoadData(Road),

    /// The vehicle count provider could not produce a count for a road.
    #[error("vehicle detection unavailable for road {road}: {reason}")]
    DetectionUnavailable { road: Road, reason: String },

    /// A configuration value is out of range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// A specialised result type for schedule planning.
pub type Result<T> = std::result::Result<T, Error>;
