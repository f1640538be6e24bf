use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {0}")]
    Api(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid time of day: {0}")]
    InvalidTime(String),

    #[error("Cannot compose schedule: {0}")]
    Build(#[from] BuildError),

    #[error("Cannot reconstruct schedule: {0}")]
    Reconstruct(#[from] ReconstructError),
}

/// Validation failures raised before a schedule is composed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    #[error("no doctor selected")]
    NoDoctor,

    #[error("date range needs both a start and an end date")]
    MissingDateRange,

    #[error("no days remain in the selected range")]
    NoDaysRemaining,

    #[error("working hours are too short for a single slot")]
    NoSlots,

    #[error("unsupported slot duration: {0} minutes")]
    UnsupportedDuration(u32),
}

/// Reasons a persisted schedule cannot seed an edit session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconstructError {
    #[error("schedule has no days")]
    NoDays,

    #[error("template day {date} has no slots")]
    EmptyTemplate { date: NaiveDate },

    #[error("first slot of {date} does not have a positive duration")]
    MalformedSlot { date: NaiveDate },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
