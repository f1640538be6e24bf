use serde::Deserialize;
use std::fs;

use crate::builder::{is_allowed_duration, ALLOWED_SLOT_DURATIONS};
use crate::error::{Result, ScheduleError};
use crate::time::TimeOfDay;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub builder: BuilderDefaults,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token issued by the dashboard's session layer.
    pub token: Option<String>,
}

/// Starting values for a freshly opened builder.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BuilderDefaults {
    pub day_start: TimeOfDay,
    pub day_end: TimeOfDay,
    pub slot_duration: u32,
    pub break_count: usize,
}

impl Default for BuilderDefaults {
    fn default() -> Self {
        Self {
            day_start: TimeOfDay::from_hm(9, 0).unwrap_or_default(),
            day_end: TimeOfDay::from_hm(17, 0).unwrap_or_default(),
            slot_duration: 30,
            break_count: 1,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ScheduleError::Config(format!("Failed to read config file '{}': {}", path, e))
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(ScheduleError::Config("api.base_url must not be empty".to_string()));
        }

        let builder = &self.builder;
        if !is_allowed_duration(builder.slot_duration) {
            return Err(ScheduleError::Config(format!(
                "builder.slot_duration must be one of {:?}, got {}",
                ALLOWED_SLOT_DURATIONS, builder.slot_duration
            )));
        }
        if builder.day_end <= builder.day_start {
            return Err(ScheduleError::Config(format!(
                "builder.day_end ({}) must be after builder.day_start ({})",
                builder.day_end, builder.day_start
            )));
        }

        Ok(())
    }
}
