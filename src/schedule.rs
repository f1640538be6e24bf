use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::builder::BuilderState;
use crate::error::BuildError;
use crate::slots::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<Slot>,
}

/// Fully expanded schedule for one doctor, in the shape the store accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub doctor: String,
    #[serde(default)]
    pub days: Vec<Day>,
}

impl Schedule {
    pub fn day(&self, date: NaiveDate) -> Option<&Day> {
        self.days.iter().find(|d| d.date == date)
    }

    pub fn day_mut(&mut self, date: NaiveDate) -> Option<&mut Day> {
        self.days.iter_mut().find(|d| d.date == date)
    }

    pub fn slot_count(&self) -> usize {
        self.days.iter().map(|d| d.slots.len()).sum()
    }

    pub fn break_slot_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| d.slots.iter())
            .filter(|s| s.is_break())
            .count()
    }

    /// First and last date covered, regardless of stored order.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.days.iter().map(|d| d.date).min()?;
        let last = self.days.iter().map(|d| d.date).max()?;
        Some((first, last))
    }
}

/// Materializes the builder parameters into a schedule for `doctor`.
///
/// Each day receives its own copy of the slot template. Working hours too
/// short to hold a single slot are refused with [`BuildError::NoSlots`].
pub fn compose(state: &BuilderState, doctor: Option<&str>) -> Result<Schedule, BuildError> {
    let doctor = doctor
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(BuildError::NoDoctor)?;

    if state.date_range.bounds().is_none() {
        return Err(BuildError::MissingDateRange);
    }

    let dates = state.included_days();
    if dates.is_empty() {
        return Err(BuildError::NoDaysRemaining);
    }

    let template = state.slot_template();
    if template.is_empty() {
        return Err(BuildError::NoSlots);
    }

    let days: Vec<Day> = dates
        .into_iter()
        .map(|date| Day {
            date,
            slots: template.clone(),
        })
        .collect();

    debug!(
        "Composed schedule for doctor {}: {} days x {} slots",
        doctor,
        days.len(),
        template.len()
    );

    Ok(Schedule {
        doctor: doctor.to_string(),
        days,
    })
}
