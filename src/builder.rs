//! Parameters of one open schedule builder and the preview derived from them.
//!
//! Every mutation is followed by a call to [`BuilderState::derive_view`]; the
//! preview is recomputed from scratch and never cached.

use std::collections::BTreeSet;
use std::ops::Range;

use chrono::NaiveDate;

use crate::calendar::DateRange;
use crate::config::BuilderDefaults;
use crate::error::BuildError;
use crate::slots::{allocate_break, synthesize_slots, Slot};
use crate::time::TimeOfDay;

/// Slot lengths offered by the builder.
pub const ALLOWED_SLOT_DURATIONS: [u32; 4] = [10, 15, 20, 30];

pub fn is_allowed_duration(minutes: u32) -> bool {
    ALLOWED_SLOT_DURATIONS.contains(&minutes)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderState {
    pub date_range: DateRange,
    pub excluded_dates: BTreeSet<NaiveDate>,
    pub day_start: TimeOfDay,
    pub day_end: TimeOfDay,
    pub slot_duration_minutes: u32,
    pub break_count: usize,
    pub break_start_index: usize,
}

/// A day shown in the preview, excluded or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDay {
    pub date: NaiveDate,
    pub excluded: bool,
}

/// Everything the builder renders for the current parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePreview {
    pub days: Vec<PreviewDay>,
    pub slots: Vec<Slot>,
    pub break_range: Range<usize>,
}

impl SchedulePreview {
    pub fn included_day_count(&self) -> usize {
        self.days.iter().filter(|d| !d.excluded).count()
    }
}

impl BuilderState {
    pub fn from_defaults(defaults: &BuilderDefaults) -> Self {
        Self {
            date_range: DateRange::default(),
            excluded_dates: BTreeSet::new(),
            day_start: defaults.day_start,
            day_end: defaults.day_end,
            slot_duration_minutes: defaults.slot_duration,
            break_count: defaults.break_count,
            break_start_index: 0,
        }
    }

    /// Replaces the date range. Exclusions outside the new range are dropped.
    pub fn set_date_range(&mut self, range: DateRange) {
        self.date_range = range;
        self.excluded_dates.retain(|date| range.contains(*date));
    }

    /// Flips a day in or out of the schedule. Returns whether it is now excluded.
    pub fn toggle_excluded(&mut self, date: NaiveDate) -> bool {
        if self.excluded_dates.remove(&date) {
            false
        } else {
            self.excluded_dates.insert(date);
            true
        }
    }

    pub fn set_excluded(&mut self, date: NaiveDate, excluded: bool) {
        if excluded {
            self.excluded_dates.insert(date);
        } else {
            self.excluded_dates.remove(&date);
        }
    }

    pub fn set_working_hours(&mut self, day_start: TimeOfDay, day_end: TimeOfDay) {
        self.day_start = day_start;
        self.day_end = day_end;
    }

    pub fn set_slot_duration(&mut self, minutes: u32) -> Result<(), BuildError> {
        if !is_allowed_duration(minutes) {
            return Err(BuildError::UnsupportedDuration(minutes));
        }
        self.slot_duration_minutes = minutes;
        Ok(())
    }

    pub fn set_break_count(&mut self, break_count: usize) {
        self.break_count = break_count;
    }

    /// Clicking a slot moves the break run to start there.
    pub fn select_slot(&mut self, index: usize) {
        self.break_start_index = index;
    }

    /// The slot layout every included day receives.
    pub fn slot_template(&self) -> Vec<Slot> {
        let mut slots = synthesize_slots(self.day_start, self.day_end, self.slot_duration_minutes);
        allocate_break(&mut slots, self.break_count, self.break_start_index);
        slots
    }

    /// Days of the range that have not been excluded, ascending.
    pub fn included_days(&self) -> Vec<NaiveDate> {
        self.date_range
            .days()
            .into_iter()
            .filter(|date| !self.excluded_dates.contains(date))
            .collect()
    }

    pub fn derive_view(&self) -> SchedulePreview {
        let days = self
            .date_range
            .days()
            .into_iter()
            .map(|date| PreviewDay {
                date,
                excluded: self.excluded_dates.contains(&date),
            })
            .collect();

        let mut slots = synthesize_slots(self.day_start, self.day_end, self.slot_duration_minutes);
        let break_range = allocate_break(&mut slots, self.break_count, self.break_start_index);

        SchedulePreview {
            days,
            slots,
            break_range,
        }
    }
}

impl Default for BuilderState {
    fn default() -> Self {
        Self::from_defaults(&BuilderDefaults::default())
    }
}
