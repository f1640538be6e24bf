use tracing::{debug, warn};

use crate::builder::BuilderState;
use crate::calendar::DateRange;
use crate::error::ReconstructError;
use crate::schedule::Day;
use crate::time::TimeOfDay;

/// Infers builder parameters from already-expanded days.
///
/// The earliest day is the template; other days are not checked against it.
/// Excluded dates cannot be recovered, so the stored days become the full range.
pub fn reconstruct(days: &[Day]) -> Result<BuilderState, ReconstructError> {
    let mut sorted: Vec<&Day> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let (Some(first_day), Some(last_day)) = (sorted.first(), sorted.last()) else {
        return Err(ReconstructError::NoDays);
    };

    let template = &first_day.slots;
    let (Some(first_slot), Some(last_slot)) = (template.first(), template.last()) else {
        return Err(ReconstructError::EmptyTemplate {
            date: first_day.date,
        });
    };

    let duration = first_slot.duration_minutes();
    if duration <= 0 {
        return Err(ReconstructError::MalformedSlot {
            date: first_day.date,
        });
    }

    let break_count = template.iter().filter(|s| s.is_break()).count();
    let (break_count, break_start_index) = match template.iter().position(|s| s.is_break()) {
        Some(index) => (break_count, index),
        None => (1, 0),
    };

    let state = BuilderState {
        date_range: DateRange::new(first_day.date, last_day.date),
        excluded_dates: Default::default(),
        day_start: first_slot.start_time,
        day_end: last_slot.end_time,
        slot_duration_minutes: duration as u32,
        break_count,
        break_start_index,
    };

    debug!(
        "Reconstructed {}..{} {}-{} every {}m, {} break slot(s) at {}",
        first_day.date,
        last_day.date,
        state.day_start,
        state.day_end,
        state.slot_duration_minutes,
        state.break_count,
        state.break_start_index
    );

    Ok(state)
}

/// Like [`reconstruct`], but falls back to `fallback` instead of failing.
pub fn reconstruct_or(days: &[Day], fallback: BuilderState) -> BuilderState {
    match reconstruct(days) {
        Ok(state) => state,
        Err(e) => {
            warn!("Starting edit from defaults: {}", e);
            fallback
        }
    }
}

/// Working hours implied by a day's slots, if it has any.
pub fn working_hours(day: &Day) -> Option<(TimeOfDay, TimeOfDay)> {
    Some((day.slots.first()?.start_time, day.slots.last()?.end_time))
}
