use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::time::TimeOfDay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotType {
    #[default]
    Available,
    Break,
}

/// One fixed-length interval within a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    #[serde(rename = "type", default)]
    pub slot_type: SlotType,
    #[serde(default)]
    pub is_booked: bool,
    #[serde(default)]
    pub comment: String,
}

impl Slot {
    pub fn new(start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            start_time,
            end_time,
            slot_type: SlotType::Available,
            is_booked: false,
            comment: String::new(),
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        self.start_time.minutes_until(self.end_time)
    }

    pub fn is_break(&self) -> bool {
        self.slot_type == SlotType::Break
    }
}

/// Splits the working-hours window into uniform slots.
///
/// A trailing remainder shorter than `duration_minutes` is dropped.
pub fn synthesize_slots(
    day_start: TimeOfDay,
    day_end: TimeOfDay,
    duration_minutes: u32,
) -> Vec<Slot> {
    if duration_minutes == 0 || day_end <= day_start {
        return Vec::new();
    }

    let end = day_end.minutes();
    let mut slots = Vec::new();
    let mut current = day_start;

    while current.minutes() + duration_minutes <= end {
        let Some(slot_end) = current.checked_add_minutes(duration_minutes) else {
            break;
        };
        slots.push(Slot::new(current, slot_end));
        current = slot_end;
    }

    slots
}

/// Start index actually used for a break run, clamped so the run ends on or
/// before the last slot.
pub fn effective_break_start(
    total_slots: usize,
    break_count: usize,
    requested_start: usize,
) -> usize {
    requested_start.min(total_slots.saturating_sub(break_count))
}

/// Tags a contiguous run of `break_count` slots as breaks and every other slot
/// as available. Returns the index range that was tagged.
pub fn allocate_break(
    slots: &mut [Slot],
    break_count: usize,
    requested_start: usize,
) -> Range<usize> {
    if slots.is_empty() {
        return 0..0;
    }

    let start = effective_break_start(slots.len(), break_count, requested_start);
    let run = start..(start + break_count).min(slots.len());

    for (index, slot) in slots.iter_mut().enumerate() {
        slot.slot_type = if run.contains(&index) {
            SlotType::Break
        } else {
            SlotType::Available
        };
    }

    run
}
