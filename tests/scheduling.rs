use chrono::NaiveDate;

use clinic_schedule::builder::BuilderState;
use clinic_schedule::calendar::{date_key, expand_range, DateRange};
use clinic_schedule::error::{BuildError, ReconstructError};
use clinic_schedule::reconstruct::{reconstruct, reconstruct_or};
use clinic_schedule::schedule::{compose, Day, Schedule};
use clinic_schedule::slots::{allocate_break, synthesize_slots, Slot, SlotType};
use clinic_schedule::time::TimeOfDay;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn time(s: &str) -> TimeOfDay {
    s.parse().unwrap()
}

/// 17:00-20:00 in 30 minute slots over 1-3 March 2024
fn evening_state(break_count: usize, break_start_index: usize) -> BuilderState {
    BuilderState {
        date_range: DateRange::new(date(2024, 3, 1), date(2024, 3, 3)),
        excluded_dates: Default::default(),
        day_start: time("17:00"),
        day_end: time("20:00"),
        slot_duration_minutes: 30,
        break_count,
        break_start_index,
    }
}

fn break_indices(slots: &[Slot]) -> Vec<usize> {
    slots
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_break())
        .map(|(i, _)| i)
        .collect()
}

// ── TimeOfDay tests ──────────────────────────────────────────────

#[test]
fn time_of_day_parses_and_formats_zero_padded() {
    let t = time("09:05");
    assert_eq!(t.minutes(), 9 * 60 + 5);
    assert_eq!(t.to_string(), "09:05");
    assert_eq!(time("23:59").minutes(), 1439);
}

#[test]
fn time_of_day_rejects_out_of_range() {
    assert!("24:00".parse::<TimeOfDay>().is_err());
    assert!("12:60".parse::<TimeOfDay>().is_err());
    assert!("noon".parse::<TimeOfDay>().is_err());
    assert_eq!(TimeOfDay::from_minutes(1440), None);
    assert_eq!(time("23:30").checked_add_minutes(30), None);
}

#[test]
fn time_of_day_serializes_as_string() {
    let json = serde_json::to_string(&time("08:15")).unwrap();
    assert_eq!(json, "\"08:15\"");
    let back: TimeOfDay = serde_json::from_str("\"17:45\"").unwrap();
    assert_eq!(back, time("17:45"));
}

// ── Calendar range tests ─────────────────────────────────────────

#[test]
fn expand_range_counts_inclusive_days_across_rollovers() {
    let ranges = [
        (date(2024, 3, 1), date(2024, 3, 1)),
        (date(2024, 2, 27), date(2024, 3, 2)),
        (date(2023, 12, 30), date(2024, 1, 2)),
        (date(2023, 2, 27), date(2023, 3, 1)),
        (date(2024, 1, 1), date(2024, 12, 31)),
    ];

    for (from, to) in ranges {
        let days = expand_range(from, to);
        assert_eq!(days.len() as i64, (to - from).num_days() + 1);
        assert_eq!(days.first(), Some(&from));
        assert_eq!(days.last(), Some(&to));
        for pair in days.windows(2) {
            assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }
    }
}

#[test]
fn expand_range_includes_leap_day() {
    let days = expand_range(date(2024, 2, 28), date(2024, 3, 1));
    assert_eq!(days, vec![date(2024, 2, 28), date(2024, 2, 29), date(2024, 3, 1)]);
}

#[test]
fn expand_range_inverted_is_empty() {
    assert!(expand_range(date(2024, 3, 5), date(2024, 3, 1)).is_empty());
    assert!(DateRange::default().days().is_empty());
    assert_eq!(date_key(date(2024, 3, 2)), "2024-03-02");
}

// ── Slot synthesizer tests ───────────────────────────────────────

#[test]
fn scenario_a_evening_slots() {
    let slots = synthesize_slots(time("17:00"), time("20:00"), 30);

    let spans: Vec<String> = slots
        .iter()
        .map(|s| format!("{}-{}", s.start_time, s.end_time))
        .collect();
    assert_eq!(
        spans,
        vec![
            "17:00-17:30",
            "17:30-18:00",
            "18:00-18:30",
            "18:30-19:00",
            "19:00-19:30",
            "19:30-20:00"
        ]
    );
    assert!(slots.iter().all(|s| s.slot_type == SlotType::Available));
    assert!(slots.iter().all(|s| !s.is_booked && s.comment.is_empty()));
}

#[test]
fn synthesize_slots_count_and_contiguity() {
    let windows = [("08:00", "12:00"), ("09:10", "17:45"), ("00:00", "23:59"), ("13:00", "13:25")];

    for (start, end) in windows {
        for duration in [10, 15, 20, 30, 7, 45] {
            let (start, end) = (time(start), time(end));
            let slots = synthesize_slots(start, end, duration);
            let expected = (end.minutes() - start.minutes()) / duration;
            assert_eq!(slots.len() as u32, expected, "{}-{} every {}", start, end, duration);

            for slot in &slots {
                assert_eq!(slot.duration_minutes(), i64::from(duration));
                assert!(slot.end_time <= end);
            }
            for pair in slots.windows(2) {
                assert_eq!(pair[0].end_time, pair[1].start_time);
            }
        }
    }
}

#[test]
fn synthesize_slots_drops_partial_tail() {
    let slots = synthesize_slots(time("09:00"), time("10:10"), 20);
    assert_eq!(slots.len(), 3);
    assert_eq!(slots.last().unwrap().end_time, time("10:00"));
}

#[test]
fn synthesize_slots_empty_window() {
    assert!(synthesize_slots(time("10:00"), time("10:00"), 15).is_empty());
    assert!(synthesize_slots(time("12:00"), time("09:00"), 15).is_empty());
    assert!(synthesize_slots(time("09:00"), time("12:00"), 0).is_empty());
}

// ── Break allocator tests ────────────────────────────────────────

#[test]
fn scenario_b_break_in_the_middle() {
    let mut slots = synthesize_slots(time("17:00"), time("20:00"), 30);
    let run = allocate_break(&mut slots, 2, 2);

    assert_eq!(run, 2..4);
    assert_eq!(break_indices(&slots), vec![2, 3]);
    assert_eq!(slots[2].start_time, time("18:00"));
    assert_eq!(slots[3].end_time, time("19:00"));
    assert_eq!(slots.iter().filter(|s| !s.is_break()).count(), 4);
}

#[test]
fn scenario_c_break_start_clamps_to_end() {
    let mut slots = synthesize_slots(time("17:00"), time("20:00"), 30);
    let run = allocate_break(&mut slots, 2, 5);

    assert_eq!(run, 4..6);
    assert_eq!(break_indices(&slots), vec![4, 5]);
}

#[test]
fn break_run_never_passes_last_slot() {
    for total in 0..8 {
        for break_count in 0..10 {
            for requested in 0..10 {
                let mut slots = vec![Slot::new(time("09:00"), time("09:10")); total];
                let run = allocate_break(&mut slots, break_count, requested);

                assert!(run.end <= total);
                let tagged = break_indices(&slots);
                assert_eq!(tagged.len(), break_count.min(total));
                assert_eq!(tagged, run.collect::<Vec<_>>());
            }
        }
    }
}

#[test]
fn break_count_covering_day_marks_every_slot() {
    let mut slots = synthesize_slots(time("09:00"), time("10:00"), 20);
    allocate_break(&mut slots, 10, 2);
    assert!(slots.iter().all(Slot::is_break));
}

#[test]
fn reallocating_clears_previous_break() {
    let mut slots = synthesize_slots(time("17:00"), time("20:00"), 30);
    allocate_break(&mut slots, 2, 0);
    allocate_break(&mut slots, 2, 3);
    assert_eq!(break_indices(&slots), vec![3, 4]);
}

// ── Builder state tests ──────────────────────────────────────────

#[test]
fn select_slot_moves_break_in_preview() {
    let mut state = evening_state(2, 0);
    assert_eq!(state.derive_view().break_range, 0..2);

    state.select_slot(3);
    let view = state.derive_view();
    assert_eq!(view.break_range, 3..5);
    assert_eq!(break_indices(&view.slots), vec![3, 4]);

    state.select_slot(5);
    assert_eq!(state.derive_view().break_range, 4..6);
}

#[test]
fn toggle_excluded_round_trips() {
    let mut state = evening_state(1, 0);
    assert!(state.toggle_excluded(date(2024, 3, 2)));
    assert_eq!(state.included_days(), vec![date(2024, 3, 1), date(2024, 3, 3)]);

    let view = state.derive_view();
    assert_eq!(view.days.len(), 3);
    assert!(view.days[1].excluded);
    assert_eq!(view.included_day_count(), 2);

    assert!(!state.toggle_excluded(date(2024, 3, 2)));
    assert_eq!(state.included_days().len(), 3);
}

#[test]
fn narrowing_range_drops_stale_exclusions() {
    let mut state = evening_state(1, 0);
    state.set_excluded(date(2024, 3, 3), true);
    state.set_excluded(date(2024, 3, 1), true);

    state.set_date_range(DateRange::new(date(2024, 3, 1), date(2024, 3, 2)));
    assert_eq!(state.excluded_dates.len(), 1);
    assert!(state.excluded_dates.contains(&date(2024, 3, 1)));
}

#[test]
fn slot_duration_restricted_to_offered_values() {
    let mut state = BuilderState::default();
    assert_eq!(state.set_slot_duration(25), Err(BuildError::UnsupportedDuration(25)));
    assert_eq!(state.slot_duration_minutes, 30);
    assert!(state.set_slot_duration(15).is_ok());
    assert_eq!(state.slot_duration_minutes, 15);
}

// ── Composer tests ───────────────────────────────────────────────

#[test]
fn scenario_d_excluded_day_is_skipped() {
    let mut state = evening_state(2, 2);
    state.toggle_excluded(date(2024, 3, 2));

    let schedule = compose(&state, Some("doc-1")).unwrap();
    let dates: Vec<_> = schedule.days.iter().map(|d| d.date).collect();
    assert_eq!(dates, vec![date(2024, 3, 1), date(2024, 3, 3)]);
    assert_eq!(schedule.doctor, "doc-1");
    assert_eq!(schedule.slot_count(), 12);
    assert_eq!(schedule.break_slot_count(), 4);
}

#[test]
fn compose_gives_each_day_its_own_slots() {
    let state = evening_state(1, 0);
    let mut schedule = compose(&state, Some("doc-1")).unwrap();

    let first = schedule.day_mut(date(2024, 3, 1)).unwrap();
    first.slots[1].comment = "Reserved for follow-up".to_string();
    first.slots[1].is_booked = true;

    let second = schedule.day(date(2024, 3, 2)).unwrap();
    assert!(second.slots[1].comment.is_empty());
    assert!(!second.slots[1].is_booked);
}

#[test]
fn compose_validation_failures() {
    let state = evening_state(1, 0);
    assert_eq!(compose(&state, None), Err(BuildError::NoDoctor));
    assert_eq!(compose(&state, Some("  ")), Err(BuildError::NoDoctor));

    let mut no_range = state.clone();
    no_range.date_range = DateRange {
        from: Some(date(2024, 3, 1)),
        to: None,
    };
    assert_eq!(compose(&no_range, Some("doc-1")), Err(BuildError::MissingDateRange));

    let mut all_excluded = state.clone();
    for day in all_excluded.date_range.days() {
        all_excluded.toggle_excluded(day);
    }
    assert_eq!(compose(&all_excluded, Some("doc-1")), Err(BuildError::NoDaysRemaining));

    let mut inverted = state.clone();
    inverted.date_range = DateRange::new(date(2024, 3, 3), date(2024, 3, 1));
    assert_eq!(compose(&inverted, Some("doc-1")), Err(BuildError::NoDaysRemaining));

    let mut no_hours = state;
    no_hours.set_working_hours(time("17:00"), time("17:10"));
    assert_eq!(compose(&no_hours, Some("doc-1")), Err(BuildError::NoSlots));
}

#[test]
fn composed_schedule_serializes_to_store_shape() {
    let mut state = evening_state(1, 1);
    state.set_date_range(DateRange::new(date(2024, 3, 1), date(2024, 3, 1)));
    let schedule = compose(&state, Some("doc-7")).unwrap();

    let json = serde_json::to_value(&schedule).unwrap();
    assert_eq!(json["doctor"], "doc-7");
    assert_eq!(json["days"][0]["date"], "2024-03-01");
    let slot = &json["days"][0]["slots"][1];
    assert_eq!(slot["startTime"], "17:30");
    assert_eq!(slot["endTime"], "18:00");
    assert_eq!(slot["type"], "break");
    assert_eq!(slot["isBooked"], false);
    assert_eq!(slot["comment"], "");
}

// ── Reconstructor tests ──────────────────────────────────────────

#[test]
fn compose_then_reconstruct_restores_parameters() {
    let cases = [
        ("17:00", "20:00", 30, 2, 2),
        ("09:00", "17:00", 15, 4, 16),
        ("08:30", "12:10", 20, 1, 0),
        ("10:00", "11:00", 10, 6, 0),
    ];

    for (start, end, duration, break_count, break_start_index) in cases {
        let state = BuilderState {
            date_range: DateRange::new(date(2024, 5, 30), date(2024, 6, 2)),
            excluded_dates: Default::default(),
            day_start: time(start),
            day_end: time(end),
            slot_duration_minutes: duration,
            break_count,
            break_start_index,
        };
        let schedule = compose(&state, Some("doc-1")).unwrap();
        let rebuilt = reconstruct(&schedule.days).unwrap();

        // day_end is the end of the last whole slot
        let expected_end = schedule.days[0].slots.last().unwrap().end_time;
        assert_eq!(rebuilt.day_start, state.day_start);
        assert_eq!(rebuilt.day_end, expected_end);
        assert_eq!(rebuilt.slot_duration_minutes, state.slot_duration_minutes);
        assert_eq!(rebuilt.break_count, state.break_count);
        assert_eq!(rebuilt.break_start_index, state.break_start_index);
        assert_eq!(rebuilt.date_range, state.date_range);
        assert!(rebuilt.excluded_dates.is_empty());
    }
}

#[test]
fn reconstruct_sorts_days_and_uses_earliest_as_template() {
    let mut state = evening_state(2, 1);
    state.set_date_range(DateRange::new(date(2024, 3, 1), date(2024, 3, 5)));
    let mut schedule = compose(&state, Some("doc-1")).unwrap();

    // Later days drift; only the earliest is read.
    schedule.days[4].slots.truncate(2);
    schedule.days.reverse();

    let rebuilt = reconstruct(&schedule.days).unwrap();
    assert_eq!(rebuilt.date_range, DateRange::new(date(2024, 3, 1), date(2024, 3, 5)));
    assert_eq!(rebuilt.day_end, time("20:00"));
    assert_eq!(rebuilt.break_start_index, 1);
    assert_eq!(rebuilt.break_count, 2);
}

#[test]
fn reconstruct_does_not_recover_excluded_days() {
    let mut state = evening_state(1, 0);
    state.toggle_excluded(date(2024, 3, 1));

    let schedule = compose(&state, Some("doc-1")).unwrap();
    let rebuilt = reconstruct(&schedule.days).unwrap();
    assert_eq!(rebuilt.date_range, DateRange::new(date(2024, 3, 2), date(2024, 3, 3)));
    assert!(rebuilt.excluded_dates.is_empty());
}

#[test]
fn scenario_e_no_break_defaults_to_single_break_at_start() {
    let day = Day {
        date: date(2024, 4, 10),
        slots: synthesize_slots(time("09:00"), time("10:00"), 20),
    };
    assert_eq!(day.slots[0].end_time, time("09:20"));

    let rebuilt = reconstruct(&[day]).unwrap();
    assert_eq!(rebuilt.slot_duration_minutes, 20);
    assert_eq!(rebuilt.break_count, 1);
    assert_eq!(rebuilt.break_start_index, 0);
}

#[test]
fn reconstruct_failures() {
    assert_eq!(reconstruct(&[]), Err(ReconstructError::NoDays));

    let empty = Day {
        date: date(2024, 4, 10),
        slots: vec![],
    };
    assert_eq!(
        reconstruct(&[empty]),
        Err(ReconstructError::EmptyTemplate {
            date: date(2024, 4, 10)
        })
    );

    let backwards = Day {
        date: date(2024, 4, 11),
        slots: vec![Slot::new(time("10:00"), time("09:30"))],
    };
    assert_eq!(
        reconstruct(&[backwards]),
        Err(ReconstructError::MalformedSlot {
            date: date(2024, 4, 11)
        })
    );
}

#[test]
fn reconstruct_or_falls_back_to_defaults() {
    let defaults = BuilderState::default();
    assert_eq!(reconstruct_or(&[], defaults.clone()), defaults);
}

#[test]
fn reconstruct_reads_persisted_json() {
    let schedule: Schedule = serde_json::from_value(serde_json::json!({
        "doctor": "doc-3",
        "days": [
            {
                "date": "2024-03-02",
                "slots": [
                    { "startTime": "10:00", "endTime": "10:15", "type": "available", "isBooked": true, "comment": "" },
                    { "startTime": "10:15", "endTime": "10:30", "type": "break", "isBooked": false },
                    { "startTime": "10:30", "endTime": "10:45", "type": "available", "isBooked": false, "comment": "" }
                ]
            },
            {
                "date": "2024-03-01",
                "slots": [
                    { "startTime": "09:00", "endTime": "09:15", "type": "available", "isBooked": false, "comment": "" },
                    { "startTime": "09:15", "endTime": "09:30", "type": "available", "isBooked": false, "comment": "" },
                    { "startTime": "09:30", "endTime": "09:45", "type": "break", "isBooked": false, "comment": "" },
                    { "startTime": "09:45", "endTime": "10:00", "type": "break", "isBooked": false, "comment": "" }
                ]
            }
        ]
    }))
    .unwrap();

    let rebuilt = reconstruct(&schedule.days).unwrap();
    assert_eq!(rebuilt.day_start, time("09:00"));
    assert_eq!(rebuilt.day_end, time("10:00"));
    assert_eq!(rebuilt.slot_duration_minutes, 15);
    assert_eq!(rebuilt.break_count, 2);
    assert_eq!(rebuilt.break_start_index, 2);
    assert_eq!(rebuilt.date_range, DateRange::new(date(2024, 3, 1), date(2024, 3, 2)));
}
