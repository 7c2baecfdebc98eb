#![cfg(feature = "tui")]

use chrono::{NaiveDate, Weekday};
use classease::model::Timetable;
use classease::options::Level;
use classease::schedule::DayFilter;
use classease::tui::state::{AppState, Focus};
use classease::tui::view::schedule_lines;

fn saturday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn timetable() -> Timetable {
    Timetable::from_json(
        r#"{
            "Update": { "local_time_pkt": "2025-09-07 03:15 PM" },
            "BS": {
                "CS": {
                    "2023": {
                        "A": {
                            "Wednesday": [{
                                "time": {
                                    "start": { "value": 1000, "text": "10:00", "AM_PM": "AM" },
                                    "end": { "value": 1100, "text": "11:00", "AM_PM": "AM" }
                                },
                                "classes": [{ "name": "Compilers", "location": "C-301", "type": "Lecture", "info": ["Makeup", "Bring laptop"] }]
                            }]
                        }
                    }
                }
            }
        }"#,
    )
    .unwrap()
}

fn text(state: &AppState) -> Vec<String> {
    schedule_lines(state)
        .iter()
        .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
        .collect()
}

#[test]
fn weekend_start_views_monday() {
    let state = AppState::new(saturday());
    assert_eq!(state.day, DayFilter::Day(Weekday::Mon));
    assert!(state.loading);
    assert_eq!(text(&state), vec!["Loading timetable data...".to_string()]);
}

#[test]
fn picking_through_the_cascade_shows_the_schedule() {
    let mut state = AppState::new(saturday());
    state.apply_timetable(timetable());
    assert_eq!(state.last_updated.as_deref(), Some("7-Sep-2025 03:15 PM"));
    assert_eq!(
        text(&state),
        vec!["Please select all fields to view timetable.".to_string()]
    );

    for level in Level::ALL {
        assert_eq!(state.active_focus, Focus::Picker(level));
        state.confirm();
    }
    assert!(state.selection.is_complete());
    assert_eq!(state.active_focus, Focus::Schedule);
    assert_eq!(text(&state), vec!["No classes scheduled for Monday".to_string()]);

    state.active_focus = Focus::Day;
    state.next();
    state.next();
    state.confirm();
    assert_eq!(state.day, DayFilter::Day(Weekday::Wed));

    let lines = text(&state);
    assert_eq!(lines[0], "Wednesday");
    assert_eq!(lines[1], "10:00 AM - 11:00 AM");
    assert!(lines.iter().any(|l| l.trim() == "Venue: C-301"));
    assert!(lines.iter().any(|l| l.trim() == "Makeup, Bring laptop"));
}

#[test]
fn failed_load_keeps_pickers_empty() {
    let mut state = AppState::new(saturday());
    state.load_failed("connection refused");
    assert!(!state.loading);
    assert!(state.message.starts_with("Error"));
    assert!(state.visible_levels().is_empty());
    assert_eq!(state.focus_order(), vec![Focus::Day, Focus::Schedule]);
    assert_eq!(state.active_focus, Focus::Day);

    state.toggle_focus();
    assert_eq!(state.active_focus, Focus::Schedule);
    state.toggle_focus();
    assert_eq!(state.active_focus, Focus::Day);
}

#[test]
fn malformed_stamp_reads_unknown() {
    let mut state = AppState::new(saturday());
    state.apply_timetable(
        Timetable::from_json(r#"{ "Update": { "local_time_pkt": "soon" } }"#).unwrap(),
    );
    assert_eq!(state.last_updated.as_deref(), Some("unknown"));
}
