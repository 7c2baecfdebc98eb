// File: ./src/schedule.rs
// Resolves a complete selection into the slots shown for a day or week
use crate::model::{Field, SUBSECTIONS_KEY, Slot, Timetable, item::slots_of};
use crate::selection::SectionPath;
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::HashSet;
use std::fmt;

/// Days that can be viewed, in display order.
pub const TEACHING_DAYS: [Weekday; 5] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFilter {
    Day(Weekday),
    WholeWeek,
}

impl DayFilter {
    /// Every value the day picker offers.
    pub const CHOICES: [DayFilter; 6] = [
        DayFilter::Day(Weekday::Mon),
        DayFilter::Day(Weekday::Tue),
        DayFilter::Day(Weekday::Wed),
        DayFilter::Day(Weekday::Thu),
        DayFilter::Day(Weekday::Fri),
        DayFilter::WholeWeek,
    ];

    /// The filter the app opens with: today, or Monday on a weekend.
    pub fn default_for(today: NaiveDate) -> Self {
        match today.weekday() {
            Weekday::Sat | Weekday::Sun => DayFilter::Day(Weekday::Mon),
            day => DayFilter::Day(day),
        }
    }

    pub fn days(self) -> Vec<Weekday> {
        match self {
            DayFilter::Day(d) => vec![d],
            DayFilter::WholeWeek => TEACHING_DAYS.to_vec(),
        }
    }
}

impl fmt::Display for DayFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayFilter::Day(d) => f.write_str(day_key(*d)),
            DayFilter::WholeWeek => f.write_str("Whole Week"),
        }
    }
}

/// Day names as they appear as keys in the timetable.
pub fn day_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DaySchedule {
    pub main: Vec<Slot>,
    /// Subsection name → slots, in the order the subsections appear.
    pub subsections: Vec<(String, Vec<Slot>)>,
}

impl DaySchedule {
    pub fn is_empty(&self) -> bool {
        self.main.is_empty() && self.subsections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayBlock {
    pub day: Weekday,
    pub schedule: DaySchedule,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// At least one day has something to show.
    Days(Vec<DayBlock>),
    /// Nothing scheduled for the requested day or week.
    NoClasses(DayFilter),
}

impl Resolved {
    pub fn blocks(&self) -> &[DayBlock] {
        match self {
            Resolved::Days(blocks) => blocks,
            Resolved::NoClasses(_) => &[],
        }
    }
}

/// Identity of a class occurrence: start, end, name, location, type.
type ClassKey = (u64, u64, Field, Field, Field);

/// Keeps the first occurrence of every class (same time range, name,
/// location and type) and drops slots that end up empty.
pub fn dedupe_slots(slots: Vec<Slot>) -> Vec<Slot> {
    let mut seen: HashSet<ClassKey> = HashSet::new();
    let mut result = Vec::with_capacity(slots.len());

    for mut slot in slots {
        let (start, end) = (time_bits(slot.start_value()), time_bits(slot.end_value()));
        slot.classes.retain(|cls| {
            seen.insert((
                start,
                end,
                cls.name.clone(),
                cls.location.clone(),
                cls.kind.clone(),
            ))
        });
        if !slot.classes.is_empty() {
            result.push(slot);
        }
    }
    result
}

// 0.0 and -0.0 compare equal as sort values, so they share a key too.
fn time_bits(v: f64) -> u64 {
    if v == 0.0 { 0 } else { v.to_bits() }
}

/// Stable ascending sort on start value.
pub fn sort_slots(slots: &mut [Slot]) {
    slots.sort_by(|a, b| a.start_value().total_cmp(&b.start_value()));
}

/// Everything scheduled for one concrete day.
pub fn resolve_day(tt: &Timetable, path: &SectionPath<'_>, day: Weekday) -> DaySchedule {
    let key = day_key(day);

    let mut merged = tt.day_slots(&path.section_keys(), key);
    merged.extend(tt.day_slots(&path.fallback_keys(), key));
    let mut main = dedupe_slots(merged);
    sort_slots(&mut main);

    let mut subsections: Vec<(String, Vec<Slot>)> = Vec::new();
    let section_keys = path.section_keys();
    let subsection_maps = tt
        .nodes(&section_keys)
        .into_iter()
        .filter_map(|section| section.get(SUBSECTIONS_KEY)?.as_object());
    for subs in subsection_maps {
        for (name, sub) in subs {
            let Some(sub) = sub.as_object() else {
                continue;
            };
            let slots = slots_of(sub, key);
            match subsections.iter_mut().find(|(n, _)| n == name) {
                Some((_, existing)) => existing.extend(slots),
                None => subsections.push((name.clone(), slots)),
            }
        }
    }
    for (_, slots) in subsections.iter_mut() {
        *slots = dedupe_slots(std::mem::take(slots));
        sort_slots(slots);
    }
    subsections.retain(|(_, slots)| !slots.is_empty());

    DaySchedule { main, subsections }
}

/// Resolves a single day or the whole teaching week. Days with nothing to
/// show are left out; if that leaves nothing, the result says so.
pub fn resolve(tt: &Timetable, path: &SectionPath<'_>, filter: DayFilter) -> Resolved {
    let blocks: Vec<DayBlock> = filter
        .days()
        .into_iter()
        .map(|day| DayBlock {
            day,
            schedule: resolve_day(tt, path, day),
        })
        .filter(|block| !block.schedule.is_empty())
        .collect();

    if blocks.is_empty() {
        Resolved::NoClasses(filter)
    } else {
        Resolved::Days(blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekend_defaults_to_monday() {
        // 2026-10-17 is a Saturday, 2026-10-18 a Sunday
        let sat = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        let sun = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let thu = NaiveDate::from_ymd_opt(2026, 10, 22).unwrap();
        assert_eq!(DayFilter::default_for(sat), DayFilter::Day(Weekday::Mon));
        assert_eq!(DayFilter::default_for(sun), DayFilter::Day(Weekday::Mon));
        assert_eq!(DayFilter::default_for(thu), DayFilter::Day(Weekday::Thu));
    }

    #[test]
    fn filter_labels() {
        assert_eq!(DayFilter::Day(Weekday::Wed).to_string(), "Wednesday");
        assert_eq!(DayFilter::WholeWeek.to_string(), "Whole Week");
        assert_eq!(DayFilter::WholeWeek.days().len(), 5);
    }
}
