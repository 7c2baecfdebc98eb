// File: ./src/options.rs
// Derives the choices offered at each level of the cascading pickers
use std::fmt;

use crate::model::{NULL_KEY, SUBSECTIONS_KEY, Timetable, UPDATE_KEY, short_year_label};

/// Top-level keys that are not programs a student can pick.
pub const HIDDEN_PROGRAMS: [&str; 3] = [UPDATE_KEY, "Other", "PHD"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Program,
    Department,
    BatchYear,
    Section,
}

impl Level {
    pub const ALL: [Level; 4] = [
        Level::Program,
        Level::Department,
        Level::BatchYear,
        Level::Section,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Level::Program => "Program",
            Level::Department => "Department",
            Level::BatchYear => "Batch Year",
            Level::Section => "Section",
        }
    }

    pub fn next(self) -> Option<Level> {
        match self {
            Level::Program => Some(Level::Department),
            Level::Department => Some(Level::BatchYear),
            Level::BatchYear => Some(Level::Section),
            Level::Section => None,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// One entry of a picker: `value` is what gets selected, `label` what is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerOption {
    pub value: String,
    pub label: String,
}

impl PickerOption {
    fn plain(value: String) -> Self {
        Self {
            label: value.clone(),
            value,
        }
    }
}

pub fn raw_programs(tt: &Timetable) -> Vec<String> {
    tt.child_keys(&[])
        .into_iter()
        .filter(|k| !HIDDEN_PROGRAMS.contains(&k.as_str()))
        .collect()
}

pub fn raw_departments(tt: &Timetable, program: &str) -> Vec<String> {
    tt.child_keys(&[program])
}

pub fn raw_batch_years(tt: &Timetable, program: &str, department: &str) -> Vec<String> {
    tt.child_keys(&[program, department])
}

pub fn raw_sections(tt: &Timetable, program: &str, department: &str, batch_year: &str) -> Vec<String> {
    tt.child_keys(&[program, department, batch_year])
        .into_iter()
        .filter(|k| k != SUBSECTIONS_KEY)
        .collect()
}

/// Drops empty and `null` entries, splits `A/B` into `A` and `B`, and
/// removes duplicates. First-seen order is kept so the pickers are stable.
pub fn clean_options(raw: &[String]) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for opt in raw {
        if is_blank_or_null(opt) {
            continue;
        }
        for part in opt.split('/') {
            let part = part.trim();
            if is_blank_or_null(part) || cleaned.iter().any(|c| c == part) {
                continue;
            }
            cleaned.push(part.to_string());
        }
    }
    cleaned
}

fn is_blank_or_null(s: &str) -> bool {
    let s = s.trim();
    s.is_empty() || s.eq_ignore_ascii_case(NULL_KEY)
}

/// A level holding nothing but the `null` bucket has no real choice to make.
pub fn is_undifferentiated(raw: &[String]) -> bool {
    !raw.is_empty() && raw.iter().all(|o| o.eq_ignore_ascii_case(NULL_KEY))
}

pub fn program_options(tt: &Timetable) -> Vec<PickerOption> {
    plain_options(&raw_programs(tt))
}

pub fn department_options(tt: &Timetable, program: &str) -> Vec<PickerOption> {
    plain_options(&raw_departments(tt, program))
}

pub fn batch_year_options(tt: &Timetable, program: &str, department: &str) -> Vec<PickerOption> {
    clean_options(&raw_batch_years(tt, program, department))
        .into_iter()
        .map(|year| PickerOption {
            label: short_year_label(&year).to_string(),
            value: year,
        })
        .collect()
}

pub fn section_options(
    tt: &Timetable,
    program: &str,
    department: &str,
    batch_year: &str,
) -> Vec<PickerOption> {
    plain_options(&raw_sections(tt, program, department, batch_year))
}

fn plain_options(raw: &[String]) -> Vec<PickerOption> {
    clean_options(raw)
        .into_iter()
        .map(PickerOption::plain)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn splits_and_dedupes() {
        let cleaned = clean_options(&strings(&["CS", "CS/EE", " AI / EE ", "EE"]));
        assert_eq!(cleaned, strings(&["CS", "EE", "AI"]));
    }

    #[test]
    fn drops_null_and_empty() {
        let cleaned = clean_options(&strings(&["", "null", "NULL", "A", "B/null", "C/"]));
        assert_eq!(cleaned, strings(&["A", "B", "C"]));
    }

    #[test]
    fn undifferentiated_levels() {
        assert!(is_undifferentiated(&strings(&["null"])));
        assert!(is_undifferentiated(&strings(&["NULL", "Null"])));
        assert!(!is_undifferentiated(&strings(&["null", "A"])));
        assert!(!is_undifferentiated(&[]));
    }

    #[test]
    fn level_chain() {
        assert_eq!(Level::Program.next(), Some(Level::Department));
        assert_eq!(Level::Section.next(), None);
        assert_eq!(Level::BatchYear.index(), 2);
    }
}
