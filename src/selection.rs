// File: ./src/selection.rs
// The four cascading filters and their invalidation rules
use crate::model::{NULL_KEY, Timetable};
use crate::options::{self, Level, PickerOption};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error("{missing} must be chosen before {level}")]
    UpstreamMissing { level: Level, missing: Level },
    #[error("'{value}' is not offered for {level}")]
    NotOffered { level: Level, value: String },
}

/// Program → Department → Batch Year → Section.
///
/// Invariant: a level is only ever set when every level above it is set.
/// Changing a level clears everything below it, then any level that offers
/// nothing but the `null` bucket is filled in automatically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    values: [Option<String>; 4],
}

/// A fully specified selection, borrowed from a [`Selection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionPath<'a> {
    pub program: &'a str,
    pub department: &'a str,
    pub batch_year: &'a str,
    pub section: &'a str,
}

impl<'a> SectionPath<'a> {
    pub fn new(program: &'a str, department: &'a str, batch_year: &'a str, section: &'a str) -> Self {
        Self {
            program,
            department,
            batch_year,
            section,
        }
    }

    pub fn section_keys(&self) -> [&'a str; 4] {
        [self.program, self.department, self.batch_year, self.section]
    }

    /// The shared bucket of the same batch year.
    pub fn fallback_keys(&self) -> [&'a str; 4] {
        [self.program, self.department, self.batch_year, NULL_KEY]
    }
}

impl Selection {
    pub fn get(&self, level: Level) -> Option<&str> {
        self.values[level.index()].as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    pub fn path(&self) -> Option<SectionPath<'_>> {
        Some(SectionPath::new(
            self.get(Level::Program)?,
            self.get(Level::Department)?,
            self.get(Level::BatchYear)?,
            self.get(Level::Section)?,
        ))
    }

    /// Raw keys for `level`, or `None` while an upstream level is unset.
    fn raw_options(&self, tt: &Timetable, level: Level) -> Option<Vec<String>> {
        Some(match level {
            Level::Program => options::raw_programs(tt),
            Level::Department => options::raw_departments(tt, self.get(Level::Program)?),
            Level::BatchYear => options::raw_batch_years(
                tt,
                self.get(Level::Program)?,
                self.get(Level::Department)?,
            ),
            Level::Section => options::raw_sections(
                tt,
                self.get(Level::Program)?,
                self.get(Level::Department)?,
                self.get(Level::BatchYear)?,
            ),
        })
    }

    /// What the picker for `level` offers right now. Empty when upstream is
    /// incomplete or the data has nothing at that level.
    pub fn options(&self, tt: &Timetable, level: Level) -> Vec<PickerOption> {
        let (Some(program), department, batch_year) = (
            self.get(Level::Program),
            self.get(Level::Department),
            self.get(Level::BatchYear),
        ) else {
            return match level {
                Level::Program => options::program_options(tt),
                _ => vec![],
            };
        };
        match (level, department, batch_year) {
            (Level::Program, _, _) => options::program_options(tt),
            (Level::Department, _, _) => options::department_options(tt, program),
            (Level::BatchYear, Some(department), _) => {
                options::batch_year_options(tt, program, department)
            }
            (Level::Section, Some(department), Some(batch_year)) => {
                options::section_options(tt, program, department, batch_year)
            }
            _ => vec![],
        }
    }

    pub fn select(&mut self, tt: &Timetable, level: Level, value: &str) -> Result<(), SelectError> {
        if let Some(missing) = Level::ALL[..level.index()]
            .iter()
            .copied()
            .find(|l| self.get(*l).is_none())
        {
            return Err(SelectError::UpstreamMissing { level, missing });
        }
        if self.get(level) == Some(value) {
            return Ok(());
        }

        let offered = self.options(tt, level).iter().any(|o| o.value == value)
            || (value == NULL_KEY
                && self
                    .raw_options(tt, level)
                    .is_some_and(|raw| options::is_undifferentiated(&raw)));
        if !offered {
            return Err(SelectError::NotOffered {
                level,
                value: value.to_string(),
            });
        }

        log::debug!("{} set to '{}'", level, value);
        self.clear(level);
        self.values[level.index()] = Some(value.to_string());
        self.auto_fill(tt, level.next());
        Ok(())
    }

    /// Unsets `level` and every level below it.
    pub fn clear(&mut self, level: Level) {
        for slot in &mut self.values[level.index()..] {
            *slot = None;
        }
    }

    fn auto_fill(&mut self, tt: &Timetable, mut next: Option<Level>) {
        while let Some(level) = next {
            if self.get(level).is_some() {
                break;
            }
            match self.raw_options(tt, level) {
                Some(raw) if options::is_undifferentiated(&raw) => {
                    log::debug!("{} has only the shared bucket, selecting it", level);
                    self.values[level.index()] = Some(NULL_KEY.to_string());
                    next = level.next();
                }
                _ => break,
            }
        }
    }

    /// Re-validates every level against `tt`, dropping the first value that
    /// no longer exists (and everything below it). Used after a (re)load.
    pub fn reconcile(&mut self, tt: &Timetable) {
        for level in Level::ALL {
            let Some(value) = self.get(level).map(str::to_string) else {
                break;
            };
            let still_offered = self.options(tt, level).iter().any(|o| o.value == value)
                || (value == NULL_KEY
                    && self
                        .raw_options(tt, level)
                        .is_some_and(|raw| options::is_undifferentiated(&raw)));
            if !still_offered {
                log::info!("{} '{}' is gone from the timetable", level, value);
                self.clear(level);
                break;
            }
        }
        let first_unset = Level::ALL.into_iter().find(|l| self.get(*l).is_none());
        self.auto_fill(tt, first_unset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Timetable {
        Timetable::from_value(json!({
            "BS": {
                "CS": {
                    "2023": { "A": {}, "B": {}, "null": {}, "Subsections": {} },
                    "2024": { "null": {} }
                },
                "null": { "null": { "null": {} } }
            },
            "MS": { "null": { "2025": { "A": {} } } }
        }))
        .unwrap()
    }

    #[test]
    fn changing_a_level_clears_below() {
        let tt = sample();
        let mut sel = Selection::default();
        sel.select(&tt, Level::Program, "BS").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        sel.select(&tt, Level::BatchYear, "2023").unwrap();
        sel.select(&tt, Level::Section, "A").unwrap();
        assert!(sel.is_complete());

        sel.select(&tt, Level::BatchYear, "2024").unwrap();
        assert_eq!(sel.get(Level::BatchYear), Some("2024"));
        // 2024 only has the shared bucket
        assert_eq!(sel.get(Level::Section), Some("null"));
    }

    #[test]
    fn reselecting_same_value_keeps_lower_levels() {
        let tt = sample();
        let mut sel = Selection::default();
        sel.select(&tt, Level::Program, "BS").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        sel.select(&tt, Level::BatchYear, "2023").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        assert_eq!(sel.get(Level::BatchYear), Some("2023"));
    }

    #[test]
    fn null_only_levels_cascade() {
        let tt = sample();
        let mut sel = Selection::default();
        sel.select(&tt, Level::Program, "MS").unwrap();
        assert_eq!(sel.get(Level::Department), Some("null"));
        assert_eq!(sel.get(Level::BatchYear), None);
        let years: Vec<_> = sel
            .options(&tt, Level::BatchYear)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(years, vec!["25".to_string()]);
    }

    #[test]
    fn rejects_out_of_order_and_unknown_values() {
        let tt = sample();
        let mut sel = Selection::default();
        assert_eq!(
            sel.select(&tt, Level::Section, "A"),
            Err(SelectError::UpstreamMissing {
                level: Level::Section,
                missing: Level::Program
            })
        );
        assert!(matches!(
            sel.select(&tt, Level::Program, "Update"),
            Err(SelectError::NotOffered { .. })
        ));
    }

    #[test]
    fn sections_hide_subsections_and_null() {
        let tt = sample();
        let mut sel = Selection::default();
        sel.select(&tt, Level::Program, "BS").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        sel.select(&tt, Level::BatchYear, "2023").unwrap();
        let sections: Vec<_> = sel
            .options(&tt, Level::Section)
            .into_iter()
            .map(|o| o.value)
            .collect();
        assert_eq!(sections, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn reconcile_drops_vanished_values() {
        let tt = sample();
        let mut sel = Selection::default();
        sel.select(&tt, Level::Program, "BS").unwrap();
        sel.select(&tt, Level::Department, "CS").unwrap();
        sel.select(&tt, Level::BatchYear, "2023").unwrap();

        let smaller = Timetable::from_value(json!({
            "BS": { "CS": { "2024": { "A": {} } } }
        }))
        .unwrap();
        sel.reconcile(&smaller);
        assert_eq!(sel.get(Level::Department), Some("CS"));
        assert_eq!(sel.get(Level::BatchYear), None);
    }
}
