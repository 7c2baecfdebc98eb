// File: ./src/model/mod.rs
// Aggregates the split model files
pub mod item;
pub mod parser;

pub use item::{ClassEntry, Field, NULL_KEY, SUBSECTIONS_KEY, Slot, TimePoint, TimeRange, Timetable, UPDATE_KEY};
pub use parser::{format_update_stamp, short_year_label};
