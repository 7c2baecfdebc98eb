// File: ./src/client/mod.rs
// Loads the published timetable over HTTP(S) or from disk
pub mod cert;
pub mod core;

pub use self::core::{LoadError, TimetableClient, cache_busted};
