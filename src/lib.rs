pub mod client;
pub mod config;
pub mod logging;
pub mod model;
pub mod options;
pub mod schedule;
pub mod selection;

#[cfg(feature = "tui")]
pub mod tui;
