pub mod answers;
pub mod api;
pub mod catalog;
pub mod cli;
pub mod debounce;
pub mod error;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod parser;
pub mod prefs;
pub mod progress;
pub mod results;
pub mod session;
pub mod state;
pub mod sync;
pub mod tui;
pub mod ui;
