//! User Interface module
//!
//! Terminal dashboard using ratatui.

pub mod app;

pub use app::App;
