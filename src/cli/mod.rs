//! Command-line front-end module
//!
//! Stands in for the browser page: the `signal` subcommand is the trigger,
//! the terminal is the display, and a JSON file is the local storage.

pub mod handlers;

// Re-export main functions
pub use handlers::dispatch;
