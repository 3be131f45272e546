//! Command-line interface and the identifier types it parses.

pub mod args;
pub mod types;

pub use args::{Cli, CollectArgs, Commands, ServeArgs};
