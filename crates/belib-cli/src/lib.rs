//! Belib' locator CLI library.
//!
//! Subcommand handlers, output rendering and terminal helpers behind the
//! `belib` binary.

pub mod commands;
pub mod output;
pub mod terminal;
