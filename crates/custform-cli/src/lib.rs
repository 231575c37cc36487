//! Command line front end for the customer form.

mod cli;
pub mod commands;
pub mod script;

pub use cli::Cli;
