//! CLI subcommands.

pub mod accounts;
pub mod config;
pub mod scan;
