//! CLI subcommands

pub mod call;
pub mod config;
pub mod list;
