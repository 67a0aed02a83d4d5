//! CLI subcommands.

pub mod keys;
pub mod migrate;
pub mod themes;
