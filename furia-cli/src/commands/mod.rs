//! Subcommand handlers

pub mod auth;
pub mod config_cmd;
pub mod recover;
