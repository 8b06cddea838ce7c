//! CLI command handlers
//!
//! This module contains all the command handlers for the mathesis CLI.
//! Each subcommand is implemented in its own module for better organization.

pub mod analyze;
pub mod helpers;
pub mod init;
pub mod seed;
pub mod serve;
pub mod user;
