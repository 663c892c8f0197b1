//! CLI command handlers for `explan`.
//!
//! This module provides handlers for various CLI subcommands.
//! Each command is implemented in its own submodule.

pub mod config;
pub mod export;
pub mod resolve;
pub mod status;
