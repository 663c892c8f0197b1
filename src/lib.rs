//! Shared library for `exchange-planner`
//! Contains the exchange-plan core used by the CLI and by library consumers

pub mod core;
pub mod logger;

pub use self::core::config;

/// Returns the current version of the `exchange-planner` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
