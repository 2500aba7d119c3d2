//! CLI command implementations.

pub(crate) mod config;
pub(crate) mod fetch;

pub(crate) use config::ConfigCommand;
pub(crate) use fetch::FetchArgs;
