//! Shared pieces of the fwgen build tooling.
//!
//! Provides the project configuration ([`config::FwgenConfig`]) and the
//! marker-region patcher ([`patch`]) used to inject generated tables into
//! firmware headers.

pub mod config;
pub mod patch;
