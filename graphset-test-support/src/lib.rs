//! Shared test utilities used across graphset crates.

pub mod profile;
pub mod recording;
