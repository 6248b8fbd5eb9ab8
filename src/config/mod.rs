//! Configuration model for kvlock.
//!
//! This module defines the `LockConfig` struct, usually read from a YAML file.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, and validation of config values.

mod model;
mod operations;


pub use model::LockConfig;
