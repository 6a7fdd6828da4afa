//! # Configuration
//!
//! Settings for the CareBridge client: which API origin to talk to, how to
//! log, and where a native client keeps its credential.

pub mod client;

pub use client::{ClientConfig, ConfigError, LogFormat};
