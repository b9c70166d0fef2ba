//! commitscope library
//!
//! This module exports the CLI's configuration, log sources and command
//! runners for use in integration tests and as a library.

pub mod commands;
pub mod config;
pub mod source;
