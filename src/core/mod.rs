//! Core building blocks shared by every shiplog command
//!
//! - **config**: shiplog.toml parsing and validation
//! - **context**: project context loaded once per run
//! - **error**: error types with exit codes and help messages
//! - **vcs**: working-copy detection and log export acquisition

pub mod config;
pub mod context;
pub mod error;
pub mod vcs;
