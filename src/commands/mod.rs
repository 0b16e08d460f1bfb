//! CLI commands for shiplog
//!
//! ## Pipeline targets
//! - **build / test / install / dist / doc / clean**: run the stages of a target
//!
//! ## Standalone tools
//! - **version**: resolve the package version, optionally stamping it
//! - **changelog**: generate the changelog from a log export
//! - **init**: create shiplog.toml
//!
//! Commands that need configuration accept `&ProjectContext` so it is loaded once.

pub mod changelog;
pub mod init;
pub mod pipeline;
pub mod version;

pub use changelog::run_changelog;
pub use init::run_init;
pub use pipeline::run_target;
pub use version::run_version;
