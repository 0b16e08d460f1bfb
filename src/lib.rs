//! shiplog: release orchestration for versioned source trees
//!
//! - [`version`] decides the version string for a build and stamps it
//! - [`changelog`] turns a Subversion XML log export into a ChangeLog
//! - [`pipeline`] runs the gated build/test/package stages

pub mod changelog;
pub mod commands;
pub mod core;
pub mod logging;
pub mod pipeline;
pub mod utils;
pub mod version;
