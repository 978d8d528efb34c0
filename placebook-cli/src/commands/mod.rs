//! CLI command implementations.

pub mod clear;
pub mod common;
pub mod config;
pub mod drop;
pub mod list;
pub mod nearby;
pub mod serve;
pub mod watch;
pub mod whoami;
