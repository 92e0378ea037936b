//! CLI command implementations.

pub mod init;
pub mod signals;
pub mod strategies;
pub mod validate;
