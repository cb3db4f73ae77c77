//! CLI command implementations.

pub mod call;
pub mod prompt;
pub mod serve;
pub mod tools;
