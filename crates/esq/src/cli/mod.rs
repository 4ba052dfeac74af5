//! CLI support for the `esq` binary.

pub mod args;
pub mod commands;
pub mod context;
pub mod logger;
pub mod output;

