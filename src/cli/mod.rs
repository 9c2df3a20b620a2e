//! Command-line interface
//!
//! Argument definitions and command handlers for the `autofisher` binary.

pub mod args;
pub mod commands;
