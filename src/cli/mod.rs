//! CLI module for the Pomodoro Timer.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `runner`: The interactive loop driving a timer engine from stdin

pub mod commands;
pub mod display;
pub mod runner;

pub use commands::{Cli, Commands, RunArgs};
pub use display::Display;
pub use runner::{run, CommandParseError, ControlCommand};
