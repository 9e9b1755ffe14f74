// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Command-line front end for ISO 8601 durations and time intervals.

mod cli;
mod cmd_duration;
mod cmd_format;
mod cmd_interval;
mod config;
mod report;

pub use crate::cli::{Cli, Commands, run};
pub use crate::cmd_duration::CmdDuration;
pub use crate::cmd_format::CmdFormat;
pub use crate::cmd_interval::CmdInterval;
pub use crate::config::{Config, FormatConfig, parse_config};

/// Application name, used for the binary and the config directory
pub const APP_NAME: &str = "isochron";
