// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg};
use isochron_iso8601::CalendarDuration;

use crate::config::Config;
use crate::report::Report;

#[derive(Debug, Clone)]
pub struct CmdDuration {
    pub text: String,
    pub emit_zero: bool,
}

impl CmdDuration {
    pub const NAME: &str = "duration";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("d")
            .about("Parse an ISO 8601 duration and show its components")
            .arg(arg!(text: <TEXT> "The duration, e.g. P3Y6M4DT12H30M5S or P8W"))
            .arg(arg!(--"emit-zero" "Write zero and unset components when re-formatting"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let text = match matches.get_one::<String>("text") {
            Some(text) => text.clone(),
            _ => unreachable!(),
        };
        Self {
            text,
            emit_zero: matches.get_flag("emit-zero"),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "parsing duration...");
        self.write(config, &mut io::stdout())
    }

    pub fn write(&self, config: &Config, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        let duration = CalendarDuration::parse(&self.text)?;
        let options = config.format.duration_options(self.emit_zero);

        Report::new()
            .component("years", duration.years)
            .component("months", duration.months)
            .component("weeks", duration.weeks)
            .component("days", duration.days)
            .component("hours", duration.hours)
            .component("minutes", duration.minutes)
            .component("seconds", duration.seconds)
            .row("text", duration.format_with(options))
            .write(out)?;
        Ok(())
    }
}
