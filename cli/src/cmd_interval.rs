// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{ArgMatches, Command, arg};
use isochron_iso8601::Interval;

use crate::config::Config;
use crate::report::Report;

#[derive(Debug, Clone)]
pub struct CmdInterval {
    pub text: String,
    pub utc: bool,
}

impl CmdInterval {
    pub const NAME: &str = "interval";

    pub fn command() -> Command {
        Command::new(Self::NAME)
            .alias("i")
            .about("Parse an ISO 8601 time interval and show its endpoints")
            .arg(arg!(text: <TEXT> "The interval: <start>/<end>, <start>/<duration> or <duration>/<end>"))
            .arg(arg!(--utc "Write the endpoints in UTC"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let text = match matches.get_one::<String>("text") {
            Some(text) => text.clone(),
            _ => unreachable!(),
        };
        Self {
            text,
            utc: matches.get_flag("utc"),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "parsing interval...");
        self.write(config, &mut io::stdout())
    }

    pub fn write(&self, config: &Config, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        let mut interval = Interval::parse(&self.text)?;
        if self.utc || config.format.utc {
            interval = interval.to_utc();
        }

        Report::new()
            .row("start", interval.start())
            .row("end", interval.end())
            .row("seconds", interval.length().as_secs())
            .row("text", interval)
            .write(out)?;
        Ok(())
    }
}
