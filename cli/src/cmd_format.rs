// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, io};

use clap::{Arg, ArgMatches, Command, arg, value_parser};
use isochron_iso8601::CalendarDuration;

use crate::config::Config;

#[derive(Debug, Clone, Copy)]
pub struct CmdFormat {
    pub duration: CalendarDuration,
    pub emit_zero: bool,
}

impl CmdFormat {
    pub const NAME: &str = "format";

    pub fn command() -> Command {
        fn component(arg: Arg) -> Arg {
            arg.required(false).value_parser(value_parser!(u32))
        }

        Command::new(Self::NAME)
            .alias("f")
            .about("Build an ISO 8601 duration from its components")
            .arg(component(arg!(-Y --years <N> "Years")))
            .arg(component(arg!(-M --months <N> "Months")))
            .arg(component(arg!(-W --weeks <N> "Weeks")))
            .arg(component(arg!(-D --days <N> "Days")))
            .arg(component(arg!(-H --hours <N> "Hours")))
            .arg(component(arg!(-m --minutes <N> "Minutes")))
            .arg(component(arg!(-S --seconds <N> "Seconds")))
            .arg(arg!(--"emit-zero" "Write zero and unset components"))
    }

    pub fn from(matches: &ArgMatches) -> Self {
        let get = |id: &str| matches.get_one::<u32>(id).copied();
        Self {
            duration: CalendarDuration {
                years: get("years"),
                months: get("months"),
                weeks: get("weeks"),
                days: get("days"),
                hours: get("hours"),
                minutes: get("minutes"),
                seconds: get("seconds"),
            },
            emit_zero: matches.get_flag("emit-zero"),
        }
    }

    pub fn run(self, config: &Config) -> Result<(), Box<dyn Error>> {
        tracing::debug!(?self, "formatting duration...");
        self.write(config, &mut io::stdout())
    }

    pub fn write(&self, config: &Config, out: &mut impl io::Write) -> Result<(), Box<dyn Error>> {
        let options = config.format.duration_options(self.emit_zero);
        writeln!(out, "{}", self.duration.format_with(options))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CmdFormat {
        let cmd = Command::new("test").subcommand(CmdFormat::command());
        let matches = cmd
            .try_get_matches_from(["test", "format"].iter().chain(args))
            .unwrap();
        let sub_matches = matches.subcommand_matches("format").unwrap();
        CmdFormat::from(sub_matches)
    }

    fn write(cmd: CmdFormat) -> String {
        let mut out = vec![];
        cmd.write(&Config::default(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_format() {
        let cmd = parse(&["--years", "6", "-M", "2", "--seconds", "22"]);
        assert_eq!(cmd.duration.years, Some(6));
        assert_eq!(cmd.duration.months, Some(2));
        assert_eq!(cmd.duration.seconds, Some(22));
        assert_eq!(cmd.duration.days, None);
        assert!(!cmd.emit_zero);
    }

    #[test]
    fn test_parse_rejects_negative_components() {
        let cmd = Command::new("test").subcommand(CmdFormat::command());
        assert!(
            cmd.try_get_matches_from(["test", "format", "--years", "-1"])
                .is_err()
        );
    }

    #[test]
    fn test_write_format() {
        let cmd = parse(&[
            "-Y", "6", "-M", "2", "-W", "2", "-D", "2", "-H", "4", "-m", "44", "-S", "22",
        ]);
        assert_eq!(write(cmd), "P6Y2M2W2DT4H44M22S\n");

        let cmd = parse(&["--minutes", "90"]);
        assert_eq!(write(cmd), "PT90M\n");
    }

    #[test]
    fn test_write_empty() {
        assert_eq!(write(parse(&[])), "P\n");
        assert_eq!(write(parse(&["--emit-zero"])), "PT0S\n");
    }
}
