// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, fs, path::PathBuf, str::FromStr};

use isochron_iso8601::FormatOptions;

use crate::APP_NAME;

const ISOCHRON_CONFIG_ENV: &str = "ISOCHRON_CONFIG";

/// Load the configuration from `--config`, `$ISOCHRON_CONFIG`, or the user
/// config directory, in that order.
///
/// An explicitly named file must exist. Without one, a missing file in the
/// config directory falls back to the defaults.
#[tracing::instrument]
pub fn parse_config(path: Option<PathBuf>) -> Result<Config, Box<dyn Error>> {
    let path = if let Some(path) = path {
        path
    } else if let Ok(env_path) = std::env::var(ISOCHRON_CONFIG_ENV) {
        PathBuf::from(env_path)
    } else {
        let Some(config) = dirs::config_dir().map(|a| a.join(format!("{APP_NAME}/config.toml")))
        else {
            tracing::debug!("user config directory not found, using defaults");
            return Ok(Config::default());
        };
        if !config.exists() {
            tracing::debug!(path = %config.display(), "no config found, using defaults");
            return Ok(Config::default());
        }
        config
    };

    fs::read_to_string(&path)
        .map_err(|e| format!("Failed to read config file at {}: {}", path.display(), e))?
        .parse::<ConfigRaw>()
        .map(Config::from)
}

/// Configuration for the isochron command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Defaults for formatting output
    pub format: FormatConfig,
}

/// The `[format]` table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Write zero and unset duration components
    pub emit_zero_or_unset: bool,

    /// Write interval endpoints in UTC
    pub utc: bool,
}

impl FormatConfig {
    /// Duration format options, with a command-line flag that can only turn
    /// zero emission on.
    pub fn duration_options(self, emit_zero: bool) -> FormatOptions {
        FormatOptions {
            emit_zero_or_unset: emit_zero || self.emit_zero_or_unset,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
struct ConfigRaw {
    format: Option<FormatConfig>,
}

impl FromStr for ConfigRaw {
    type Err = Box<dyn Error>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl From<ConfigRaw> for Config {
    fn from(raw: ConfigRaw) -> Self {
        Self {
            format: raw.format.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use std::sync::{Mutex, OnceLock};

    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn parses_format_table() {
        let raw: ConfigRaw = r"
[format]
emit_zero_or_unset = true
utc = true
"
        .parse()
        .unwrap();

        let config = Config::from(raw);
        assert!(config.format.emit_zero_or_unset);
        assert!(config.format.utc);
    }

    #[test]
    fn missing_keys_use_defaults() {
        let config = Config::from("".parse::<ConfigRaw>().unwrap());
        assert_eq!(config, Config::default());

        let config = Config::from("[format]\nutc = true\n".parse::<ConfigRaw>().unwrap());
        assert!(!config.format.emit_zero_or_unset);
        assert!(config.format.utc);
    }

    #[test]
    fn rejects_invalid_toml() {
        assert!("[format]\nutc = \"yes\"\n".parse::<ConfigRaw>().is_err());
        assert!("[format".parse::<ConfigRaw>().is_err());
    }

    #[test]
    fn flag_turns_on_zero_emission() {
        let format = FormatConfig::default();
        assert!(!format.duration_options(false).emit_zero_or_unset);
        assert!(format.duration_options(true).emit_zero_or_unset);

        let format = FormatConfig {
            emit_zero_or_unset: true,
            utc: false,
        };
        assert!(format.duration_options(false).emit_zero_or_unset);
    }

    #[test]
    fn cli_flag_overrides_env_var() {
        let temp_dir = TempDir::new().unwrap();
        let flag_path = write_config(&temp_dir, "flag.toml", "[format]\nutc = true\n");
        let env_path = write_config(
            &temp_dir,
            "env.toml",
            "[format]\nemit_zero_or_unset = true\n",
        );

        let _guard = env_lock().lock().unwrap();
        unsafe {
            std::env::set_var(ISOCHRON_CONFIG_ENV, &env_path);
        }

        let from_flag = parse_config(Some(flag_path));
        let from_env = parse_config(None);

        unsafe {
            std::env::remove_var(ISOCHRON_CONFIG_ENV);
        }

        let from_flag = from_flag.unwrap();
        assert!(from_flag.format.utc);
        assert!(!from_flag.format.emit_zero_or_unset);

        let from_env = from_env.unwrap();
        assert!(!from_env.format.utc);
        assert!(from_env.format.emit_zero_or_unset);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing.toml");

        let err = parse_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"), "{err}");
    }
}
