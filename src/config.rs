use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::range::ParsePolicy;
use crate::render::Theme;

const CONFIG_PATH_ENV_VAR: &str = "CREWCAL_CONFIG_FILE";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }

    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("crewcal").join("config.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".crewcal.toml"));
    }

    locations
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    pub policy: ParsePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parse: ParseConfig,
    pub theme: Theme,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::from(e).with_msg(&format!("Could not read config '{}'", path.display()))
        })?;
        content.parse()
    }
}

impl FromStr for Config {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}

/// Loads `path` if given, otherwise the first existing file out of the
/// usual locations. Without any config file the defaults apply.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading config from '{}'", path.display());
        return Config::load(path);
    }

    match find_configfile_locations()
        .into_iter()
        .find(|location| location.is_file())
    {
        Some(location) => {
            log::info!("Loading config from '{}'", location.display());
            Config::load(&location)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_config_uses_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.parse.policy, ParsePolicy::Lenient);
        assert_eq!(config.theme.today_char, '*');
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: Config = r#"
            [parse]
            policy = "strict"

            [theme]
            run_open = "["
            show_filler = false
        "#
        .parse()
        .unwrap();

        assert_eq!(config.parse.policy, ParsePolicy::Strict);
        assert_eq!(config.theme.run_open, '[');
        assert_eq!(config.theme.run_close, ')');
        assert!(!config.theme.show_filler);
    }

    #[test]
    fn unknown_policy_is_a_config_error() {
        let err = "[parse]\npolicy = \"sloppy\"".parse::<Config>().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ConfigParse));
        assert!(err.to_string().contains("sloppy"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let path = env::temp_dir().join("crewcal-does-not-exist.toml");
        let err = load_suitable_config(Some(&path)).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::IOError(_)));
    }

    #[test]
    fn explicit_file_is_loaded() {
        let path = env::temp_dir().join(format!("crewcal-config-{}.toml", std::process::id()));
        fs::write(&path, "[theme]\ntoday_char = \"#\"\n").unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.theme.today_char, '#');
    }
}
