use crate::error::{Error, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const APP_NAME: &str = "playdedup";

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Set the path to the OAuth2 client secret JSON file
    #[clap(short = 'o', long, value_name = "PATH")]
    pub oauth2_json: Option<String>,

    /// Set the pause between two video inserts, in milliseconds
    #[clap(short = 'd', long, value_name = "MILLISECONDS")]
    pub insert_delay: Option<u64>,

    /// Show the current configuration
    #[clap(short = 'l', long)]
    pub list: bool,

    /// Reset the configuration to default values
    #[clap(long)]
    pub reset: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Path to the OAuth2 client secret downloaded from the Google Cloud console
    pub oauth2_json: Option<String>,

    /// Pause between two consecutive inserts during a merge
    pub insert_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            oauth2_json: None,
            insert_delay_ms: 100,
        }
    }
}

impl Config {
    pub fn set_oauth_path(&mut self, path: String) {
        self.oauth2_json = Some(path);
    }

    pub fn insert_delay(&self) -> Duration {
        Duration::from_millis(self.insert_delay_ms)
    }

    pub fn oauth2_json(&self) -> Result<&str> {
        self.oauth2_json.as_deref().ok_or(Error::MissingOAuthJson)
    }

    /// Read the configuration from the file
    pub fn read() -> Result<Self> {
        let cfg: Config = confy::load(APP_NAME, None)?;

        Ok(cfg)
    }

    /// Write the configuration to the file
    pub fn write(&self) -> Result<()> {
        confy::store(APP_NAME, None, self)?;

        Ok(())
    }
}

/// Directory holding the configuration file and the OAuth token cache.
pub fn config_dir() -> Result<PathBuf> {
    let path = confy::get_configuration_file_path(APP_NAME, None)?;
    path.parent()
        .map(|dir| dir.to_path_buf())
        .ok_or_else(|| Error::Io(std::io::Error::other("configuration path has no parent")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.insert_delay(), Duration::from_millis(100));
        assert!(matches!(cfg.oauth2_json(), Err(Error::MissingOAuthJson)));
    }

    #[test]
    fn test_set_oauth_path() {
        let mut cfg = Config::default();
        cfg.set_oauth_path("/tmp/client_secret.json".to_string());
        assert_eq!(cfg.oauth2_json().unwrap(), "/tmp/client_secret.json");
    }
}
