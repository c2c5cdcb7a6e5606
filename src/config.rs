//! Configuration management for the plotrc command-line tool.
//!
//! This module handles the layered configuration with the following precedence:
//! 1. Command-line `--set KEY=VALUE` overrides (highest priority)
//! 2. Environment variables (`PLOTRC_CONFIG`, `PLOTRC_LOG_LEVEL`)
//! 3. JSON config file
//! 4. Built-in rc defaults (lowest priority)

use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlotError, Result};
use crate::rc::{apply_order, Configurator, RcTable, RcValue};

/// Command-line arguments for plotrc
#[derive(Parser, Debug)]
#[command(name = "plotrc")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "PLOTRC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "PLOTRC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override an rc setting, e.g. `--set tick.len=5` or `--set coastcolor=black`
    #[arg(short, long = "set", value_name = "KEY=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, RcValue)>,

    #[command(subcommand)]
    pub command: Command,
}

/// What the tool should do once the rc settings are in place
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the value of one or more rc settings
    Get {
        #[arg(required = true)]
        keys: Vec<String>,
    },
    /// Print every rc setting, optionally only those below a prefix
    List { prefix: Option<String> },
    /// Resolve colorbar keywords against the current settings and print the result
    Colorbar {
        /// Colorbar keyword, e.g. `--kw ticks=[0,1,2]` or `--kw loc=bottom`
        #[arg(short, long = "kw", value_name = "KEY=VALUE", value_parser = parse_override)]
        kwargs: Vec<(String, RcValue)>,

        /// Width of the colorbar axes in inches
        #[arg(long, default_value = "0.2")]
        width: f64,

        /// Height of the colorbar axes in inches
        #[arg(long, default_value = "4.0")]
        height: f64,
    },
}

/// Parse `KEY=VALUE`; the value is read as JSON when possible, else as a string
pub fn parse_override(raw: &str) -> std::result::Result<(String, RcValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got {:?}", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in {:?}", raw));
    }
    let value = value.trim();
    let value = serde_json::from_str::<RcValue>(value)
        .unwrap_or_else(|_| RcValue::Text(value.to_string()));
    Ok((key.to_string(), value))
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// rc settings to apply on top of the built-in defaults
    #[serde(default)]
    pub rc: IndexMap<String, RcValue>,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        Self::from_args(Args::parse())
    }

    /// Build the configuration from already parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, Command)> {
        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        config.rc.extend(args.overrides);

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.log_level = other.log_level;
        self.rc.extend(other.rc);
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(PlotError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        // Every rc key must exist; values are checked when applied
        let table = RcTable::builtin();
        if let Some(key) = self.rc.keys().find(|key| !table.contains(key)) {
            return Err(PlotError::Config {
                message: format!("Unknown rc setting in configuration: {:?}", key),
            });
        }

        Ok(())
    }

    /// Install the rc section as process defaults of `rc`.
    ///
    /// Returns the keys applied, in application order.
    pub fn apply(&self, rc: &Configurator) -> Result<Vec<String>> {
        let mut applied = Vec::with_capacity(self.rc.len());
        for (key, value) in apply_order(self.rc.clone()) {
            rc.update_global(&key, value)?;
            applied.push(key);
        }
        Ok(applied)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            rc: IndexMap::new(),
        }
    }
}

// Default value functions for serde
fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.rc.is_empty());
    }

    #[test]
    fn test_config_merge() {
        let mut config1 = Config::default();
        config1.rc.insert("tick.len".to_string(), RcValue::from(3.0));
        config1.rc.insert("abc".to_string(), RcValue::Bool(false));

        let mut config2 = Config::default();
        config2.log_level = "debug".to_string();
        config2.rc.insert("tick.len".to_string(), RcValue::from(5.0));

        config1.merge(config2);

        assert_eq!(config1.log_level, "debug");
        assert_eq!(config1.rc.get("tick.len"), Some(&RcValue::from(5.0)));
        assert_eq!(config1.rc.get("abc"), Some(&RcValue::Bool(false)));
    }

    #[test]
    fn test_config_validation() {
        // Valid config should pass
        let config = Config::default();
        assert!(config.validate().is_ok());

        // Test invalid log level
        let mut config = Config::default();
        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());

        // Test unknown rc key
        let mut config = Config::default();
        config
            .rc
            .insert("doesnotexist".to_string(), RcValue::from("test"));
        assert!(matches!(config.validate(), Err(PlotError::Config { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"log_level": "info", "rc": {{"coastcolor": "black", "tick.len": "0.5em"}}}}"#
        )
        .unwrap();

        let config = Config::load_from_file(file.path()).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.rc.get("coastcolor"), Some(&RcValue::from("black")));
        assert_eq!(config.rc.get("tick.len"), Some(&RcValue::from("0.5em")));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = Config::load_from_file(Path::new("/nonexistent/plotrc.json"));
        assert!(matches!(result, Err(PlotError::Io(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"rc": {{"coastcolor": "black", "abc": "A."}}}}"#).unwrap();
        let path = file.path().to_string_lossy().to_string();

        let args = Args::try_parse_from([
            "plotrc",
            "--config",
            path.as_str(),
            "--set",
            "coastcolor=red",
            "get",
            "coastcolor",
        ])
        .unwrap();
        let (config, command) = Config::from_args(args).unwrap();

        assert_eq!(config.rc.get("coastcolor"), Some(&RcValue::from("red")));
        assert_eq!(config.rc.get("abc"), Some(&RcValue::from("A.")));
        assert!(matches!(command, Command::Get { ref keys } if keys == &["coastcolor"]));
    }

    #[test]
    fn test_parse_override() {
        assert_eq!(
            parse_override("tick.len=5").unwrap(),
            ("tick.len".to_string(), RcValue::from(5.0))
        );
        assert_eq!(
            parse_override("grid=false").unwrap(),
            ("grid".to_string(), RcValue::Bool(false))
        );
        assert_eq!(
            parse_override("coastcolor=black").unwrap(),
            ("coastcolor".to_string(), RcValue::from("black"))
        );
        assert_eq!(
            parse_override("ticks=[1,2,3]").unwrap().1,
            RcValue::from(vec![1.0, 2.0, 3.0])
        );
        assert!(parse_override("novalue").is_err());
        assert!(parse_override("=1").is_err());
    }

    #[test]
    fn test_apply_installs_defaults() {
        let mut config = Config::default();
        config.rc.insert("grid".to_string(), RcValue::Bool(true));
        config.rc.insert("gridminor".to_string(), RcValue::Bool(true));

        let rc = Configurator::new();
        let applied = config.apply(&rc).unwrap();
        assert_eq!(applied, vec!["gridminor".to_string(), "grid".to_string()]);
        assert_eq!(rc.get_str("axes.grid.which").unwrap(), "both");

        rc.reset();
        assert_eq!(rc.get_str("axes.grid.which").unwrap(), "both");
    }
}
