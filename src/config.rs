// Configuration file handling

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    /// Output file for the report (stdout when unset)
    #[serde(default)]
    pub output: Option<String>,

    /// Abort on the first undecodable event line instead of skipping it
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Indent the JSON document
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
        }
    }
}

pub const ENV_CUKEREPORT_OUTPUT: &str = "CUKEREPORT_OUTPUT";

pub const CONFIG_FILE_NAMES: [&str; 2] = [".cukereportrc", ".cukereportrc.toml"];

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        Self::candidate_paths()
            .into_iter()
            .find(|p| p.exists())
            .and_then(|p| Self::load_from_file(&p))
    }

    /// Lookup order: `.cukereportrc` in cwd, then home; then `.cukereportrc.toml` in cwd, then home
    pub fn candidate_paths() -> Vec<PathBuf> {
        let cwd = std::env::current_dir().ok();
        let home = dirs::home_dir();

        CONFIG_FILE_NAMES
            .iter()
            .flat_map(|name| {
                [cwd.as_ref(), home.as_ref()]
                    .into_iter()
                    .flatten()
                    .map(move |dir| dir.join(name))
            })
            .collect()
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Option<Self> {
        let content = std::fs::read_to_string(path).ok()?;
        let config = Self::parse(&content);
        if config.is_none() {
            warn!("Ignoring invalid configuration file: {}", path.display());
        }
        config
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Option<Self> {
        toml::from_str(content).ok()
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Output path by precedence: CLI argument, config file, environment
    pub fn resolve_output(&self, cli_output: Option<&Path>) -> Option<PathBuf> {
        cli_output
            .map(Path::to_path_buf)
            .or_else(|| self.general.output.as_ref().map(PathBuf::from))
            .or_else(|| std::env::var_os(ENV_CUKEREPORT_OUTPUT).map(PathBuf::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[general]
output = "reports/cucumber.json"
strict = true

[report]
pretty = false
"#;

        let config = Config::parse(toml).expect("Failed to parse config");
        assert_eq!(config.general.output.as_deref(), Some("reports/cucumber.json"));
        assert!(config.general.strict);
        assert!(!config.report.pretty);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("").expect("Failed to parse empty config");
        assert!(config.general.output.is_none());
        assert!(!config.general.strict);
        assert!(config.report.pretty);
    }

    #[test]
    fn test_invalid_config_is_none() {
        assert!(Config::parse("[general]\nstrict = \"maybe\"").is_none());
    }

    #[test]
    fn test_cli_output_wins() {
        let config = Config {
            general: GeneralConfig {
                output: Some("from-config.json".to_string()),
                strict: false,
            },
            report: ReportConfig::default(),
        };

        assert_eq!(
            config.resolve_output(Some(Path::new("from-cli.json"))),
            Some(PathBuf::from("from-cli.json"))
        );
        assert_eq!(
            config.resolve_output(None),
            Some(PathBuf::from("from-config.json"))
        );
    }

    #[test]
    fn test_to_toml_round_trips_defaults() {
        let toml = Config::default().to_toml();
        let parsed = Config::parse(&toml).expect("Failed to parse generated config");
        assert!(parsed.report.pretty);
        assert!(!parsed.general.strict);
    }
}
