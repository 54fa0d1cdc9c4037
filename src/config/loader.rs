use std::fs;
use std::io::{BufReader, Read};
use std::path::Path;

use super::AnalysisConfig;
use crate::core::errors::{Error, Result};

/// Pure function to read config file contents
fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string. Parse failures and invalid
/// thresholds are both fatal; a run must never start on a bad config.
pub fn parse_config(contents: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file. A missing file yields the default
/// config; an unreadable or invalid file is fatal.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let contents = match read_config_file(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!(
                "No config file at {}. Using default config.",
                path.display()
            );
            let config = AnalysisConfig::default();
            config.validate()?;
            return Ok(config);
        }
        Err(e) => {
            log::warn!("Failed to read config file {}: {}", path.display(), e);
            return Err(Error::file_system(e.to_string(), path));
        }
    };

    let config = parse_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/.debtscan.toml")).unwrap();
        assert_eq!(config.thresholds.method_complexity_warning, 15);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let config = parse_config(
            r#"
            [thresholds]
            method_complexity_warning = 10

            [duplication]
            min_lines = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.thresholds.method_complexity_warning, 10);
        assert_eq!(config.thresholds.method_complexity_critical, 25);
        assert_eq!(config.duplication.min_lines, 30);
    }

    #[test]
    fn invalid_thresholds_in_file_are_fatal() {
        let result = parse_config(
            r#"
            [thresholds]
            nesting_warning = 8
            "#,
        );
        assert!(result.is_err());
    }
}
