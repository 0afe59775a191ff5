//! Layered settings for the command-line front end
//!
//! Precedence, lowest first: built-in defaults, an optional
//! `contact_restorer.{toml,json,yaml}` in the working directory, then
//! `CONTACTS_*` environment variables.

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;
use crate::export::ExportFormat;

const FILE_NAME: &str = "contact_restorer";
const ENV_PREFIX: &str = "CONTACTS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Directory exports are written to
    pub output_dir: PathBuf,
    pub default_format: ExportFormat,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            default_format: ExportFormat::Csv,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_sources(Config::builder().add_source(File::with_name(FILE_NAME).required(false)))
    }

    /// Load from an explicit file instead of the working-directory default
    pub fn load_from(path: &str) -> Result<Self> {
        Self::from_sources(Config::builder().add_source(File::with_name(path).required(true)))
    }

    fn from_sources(
        sources: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self> {
        let defaults = Settings::default();

        let settings = Config::builder()
            .set_default("output_dir", defaults.output_dir.to_string_lossy().to_string())?
            .set_default("default_format", defaults.default_format.to_string())?
            .set_default("log_filter", defaults.log_filter)?
            .add_source(sources.build()?)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        let settings = Settings::from_sources(
            Config::builder()
                .add_source(File::with_name(missing.to_str().unwrap()).required(false)),
        )
        .unwrap();
        assert_eq!(settings.output_dir, PathBuf::from("."));
        assert_eq!(settings.default_format, ExportFormat::Csv);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restorer.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "default_format = \"vcard\"\noutput_dir = \"exports\"").unwrap();

        let settings = Settings::load_from(path.to_str().unwrap()).unwrap();
        assert_eq!(settings.default_format, ExportFormat::VCard);
        assert_eq!(settings.output_dir, PathBuf::from("exports"));
        assert_eq!(settings.log_filter, "info");
    }

    #[test]
    fn test_missing_required_file_errors() {
        assert!(Settings::load_from("/nonexistent/contact_restorer.toml").is_err());
    }
}
