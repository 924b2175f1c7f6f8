//! Configuration management for the kinship engine

use crate::kinship::ClassifierOptions;
use crate::reports::OutputFormat;
use crate::types::IdGenerator;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Prefix of environment overrides, e.g. `KINSHIP__CLASSIFIER__MAX_PATH_DEPTH=8`
pub const ENV_PREFIX: &str = "KINSHIP";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub classifier: ClassifierSettings,
    pub synthesis: SynthesisSettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub max_path_depth: usize,
    pub include_paths: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisSettings {
    pub id_prefix: String,
    pub id_start: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        let options = ClassifierOptions::default();
        Self {
            max_path_depth: options.max_path_depth,
            include_paths: options.include_paths,
        }
    }
}

impl Default for SynthesisSettings {
    fn default() -> Self {
        Self {
            id_prefix: "p".to_string(),
            id_start: 1,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text.to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Layer built-in defaults, an optional YAML file and `KINSHIP__` environment variables
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            let path = path.as_ref();
            debug!("Reading configuration from {:?}", path);
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Yaml)
                    .required(false),
            );
        }

        let config: Config = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .context("Failed to assemble configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.classifier.max_path_depth == 0 {
            return Err(anyhow::anyhow!("Classifier max_path_depth must be greater than 0"));
        }

        if self.synthesis.id_prefix.is_empty() {
            return Err(anyhow::anyhow!("Synthesis id_prefix must not be empty"));
        }

        self.output_format()?;
        Ok(())
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.output.format.parse()
    }

    pub fn classifier_options(&self) -> ClassifierOptions {
        ClassifierOptions {
            max_path_depth: self.classifier.max_path_depth,
            include_paths: self.classifier.include_paths,
        }
    }

    pub fn id_generator(&self) -> IdGenerator {
        IdGenerator::new(self.synthesis.id_prefix.clone(), self.synthesis.id_start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PersonId;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_config_save_and_load() {
        let mut config = Config::default();
        config.synthesis.id_prefix = "n".to_string();
        let temp_file = NamedTempFile::new().unwrap();

        config.save_to_file(temp_file.path()).await.unwrap();
        let loaded_config = Config::load_from_file(temp_file.path()).await.unwrap();

        assert_eq!(config, loaded_config);
    }

    #[tokio::test]
    async fn test_load_from_file_rejects_invalid_settings() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "classifier:\n  max_path_depth: 0").unwrap();

        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(err.to_string().contains("max_path_depth"));
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.classifier.max_path_depth = 0;
        assert!(config.validate().is_err());

        config = Config::default();
        config.synthesis.id_prefix.clear();
        assert!(config.validate().is_err());

        config = Config::default();
        config.output.format = "html".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_layered_load_with_partial_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "classifier:\n  max_path_depth: 8\noutput:\n  format: markdown").unwrap();

        let config = Config::load(Some(temp_file.path())).unwrap();

        assert_eq!(config.classifier.max_path_depth, 8);
        assert!(config.classifier.include_paths);
        assert_eq!(config.output_format().unwrap(), OutputFormat::Markdown);
        assert_eq!(config.synthesis, SynthesisSettings::default());
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::load(Some("does-not-exist.yml")).unwrap();
        assert_eq!(config.synthesis.id_start, 1);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_projections() {
        let mut config = Config::default();
        config.classifier.max_path_depth = 5;
        config.synthesis.id_prefix = "x".to_string();
        config.synthesis.id_start = 40;

        assert_eq!(config.classifier_options().max_path_depth, 5);
        let mut ids = config.id_generator();
        assert_eq!(ids.next_id(), PersonId::from("x40"));
    }
}
