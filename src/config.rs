//! Configuration management for `CarbonTrip`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::cities::CityDirectory;
use crate::comparison::{ComparisonSettings, PracticalBestHeuristic};
use crate::models::ModeRegistry;
use crate::report::SortKey;
use crate::CalculatorError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for `CarbonTrip`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CarbonTripConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Comparison engine tunables
    #[serde(default)]
    pub comparison: ComparisonConfig,
    /// Reference data overrides
    #[serde(default)]
    pub data: DataConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Thresholds and prices used when classifying a choice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonConfig {
    #[serde(default = "default_slow_factor")]
    pub slow_factor: f64,
    #[serde(default = "default_min_slow_hours")]
    pub min_slow_hours: f64,
    #[serde(default = "default_practical_factor")]
    pub practical_factor: f64,
    /// Currency units per kg CO₂
    #[serde(default = "default_carbon_price")]
    pub carbon_price_per_kg: f64,
    /// kg CO₂ absorbed by one tree per year
    #[serde(default = "default_tree_absorption")]
    pub tree_absorption_kg: f64,
}

/// Optional JSON files replacing the bundled reference data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub modes_file: Option<PathBuf>,
    pub cities_file: Option<PathBuf>,
}

/// Default application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Sort order for the comparison (emission, time, cost)
    #[serde(default)]
    pub sort: SortKey,
}

// Default value functions
fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_slow_factor() -> f64 {
    PracticalBestHeuristic::default().slow_factor
}

fn default_min_slow_hours() -> f64 {
    PracticalBestHeuristic::default().min_slow_hours
}

fn default_practical_factor() -> f64 {
    PracticalBestHeuristic::default().practical_factor
}

fn default_carbon_price() -> f64 {
    crate::comparison::DEFAULT_CARBON_PRICE_PER_KG
}

fn default_tree_absorption() -> f64 {
    crate::comparison::DEFAULT_TREE_ABSORPTION_KG
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            slow_factor: default_slow_factor(),
            min_slow_hours: default_min_slow_hours(),
            practical_factor: default_practical_factor(),
            carbon_price_per_kg: default_carbon_price(),
            tree_absorption_kg: default_tree_absorption(),
        }
    }
}

impl CarbonTripConfig {
    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let explicit = config_path.is_some();
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if explicit && !config_file.exists() {
            return Err(CalculatorError::configuration(format!(
                "Config file not found: {}",
                config_file.display()
            ))
            .into());
        }

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. CARBONTRIP_LOGGING__LEVEL=debug
        builder = builder.add_source(
            Environment::with_prefix("CARBONTRIP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: CarbonTripConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("carbontrip").join("config.toml"))
    }

    /// Apply default values to empty string fields
    pub fn apply_defaults(&mut self) {
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_data_files()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        let c = &self.comparison;
        for (name, value) in [
            ("slow_factor", c.slow_factor),
            ("practical_factor", c.practical_factor),
            ("tree_absorption_kg", c.tree_absorption_kg),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CalculatorError::configuration(format!(
                    "comparison.{name} must be a positive number, got {value}"
                ))
                .into());
            }
        }

        for (name, value) in [
            ("min_slow_hours", c.min_slow_hours),
            ("carbon_price_per_kg", c.carbon_price_per_kg),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CalculatorError::configuration(format!(
                    "comparison.{name} cannot be negative, got {value}"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(CalculatorError::configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(CalculatorError::configuration(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    fn validate_data_files(&self) -> Result<()> {
        for path in [&self.data.modes_file, &self.data.cities_file]
            .into_iter()
            .flatten()
        {
            if !path.exists() {
                return Err(CalculatorError::configuration(format!(
                    "Data file not found: {}",
                    path.display()
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Engine settings derived from the `[comparison]` section
    #[must_use]
    pub fn comparison_settings(&self) -> ComparisonSettings {
        let c = &self.comparison;
        ComparisonSettings {
            heuristic: PracticalBestHeuristic {
                slow_factor: c.slow_factor,
                min_slow_hours: c.min_slow_hours,
                practical_factor: c.practical_factor,
            },
            carbon_price_per_kg: c.carbon_price_per_kg,
            tree_absorption_kg: c.tree_absorption_kg,
        }
    }

    /// Configured transport modes, or the bundled ones
    pub fn mode_registry(&self) -> Result<ModeRegistry> {
        let registry = match &self.data.modes_file {
            Some(path) => ModeRegistry::from_json(&read_data_file(path)?)
                .with_context(|| format!("Invalid modes file: {}", path.display()))?,
            None => ModeRegistry::builtin()?,
        };
        Ok(registry)
    }

    /// Configured city directory, or the bundled one
    pub fn city_directory(&self) -> Result<CityDirectory> {
        let directory = match &self.data.cities_file {
            Some(path) => CityDirectory::from_json(&read_data_file(path)?)
                .with_context(|| format!("Invalid cities file: {}", path.display()))?,
            None => CityDirectory::builtin()?,
        };
        Ok(directory)
    }
}

fn read_data_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read data file: {}", path.display()))
}
