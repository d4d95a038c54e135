//! Transport mode reference data and per-mode results

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::{CalculatorError, Result};

/// A transport mode with fixed per-km coefficients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportMode {
    /// Unique identifier, e.g. "train"
    pub key: String,
    pub name: String,
    pub icon: String,
    /// kg CO₂ per km
    pub emission: f64,
    /// km/h
    pub speed: f64,
    /// currency units per km
    pub cost: f64,
}

impl TransportMode {
    /// Icon followed by name, as offered in mode pickers
    #[must_use]
    pub fn display(&self) -> String {
        format!("{} {}", self.icon, self.name)
    }

    fn validate(&self) -> Result<()> {
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(CalculatorError::configuration(format!(
                "Transport mode '{}' must have a positive speed, got {}",
                self.key, self.speed
            )));
        }
        if !self.emission.is_finite() || self.emission < 0.0 {
            return Err(CalculatorError::configuration(format!(
                "Transport mode '{}' has an invalid emission factor {}",
                self.key, self.emission
            )));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(CalculatorError::configuration(format!(
                "Transport mode '{}' has an invalid cost factor {}",
                self.key, self.cost
            )));
        }
        Ok(())
    }
}

/// Ordered, read-only set of transport modes.
///
/// Iteration order is the order the modes were supplied in; result ordering
/// and tie-breaking downstream depend on it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ModeRegistry {
    modes: Vec<TransportMode>,
}

impl ModeRegistry {
    #[must_use]
    pub fn new(modes: Vec<TransportMode>) -> Self {
        Self { modes }
    }

    /// Parse a JSON array of modes and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let modes: Vec<TransportMode> = serde_json::from_str(json)?;
        let registry = Self::new(modes);
        registry.validate()?;
        Ok(registry)
    }

    /// The modes bundled with the calculator
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("../../data/modes.json"))
    }

    /// Check every mode's coefficients and key uniqueness
    pub fn validate(&self) -> Result<()> {
        if self.modes.is_empty() {
            return Err(CalculatorError::configuration(
                "At least one transport mode must be defined",
            ));
        }

        let mut seen = HashSet::new();
        for mode in &self.modes {
            if !seen.insert(mode.key.as_str()) {
                return Err(CalculatorError::configuration(format!(
                    "Duplicate transport mode key '{}'",
                    mode.key
                )));
            }
            mode.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TransportMode> {
        self.modes.iter().find(|mode| mode.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransportMode> {
        self.modes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// Modes whose display string contains `fragment`, ignoring case.
    /// An empty fragment matches every mode.
    #[must_use]
    pub fn suggest(&self, fragment: &str) -> Vec<&TransportMode> {
        let fragment = fragment.trim().to_lowercase();
        self.modes
            .iter()
            .filter(|mode| fragment.is_empty() || mode.display().to_lowercase().contains(&fragment))
            .collect()
    }
}

/// Metrics for one mode over one distance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModeResult {
    pub key: String,
    /// kg CO₂
    pub co2: f64,
    /// hours
    pub time: f64,
    /// currency units
    pub cost: f64,
}

impl ModeResult {
    pub(crate) fn compute(mode: &TransportMode, distance_km: f64) -> Self {
        Self {
            key: mode.key.clone(),
            co2: distance_km * mode.emission,
            time: distance_km / mode.speed,
            cost: distance_km * mode.cost,
        }
    }
}
