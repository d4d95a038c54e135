//! City Lookup Module
//!
//! Resolves city names typed by the traveller into coordinates using a static
//! directory, and offers prefix suggestions for partially typed names.

use std::collections::HashMap;

use tracing::debug;

use crate::models::City;
use crate::models::location::normalize_name;
use crate::{CalculatorError, Result};

/// How many known cities to mention when a lookup fails
const HINT_COUNT: usize = 5;

/// Directory of known cities, keyed by normalized name
#[derive(Debug, Clone, Default)]
pub struct CityDirectory {
    cities: Vec<City>,
    index: HashMap<String, usize>,
}

impl CityDirectory {
    /// Build a directory; later duplicates of a normalized name are ignored
    #[must_use]
    pub fn new(cities: Vec<City>) -> Self {
        let mut directory = Self::default();
        for city in cities {
            let key = city.normalized_name();
            if directory.index.contains_key(&key) {
                debug!("Ignoring duplicate city entry: {}", city.name);
                continue;
            }
            directory.index.insert(key, directory.cities.len());
            directory.cities.push(city);
        }
        directory
    }

    /// Parse a JSON array of cities
    pub fn from_json(json: &str) -> Result<Self> {
        let cities: Vec<City> = serde_json::from_str(json)?;
        Ok(Self::new(cities))
    }

    /// The cities bundled with the calculator
    pub fn builtin() -> Result<Self> {
        Self::from_json(include_str!("../data/cities.json"))
    }

    /// Resolve a city name, ignoring case and surrounding whitespace
    pub fn resolve(&self, name: &str) -> Result<&City> {
        let key = normalize_name(name);
        if key.is_empty() {
            return Err(CalculatorError::validation("City name cannot be empty"));
        }

        let city = self
            .index
            .get(&key)
            .map(|&i| &self.cities[i])
            .ok_or_else(|| {
                let hints: Vec<&str> = self
                    .cities
                    .iter()
                    .take(HINT_COUNT)
                    .map(|c| c.name.as_str())
                    .collect();
                CalculatorError::lookup(format!(
                    "City \"{}\" not found in database. Try: {}, etc.",
                    name.trim(),
                    hints.join(", ")
                ))
            })?;

        debug!(
            "Resolved city: {} at ({})",
            city.name,
            city.point.format_coordinates()
        );
        Ok(city)
    }

    /// Cities whose normalized name starts with the normalized prefix, in
    /// directory order. An empty prefix returns every city.
    #[must_use]
    pub fn suggest(&self, prefix: &str) -> Vec<&City> {
        let prefix = normalize_name(prefix);
        self.cities
            .iter()
            .filter(|city| city.normalized_name().starts_with(&prefix))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}
