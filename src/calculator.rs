//! Trip Calculator Service
//!
//! Resolves cities, measures the distance between them and runs the
//! comparison engine for a selected transport mode.

use tracing::{info, instrument};

use crate::cities::CityDirectory;
use crate::comparison::{ComparisonEngine, ComparisonSettings};
use crate::config::CarbonTripConfig;
use crate::distance::great_circle_km;
use crate::models::{City, ModeRegistry};
use crate::report::{ComparisonReport, SortKey, impact_messages, mode_cards};
use crate::{CalculatorError, Result};

/// A resolved origin/destination pair
#[derive(Debug, Clone)]
pub struct Route<'a> {
    pub from: &'a City,
    pub to: &'a City,
    pub distance_km: f64,
}

/// Reference data plus engine, built once at startup
#[derive(Debug, Clone)]
pub struct TripCalculator {
    registry: ModeRegistry,
    cities: CityDirectory,
    engine: ComparisonEngine,
}

impl TripCalculator {
    /// Create a calculator; the registry is validated up front
    pub fn new(registry: ModeRegistry, cities: CityDirectory, settings: ComparisonSettings) -> Result<Self> {
        registry.validate()?;
        Ok(Self {
            registry,
            cities,
            engine: ComparisonEngine::new(settings),
        })
    }

    /// Build from loaded configuration
    pub fn from_config(config: &CarbonTripConfig) -> anyhow::Result<Self> {
        let calculator = Self::new(
            config.mode_registry()?,
            config.city_directory()?,
            config.comparison_settings(),
        )?;
        Ok(calculator)
    }

    #[must_use]
    pub fn registry(&self) -> &ModeRegistry {
        &self.registry
    }

    #[must_use]
    pub fn cities(&self) -> &CityDirectory {
        &self.cities
    }

    /// Resolve both cities and measure the great-circle distance
    pub fn route(&self, from: &str, to: &str) -> Result<Route<'_>> {
        let from = self.cities.resolve(from)?;
        let to = self.cities.resolve(to)?;
        let distance_km = great_circle_km(&from.point, &to.point);
        Ok(Route {
            from,
            to,
            distance_km,
        })
    }

    /// Compare every mode for the route and explain the selected one
    #[instrument(skip(self))]
    pub fn compare(&self, from: &str, to: &str, mode_key: &str, sort: SortKey) -> Result<ComparisonReport> {
        if self.registry.get(mode_key).is_none() {
            let known: Vec<&str> = self.registry.iter().map(|m| m.key.as_str()).collect();
            return Err(CalculatorError::lookup(format!(
                "Transport mode \"{mode_key}\" not found. Available modes: {}",
                known.join(", ")
            )));
        }

        let route = self.route(from, to)?;
        let results = self.engine.compute_all_modes(route.distance_km, &self.registry)?;
        let classification = self.engine.classify(mode_key, &results)?;
        let messages = impact_messages(&classification, &self.registry);
        let modes = mode_cards(&results, &classification.selected, &self.registry, sort);

        info!(
            from = %route.from.name,
            to = %route.to.name,
            distance_km = route.distance_km,
            best = %classification.best.key,
            "compared transport modes"
        );

        Ok(ComparisonReport {
            from: route.from.name.clone(),
            to: route.to.name.clone(),
            distance_km: route.distance_km,
            sort,
            classification,
            messages,
            modes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ChoiceCategory;

    fn calculator() -> TripCalculator {
        TripCalculator::new(
            ModeRegistry::builtin().unwrap(),
            CityDirectory::builtin().unwrap(),
            ComparisonSettings::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_route_new_york_london() {
        let calculator = calculator();
        let route = calculator.route("new york", "LONDON").unwrap();
        assert_eq!(route.from.name, "New York");
        assert_eq!(route.to.name, "London");
        assert!((route.distance_km - 5570.0).abs() < 20.0);
    }

    #[test]
    fn test_compare_report() {
        let report = calculator()
            .compare("Paris", "Berlin", "plane", SortKey::Emission)
            .unwrap();
        assert_eq!(report.from, "Paris");
        assert_eq!(report.modes.len(), calculator().registry().len());
        assert_eq!(report.classification.selected.key, "plane");
        assert_eq!(report.classification.category, ChoiceCategory::Worst);
        assert!(report.messages.impact.contains("tree"));
    }

    #[test]
    fn test_compare_unknown_mode() {
        let err = calculator()
            .compare("Paris", "Berlin", "rocket", SortKey::Emission)
            .unwrap_err();
        assert!(matches!(err, CalculatorError::Lookup { .. }));
        assert!(err.to_string().contains("Available modes"));
    }

    #[test]
    fn test_compare_unknown_city() {
        let err = calculator()
            .compare("Atlantis", "Berlin", "train", SortKey::Emission)
            .unwrap_err();
        assert!(matches!(err, CalculatorError::Lookup { .. }));
    }

    #[test]
    fn test_invalid_registry_rejected() {
        let err = TripCalculator::new(
            ModeRegistry::new(vec![]),
            CityDirectory::builtin().unwrap(),
            ComparisonSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CalculatorError::Configuration { .. }));
    }
}
