//! `CarbonTrip` - Travel emissions calculator
//!
//! This library provides great-circle distance calculation between cities,
//! per-mode CO₂, time and cost derivation, and the comparison that explains
//! a traveller's chosen transport mode against the best and worst options.

pub mod calculator;
pub mod cities;
pub mod comparison;
pub mod config;
pub mod distance;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;

// Re-export core types for public API
pub use calculator::{Route, TripCalculator};
pub use cities::CityDirectory;
pub use comparison::{
    CarbonCosts, ChoiceCategory, Classification, ComparisonEngine, ComparisonSettings,
    ImpactDeltas, PracticalBestHeuristic,
};
pub use config::CarbonTripConfig;
pub use distance::great_circle_km;
pub use error::CalculatorError;
pub use models::{City, GeoPoint, ModeRegistry, ModeResult, TransportMode};
pub use report::{ComparisonReport, ImpactMessages, ModeCard, SortKey};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CalculatorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
