//! Location models for geographic coordinates and named cities

use serde::{Deserialize, Serialize};

/// Geographic point in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format point as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A city known to the lookup directory
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct City {
    /// Display name (city, region, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    #[serde(default)]
    pub country: Option<String>,
    #[serde(flatten)]
    pub point: GeoPoint,
}

impl City {
    /// Create a new city
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: None,
            point: GeoPoint::new(latitude, longitude),
        }
    }

    /// Create city with country
    #[must_use]
    pub fn with_country(
        name: impl Into<String>,
        latitude: f64,
        longitude: f64,
        country: impl Into<String>,
    ) -> Self {
        Self {
            country: Some(country.into()),
            ..Self::new(name, latitude, longitude)
        }
    }

    /// Name used as lookup key: trimmed and lower-cased
    #[must_use]
    pub fn normalized_name(&self) -> String {
        normalize_name(&self.name)
    }
}

pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        let point = GeoPoint::new(40.712_776, -74.005_974);
        assert_eq!(point.format_coordinates(), "40.7128, -74.0060");
    }

    #[test]
    fn test_city_deserializes_flat_coordinates() {
        let json = r#"{"name": "Paris", "country": "FR", "latitude": 48.8566, "longitude": 2.3522}"#;
        let city: City = serde_json::from_str(json).unwrap();
        assert_eq!(city, City::with_country("Paris", 48.8566, 2.3522, "FR"));
    }

    #[test]
    fn test_normalized_name() {
        let city = City::new("  New York ", 40.7128, -74.0060);
        assert_eq!(city.normalized_name(), "new york");
    }
}
