//! Data models for the CarbonTrip calculator
//!
//! This module contains the domain models organized by concern:
//! - Location: Geographic points and named cities
//! - Transport: Transport modes, the mode registry and per-mode results

pub mod location;
pub mod transport;

// Re-export all public types for convenient access
pub use location::{City, GeoPoint};
pub use transport::{ModeRegistry, ModeResult, TransportMode};
