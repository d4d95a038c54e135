//! Great-circle distance between two geographic points

use crate::models::GeoPoint;

/// Mean Earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance in kilometers.
///
/// Coordinates are not range-checked; any finite pair is accepted.
#[must_use]
pub fn great_circle_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    let km = EARTH_RADIUS_KM * c;
    tracing::trace!(
        from = %from.format_coordinates(),
        to = %to.format_coordinates(),
        km,
        "computed great-circle distance"
    );
    km
}
