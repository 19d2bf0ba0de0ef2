//! Route data model.
//!
//! Normalized shapes shared by providers, resolver, and session.
//! Provider-specific field names never leave the adapter modules; the
//! rest of the crate only sees these types. Everything here derives
//! serde so results can cross the host boundary as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};

/// Travel mode requested from a directions provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
    HeavyGoodsVehicle,
}

impl TravelProfile {
    /// openrouteservice profile identifier.
    pub fn ors_profile(self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving-car",
            TravelProfile::Walking => "foot-walking",
            TravelProfile::Cycling => "cycling-regular",
            TravelProfile::HeavyGoodsVehicle => "driving-hgv",
        }
    }

    /// OSRM profile identifier.
    ///
    /// OSRM has no dedicated heavy-goods profile; HGV falls back to the
    /// car profile there.
    pub fn osrm_profile(self) -> &'static str {
        match self {
            TravelProfile::Driving | TravelProfile::HeavyGoodsVehicle => "driving",
            TravelProfile::Walking => "foot",
            TravelProfile::Cycling => "cycling",
        }
    }
}

/// Ordered path from start to destination.
///
/// Always holds at least two points and is immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry(Vec<Coordinate>);

impl RouteGeometry {
    /// Build a geometry from an ordered point list.
    ///
    /// Returns None for fewer than 2 points.
    pub fn new(points: Vec<Coordinate>) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }
        Some(Self(points))
    }

    /// The two-point geometry between a start and a destination.
    pub fn line(start: Coordinate, dest: Coordinate) -> Self {
        Self(vec![start, dest])
    }

    /// Points in traversal order.
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// First point of the path.
    pub fn start(&self) -> Coordinate {
        self.0[0]
    }

    /// Last point of the path.
    pub fn end(&self) -> Coordinate {
        self.0[self.0.len() - 1]
    }

    /// Path length in meters.
    pub fn total_length_m(&self) -> f64 {
        geo::path_length(&self.0)
    }

    /// Simplified copy of the path for cheap rendering.
    ///
    /// Dense provider geometries can run to hundreds of points; hosts
    /// drawing at low zoom pass a tolerance in meters and draw fewer.
    pub fn simplified(&self, tolerance_m: f64) -> Vec<Coordinate> {
        geo::simplify(&self.0, tolerance_m)
    }
}

/// Distance and duration of a route.
///
/// Degraded results carry estimates here; check
/// [`RouteResult::approximate`] before trusting the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub distance_m: f64,
    pub duration_s: f64,
}

impl fmt::Display for RouteSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.distance_m >= 1000.0 {
            write!(f, "{:.1} km", self.distance_m / 1000.0)?;
        } else {
            write!(f, "{} m", self.distance_m.round() as i64)?;
        }
        write!(f, " · {} min", (self.duration_s / 60.0).round() as i64)
    }
}

/// A resolved route.
///
/// Superseded, never mutated, on re-resolution. `approximate` marks a
/// straight-line estimate produced after every provider failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    pub geometry: RouteGeometry,
    pub summary: RouteSummary,
    /// Identifier of the provider that produced the geometry.
    pub provider_id: String,
    pub approximate: bool,
}

impl RouteResult {
    /// Serialize for a JSON host boundary.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn geometry_rejects_short_paths() {
        assert!(RouteGeometry::new(vec![]).is_none());
        assert!(RouteGeometry::new(vec![pt(48.0, 16.0)]).is_none());
        assert!(RouteGeometry::new(vec![pt(48.0, 16.0), pt(48.1, 16.1)]).is_some());
    }

    #[test]
    fn geometry_line_has_two_points() {
        let g = RouteGeometry::line(pt(48.0, 16.0), pt(49.0, 17.0));
        assert_eq!(g.points().len(), 2);
        assert_eq!(g.start(), pt(48.0, 16.0));
        assert_eq!(g.end(), pt(49.0, 17.0));
    }

    #[test]
    fn geometry_length_and_simplification() {
        // Dense straight line: simplifies to its endpoints
        let g = RouteGeometry::new(vec![
            pt(48.0, 16.0),
            pt(48.0, 16.005),
            pt(48.0, 16.01),
            pt(48.0, 16.015),
            pt(48.0, 16.02),
        ])
        .unwrap();

        let len = g.total_length_m();
        assert!(len > 1_400.0 && len < 1_600.0, "Expected ~1.5 km, got {len:.0} m");
        assert_eq!(g.simplified(10.0).len(), 2);
    }

    #[test]
    fn ors_profile_identifiers() {
        assert_eq!(TravelProfile::Driving.ors_profile(), "driving-car");
        assert_eq!(TravelProfile::Walking.ors_profile(), "foot-walking");
        assert_eq!(TravelProfile::Cycling.ors_profile(), "cycling-regular");
        assert_eq!(TravelProfile::HeavyGoodsVehicle.ors_profile(), "driving-hgv");
    }

    #[test]
    fn osrm_profile_identifiers() {
        assert_eq!(TravelProfile::Driving.osrm_profile(), "driving");
        assert_eq!(TravelProfile::Walking.osrm_profile(), "foot");
        assert_eq!(TravelProfile::Cycling.osrm_profile(), "cycling");
        assert_eq!(TravelProfile::HeavyGoodsVehicle.osrm_profile(), "driving");
    }

    #[test]
    fn default_profile_is_driving() {
        assert_eq!(TravelProfile::default(), TravelProfile::Driving);
    }

    #[test]
    fn summary_display_km() {
        let s = RouteSummary { distance_m: 1850.0, duration_s: 240.0 };
        assert_eq!(s.to_string(), "1.9 km · 4 min");
    }

    #[test]
    fn summary_display_meters() {
        let s = RouteSummary { distance_m: 850.0, duration_s: 180.0 };
        assert_eq!(s.to_string(), "850 m · 3 min");
    }

    #[test]
    fn result_to_json_round_trips() {
        let result = RouteResult {
            geometry: RouteGeometry::line(pt(55.14, 30.16), pt(55.15, 30.18)),
            summary: RouteSummary { distance_m: 1850.0, duration_s: 240.0 },
            provider_id: "osrm".to_string(),
            approximate: false,
        };

        let json = result.to_json().unwrap();
        let back: RouteResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
