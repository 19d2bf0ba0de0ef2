//! Geometry primitives for route tracking.
//!
//! Platform-agnostic module for great-circle distances, nearest-point
//! projection onto a route polyline, and remaining-distance
//! accumulation. All coordinates use WGS84 (lat/lon in degrees).

use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range values.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidInput> {
        let c = Self { lat, lon };
        c.validate()?;
        Ok(c)
    }

    /// Check that the coordinate lies within the WGS84 range.
    ///
    /// Deserialized coordinates bypass [`Coordinate::new`], so entry
    /// points re-validate before touching any state.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(InvalidInput::LatitudeOutOfRange(self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lon) {
            return Err(InvalidInput::LongitudeOutOfRange(self.lon));
        }
        Ok(())
    }
}

/// Haversine distance between two coordinates in meters.
///
/// Symmetric within floating tolerance; zero for identical points.
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Total length of a path in meters.
pub fn path_length(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| distance(w[0], w[1])).sum()
}

/// Result of projecting a position onto a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Nearest point on the path.
    pub point: Coordinate,
    /// Index of the segment start point (0-based).
    pub segment_index: usize,
    /// Distance from the position to the nearest point, in meters.
    pub distance_m: f64,
}

/// Project a position onto the nearest segment of a path.
///
/// Scans every segment; on exact ties the first (lowest-index) segment
/// wins. Returns None if the path has fewer than 2 points.
pub fn nearest_point_on_path(points: &[Coordinate], position: Coordinate) -> Option<Projection> {
    if points.len() < 2 {
        return None;
    }

    let mut best: Option<Projection> = None;

    for (i, segment) in points.windows(2).enumerate() {
        let projected = nearest_point_on_segment(segment[0], segment[1], position);
        let dist = distance(position, projected);

        let is_better = match &best {
            Some(prev) => dist < prev.distance_m,
            None => true,
        };

        if is_better {
            best = Some(Projection {
                point: projected,
                segment_index: i,
                distance_m: dist,
            });
        }
    }

    best
}

/// Project a point onto a line segment defined by two endpoints.
///
/// Uses a planar approximation scaled by latitude cosine, clamped to
/// the segment. Accurate enough for tracking at city/country scale,
/// not geodesically exact over very long segments.
pub fn nearest_point_on_segment(a: Coordinate, b: Coordinate, p: Coordinate) -> Coordinate {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let dx = (b.lon - a.lon) * cos_lat;
    let dy = b.lat - a.lat;
    let px = (p.lon - a.lon) * cos_lat;
    let py = p.lat - a.lat;

    let seg_len_sq = dx * dx + dy * dy;

    if seg_len_sq < 1e-20 {
        // Degenerate segment, return endpoint
        return a;
    }

    let t = ((px * dx + py * dy) / seg_len_sq).clamp(0.0, 1.0);

    Coordinate {
        lat: a.lat + t * (b.lat - a.lat),
        lon: a.lon + t * (b.lon - a.lon),
    }
}

/// Distance in meters from a projected point to the end of the path.
///
/// Sums the leg from the projected point to the next vertex plus all
/// subsequent full segments. Zero when the projection sits on the
/// final vertex of the last segment.
pub fn remaining_distance(
    segment_index: usize,
    projected: Coordinate,
    points: &[Coordinate],
) -> f64 {
    let mut d = 0.0;
    if segment_index + 1 < points.len() {
        d += distance(projected, points[segment_index + 1]);
        d += path_length(&points[segment_index + 1..]);
    }
    d
}

/// Ramer-Douglas-Peucker line simplification.
///
/// `tolerance_m` is the maximum perpendicular deviation a dropped
/// point may have from the simplified line. Endpoints are always kept.
pub fn simplify(points: &[Coordinate], tolerance_m: f64) -> Vec<Coordinate> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let first = points[0];
    let last = points[points.len() - 1];

    // Find the point with maximum distance from the line
    let mut max_dist = 0.0;
    let mut max_idx = 0;

    for (i, p) in points.iter().enumerate().skip(1).take(points.len() - 2) {
        let dist = perpendicular_distance_m(*p, first, last);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > tolerance_m {
        // Recurse on both halves, dropping the duplicate junction point
        let mut left = simplify(&points[..=max_idx], tolerance_m);
        let right = simplify(&points[max_idx..], tolerance_m);
        left.pop();
        left.extend(right);
        left
    } else {
        vec![first, last]
    }
}

/// Perpendicular distance from point P to line A-B, in meters.
///
/// Planar approximation with latitude-cosine scaling.
fn perpendicular_distance_m(p: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    let cos_lat = ((a.lat + b.lat) / 2.0).to_radians().cos();

    let m_per_deg_lat = 111_320.0;
    let m_per_deg_lon = 111_320.0 * cos_lat;

    let ax = a.lon * m_per_deg_lon;
    let ay = a.lat * m_per_deg_lat;
    let bx = b.lon * m_per_deg_lon;
    let by = b.lat * m_per_deg_lat;
    let px = p.lon * m_per_deg_lon;
    let py = p.lat * m_per_deg_lat;

    let dx = bx - ax;
    let dy = by - ay;
    let len_sq = dx * dx + dy * dy;

    if len_sq < 1e-10 {
        return ((px - ax).powi(2) + (py - ay).powi(2)).sqrt();
    }

    let cross = ((px - ax) * dy - (py - ay) * dx).abs();
    cross / len_sq.sqrt()
}
