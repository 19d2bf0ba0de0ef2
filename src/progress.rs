//! Live progress tracking along a resolved route.
//!
//! Consumes position samples from the host's location source and
//! projects them onto a fixed route geometry to report remaining
//! distance and time. One tracker per active navigation; a new route
//! means a fresh `start`, never a reused state.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::InvalidInput;
use crate::geo::{self, Coordinate};
use crate::route::{RouteGeometry, RouteSummary};

/// One position event from the host's location source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub coordinate: Coordinate,
    /// Milliseconds since the Unix epoch, as reported by the source.
    pub timestamp_ms: u64,
    /// Reported horizontal accuracy in meters, if the source has one.
    /// Carried for the host; the projection does not weight by it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

impl PositionSample {
    pub fn new(coordinate: Coordinate, timestamp_ms: u64) -> Self {
        Self {
            coordinate,
            timestamp_ms,
            accuracy_m: None,
        }
    }
}

/// Progress along the tracked route after one accepted sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Index of the route segment the position projects onto.
    pub segment_index: usize,
    pub remaining_distance_m: f64,
    pub remaining_time_s: f64,
    /// Newest sample timestamp seen so far; never moves backwards.
    pub last_sample_at_ms: u64,
}

#[derive(Debug)]
struct ActiveRoute {
    geometry: RouteGeometry,
    /// None when the route summary carried no usable duration;
    /// remaining time is then reported as zero.
    average_speed_mps: Option<f64>,
    state: Option<ProgressState>,
}

/// Projects live position samples onto a fixed route geometry.
///
/// The whole polyline is re-scanned on every sample, so the segment
/// index may move backwards when the user does.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    route: Option<ActiveRoute>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin tracking against a route, discarding any previous state.
    ///
    /// The average speed estimate comes from the route summary:
    /// distance over duration.
    pub fn start(&mut self, geometry: RouteGeometry, summary: RouteSummary) {
        let average_speed_mps = if summary.duration_s > 0.0 && summary.distance_m > 0.0 {
            Some(summary.distance_m / summary.duration_s)
        } else {
            None
        };

        self.route = Some(ActiveRoute {
            geometry,
            average_speed_mps,
            state: None,
        });
    }

    /// Stop tracking and discard progress state.
    ///
    /// Samples arriving afterwards are ignored until the next `start`.
    pub fn stop(&mut self) {
        self.route = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.route.is_some()
    }

    /// Latest progress, if any sample has been accepted since `start`.
    pub fn state(&self) -> Option<ProgressState> {
        self.route.as_ref().and_then(|r| r.state)
    }

    /// Process one position sample.
    ///
    /// Returns the updated progress, or `Ok(None)` when not tracking.
    /// A sample outside the valid coordinate range is rejected with an
    /// error and changes nothing; the tracker stays usable. Samples
    /// with out-of-order timestamps are still projected (position can
    /// wander), but `last_sample_at_ms` never regresses.
    pub fn on_position_sample(
        &mut self,
        sample: PositionSample,
    ) -> Result<Option<ProgressState>, InvalidInput> {
        if let Err(err) = sample.coordinate.validate() {
            warn!("rejecting invalid position sample: {err}");
            return Err(err);
        }

        let Some(route) = self.route.as_mut() else {
            return Ok(None);
        };

        let Some(projection) = geo::nearest_point_on_path(route.geometry.points(), sample.coordinate)
        else {
            return Ok(None);
        };

        let remaining_distance_m = geo::remaining_distance(
            projection.segment_index,
            projection.point,
            route.geometry.points(),
        );
        let remaining_time_s = match route.average_speed_mps {
            Some(speed) => remaining_distance_m / speed,
            None => 0.0,
        };
        let last_sample_at_ms = match &route.state {
            Some(prev) => prev.last_sample_at_ms.max(sample.timestamp_ms),
            None => sample.timestamp_ms,
        };

        let state = ProgressState {
            segment_index: projection.segment_index,
            remaining_distance_m,
            remaining_time_s,
            last_sample_at_ms,
        };
        route.state = Some(state);
        Ok(Some(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    /// Straight east-west route along the equator with a summary whose
    /// distance matches the real path length and a 10 m/s average.
    fn tracker_on_equator_route() -> (ProgressTracker, f64) {
        let points = vec![pt(0.0, 0.0), pt(0.0, 0.05), pt(0.0, 0.1)];
        let length = geo::path_length(&points);
        let geometry = RouteGeometry::new(points).unwrap();

        let mut tracker = ProgressTracker::new();
        tracker.start(
            geometry,
            RouteSummary {
                distance_m: length,
                duration_s: length / 10.0,
            },
        );
        (tracker, length)
    }

    #[test]
    fn midpoint_sample_halves_remaining() {
        let (mut tracker, length) = tracker_on_equator_route();

        let state = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.05), 1_000))
            .unwrap()
            .unwrap();

        let half = length / 2.0;
        assert!(
            (state.remaining_distance_m - half).abs() < half * 0.01,
            "Expected ~{half:.0} m, got {:.0} m",
            state.remaining_distance_m
        );
        assert!(
            (state.remaining_time_s - half / 10.0).abs() < half / 10.0 * 0.01,
            "Expected ~{:.0} s, got {:.0} s",
            half / 10.0,
            state.remaining_time_s
        );
        assert_eq!(state.last_sample_at_ms, 1_000);
    }

    #[test]
    fn sample_at_destination_reports_zero() {
        let (mut tracker, _) = tracker_on_equator_route();

        let state = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.1), 2_000))
            .unwrap()
            .unwrap();

        assert!(state.remaining_distance_m < 1.0);
        assert!(state.remaining_time_s < 0.1);
        assert_eq!(state.segment_index, 1);
    }

    #[test]
    fn invalid_sample_rejected_without_state_change() {
        let (mut tracker, _) = tracker_on_equator_route();

        let before = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.02), 1_000))
            .unwrap();

        let err = tracker
            .on_position_sample(PositionSample::new(pt(200.0, 0.03), 2_000))
            .unwrap_err();
        assert_eq!(err, InvalidInput::LatitudeOutOfRange(200.0));

        // Tracker still alive, state untouched
        assert_eq!(tracker.state(), before);
        assert!(tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.03), 3_000))
            .unwrap()
            .is_some());
    }

    #[test]
    fn old_timestamp_does_not_regress_last_sample() {
        let (mut tracker, _) = tracker_on_equator_route();

        tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.02), 5_000))
            .unwrap();
        let state = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.06), 4_000))
            .unwrap()
            .unwrap();

        // Position still moved, timestamp did not go backwards
        assert_eq!(state.segment_index, 1);
        assert_eq!(state.last_sample_at_ms, 5_000);
    }

    #[test]
    fn backtracking_decreases_segment_index() {
        let (mut tracker, _) = tracker_on_equator_route();

        let ahead = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.08), 1_000))
            .unwrap()
            .unwrap();
        assert_eq!(ahead.segment_index, 1);

        let behind = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.02), 2_000))
            .unwrap()
            .unwrap();
        assert_eq!(behind.segment_index, 0);
        assert!(behind.remaining_distance_m > ahead.remaining_distance_m);
    }

    #[test]
    fn zero_duration_summary_reports_zero_time() {
        let geometry = RouteGeometry::new(vec![pt(0.0, 0.0), pt(0.0, 0.1)]).unwrap();
        let mut tracker = ProgressTracker::new();
        tracker.start(
            geometry,
            RouteSummary {
                distance_m: 11_000.0,
                duration_s: 0.0,
            },
        );

        let state = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.05), 1_000))
            .unwrap()
            .unwrap();

        assert!(state.remaining_distance_m > 0.0);
        assert_eq!(state.remaining_time_s, 0.0);
    }

    #[test]
    fn samples_ignored_when_stopped() {
        let (mut tracker, _) = tracker_on_equator_route();
        tracker.stop();

        let result = tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.05), 1_000))
            .unwrap();
        assert!(result.is_none());
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn start_resets_previous_state() {
        let (mut tracker, _) = tracker_on_equator_route();
        tracker
            .on_position_sample(PositionSample::new(pt(0.0, 0.05), 1_000))
            .unwrap();
        assert!(tracker.state().is_some());

        let geometry = RouteGeometry::new(vec![pt(1.0, 0.0), pt(1.0, 0.1)]).unwrap();
        tracker.start(
            geometry,
            RouteSummary {
                distance_m: 11_000.0,
                duration_s: 1_100.0,
            },
        );
        assert!(tracker.state().is_none());
    }

    #[test]
    fn sample_serde_accepts_missing_accuracy() {
        let json = r#"{"coordinate":{"lat":0.0,"lon":0.05},"timestamp_ms":1000}"#;
        let sample: PositionSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample.accuracy_m, None);
    }
}
