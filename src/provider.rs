//! Directions provider abstraction.
//!
//! Each adapter issues exactly one outbound request per call and maps
//! transport failures to the [`ProviderError`] taxonomy. Retries and
//! fallback belong to the resolver, never to an adapter.

use std::time::Duration;

use crate::error::{InvalidInput, ProviderError};
use crate::geo::Coordinate;
use crate::route::{RouteGeometry, TravelProfile};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// A single directions request, normalized across providers.
#[derive(Debug, Clone, Copy)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub dest: Coordinate,
    pub profile: TravelProfile,
    pub timeout: Duration,
}

impl RouteRequest {
    pub fn new(start: Coordinate, dest: Coordinate, profile: TravelProfile) -> Self {
        Self {
            start,
            dest,
            profile,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Successful provider response, normalized.
#[derive(Debug, Clone)]
pub struct ProviderRoute {
    pub geometry: RouteGeometry,
    pub distance_m: f64,
    pub duration_s: f64,
}

/// A directions backend.
///
/// Implementations hold no mutable state between calls, so the same
/// request is safe to retry against this or any other instance.
pub trait RouteProvider: Send + Sync {
    /// Stable identifier, recorded on results this provider produced.
    fn id(&self) -> &str;

    /// Issue one directions request.
    ///
    /// Exactly one outbound network call; the caller-supplied timeout
    /// bounds it. Failures come back classified, never as raw
    /// transport errors.
    fn request_route(&self, req: &RouteRequest) -> Result<ProviderRoute, ProviderError>;
}

/// Blocking HTTP client bounded by the request timeout.
pub(crate) fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, ProviderError> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::Unreachable(e.to_string()))
}

/// Map a reqwest transport error to the provider taxonomy.
pub(crate) fn classify_transport(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if err.is_decode() {
        ProviderError::InvalidResponse(err.to_string())
    } else {
        ProviderError::Unreachable(err.to_string())
    }
}

/// Map a non-success HTTP status to the provider taxonomy.
pub(crate) fn classify_status(status: reqwest::StatusCode) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited
    } else if status.is_server_error() {
        ProviderError::Unreachable(format!("HTTP status {status}"))
    } else {
        ProviderError::InvalidResponse(format!("HTTP status {status}"))
    }
}

/// Decode a GeoJSON-style coordinate list ([lon, lat] order, possibly
/// with a trailing elevation) into a route geometry.
pub(crate) fn geometry_from_lonlat(coords: &[Vec<f64>]) -> Result<RouteGeometry, ProviderError> {
    let mut points = Vec::with_capacity(coords.len());
    for pair in coords {
        let (lon, lat) = match pair.as_slice() {
            [lon, lat, ..] => (*lon, *lat),
            _ => {
                return Err(ProviderError::InvalidResponse(
                    "malformed coordinate pair".to_string(),
                ))
            }
        };
        let point = Coordinate::new(lat, lon)
            .map_err(|e: InvalidInput| ProviderError::InvalidResponse(e.to_string()))?;
        points.push(point);
    }

    RouteGeometry::new(points).ok_or_else(|| {
        ProviderError::InvalidResponse("geometry has fewer than 2 points".to_string())
    })
}

/// Reject a provider summary with negative distance or duration.
pub(crate) fn check_summary(distance_m: f64, duration_s: f64) -> Result<(), ProviderError> {
    if distance_m < 0.0 || duration_s < 0.0 {
        return Err(ProviderError::InvalidResponse(format!(
            "negative summary: {distance_m} m, {duration_s} s"
        )));
    }
    Ok(())
}
