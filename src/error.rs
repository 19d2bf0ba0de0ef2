//! Error taxonomy for the navigation core.
//!
//! Provider failures are classified here so the resolver can apply its
//! fallback policy without inspecting transport details. Invalid input
//! is rejected at the call boundary and never mutates existing state.

use thiserror::Error;

/// Classified failure of a single directions provider call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not be reached (DNS, connect, TLS).
    #[error("provider unreachable: {0}")]
    Unreachable(String),

    /// The provider did not answer within the request timeout.
    #[error("provider timed out")]
    Timeout,

    /// The provider answered but found no route between the endpoints.
    #[error("no route found")]
    NoRouteFound,

    /// The provider answered with a status or payload we cannot use.
    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    /// The provider rejected the call with HTTP 429.
    #[error("provider rate limited")]
    RateLimited,
}

/// Caller-supplied input rejected at the boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidInput {
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("start and destination must both be set before resolving")]
    MissingEndpoint,
}

/// Failure while writing a route as GPX.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("GPX write error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("GPX output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
