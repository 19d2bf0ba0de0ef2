//! OSRM directions adapter.
//!
//! GETs `/route/v1/{profile}/{coords}` with GeoJSON geometry and maps
//! the response `code` verdicts onto the provider taxonomy.

use serde::Deserialize;

use crate::error::ProviderError;
use crate::provider::{
    check_summary, classify_status, classify_transport, geometry_from_lonlat, http_client,
    ProviderRoute, RouteProvider, RouteRequest,
};

/// Public demo router. Production hosts run their own instance.
pub const OSRM_BASE_URL: &str = "https://router.project-osrm.org";

/// OSRM HTTP API client.
pub struct OsrmProvider {
    base_url: String,
}

impl OsrmProvider {
    /// Client against the public demo router.
    pub fn new() -> Self {
        Self::with_base_url(OSRM_BASE_URL)
    }

    /// Client against a self-hosted or test instance.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for OsrmProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
    distance: f64,
    duration: f64,
}

#[derive(Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>,
}

fn decode(body: OsrmResponse) -> Result<ProviderRoute, ProviderError> {
    match body.code.as_str() {
        "Ok" => {}
        "NoRoute" | "NoSegment" => return Err(ProviderError::NoRouteFound),
        other => {
            return Err(ProviderError::InvalidResponse(format!(
                "OSRM code {other}"
            )))
        }
    }

    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or(ProviderError::NoRouteFound)?;

    check_summary(route.distance, route.duration)?;
    let geometry = geometry_from_lonlat(&route.geometry.coordinates)?;

    Ok(ProviderRoute {
        geometry,
        distance_m: route.distance,
        duration_s: route.duration,
    })
}

impl RouteProvider for OsrmProvider {
    fn id(&self) -> &str {
        "osrm"
    }

    fn request_route(&self, req: &RouteRequest) -> Result<ProviderRoute, ProviderError> {
        let url = format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url,
            req.profile.osrm_profile(),
            req.start.lon,
            req.start.lat,
            req.dest.lon,
            req.dest.lat,
        );

        let client = http_client(req.timeout)?;
        let resp = client.get(&url).send().map_err(classify_transport)?;

        let status = resp.status();
        // OSRM reports routing verdicts as 400 with a code field, so
        // try to decode the body before classifying the status alone
        if !status.is_success() && status != reqwest::StatusCode::BAD_REQUEST {
            return Err(classify_status(status));
        }

        let parsed: OsrmResponse = resp
            .json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        decode(parsed)
    }
}
