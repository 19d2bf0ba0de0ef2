//! openrouteservice directions adapter.
//!
//! POSTs to `/v2/directions/{profile}/geojson` with the API key in the
//! `Authorization` header and decodes the GeoJSON feature response.

use serde::{Deserialize, Serialize};

use crate::error::ProviderError;
use crate::provider::{
    check_summary, classify_status, classify_transport, geometry_from_lonlat, http_client,
    ProviderRoute, RouteProvider, RouteRequest,
};

/// Public openrouteservice API endpoint.
pub const ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// openrouteservice directions client.
pub struct OrsProvider {
    base_url: String,
    api_key: String,
}

impl OrsProvider {
    /// Client against the public API.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, ORS_BASE_URL)
    }

    /// Client against a self-hosted or test instance.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[derive(Serialize)]
struct OrsRequestBody {
    /// [lon, lat] pairs, start then destination.
    coordinates: [[f64; 2]; 2],
    instructions: bool,
}

#[derive(Deserialize)]
struct OrsResponse {
    #[serde(default)]
    features: Vec<OrsFeature>,
}

#[derive(Deserialize)]
struct OrsFeature {
    geometry: OrsGeometry,
    properties: OrsProperties,
}

#[derive(Deserialize)]
struct OrsGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct OrsProperties {
    summary: OrsSummary,
}

#[derive(Deserialize)]
struct OrsSummary {
    distance: f64,
    duration: f64,
}

fn decode(body: OrsResponse) -> Result<ProviderRoute, ProviderError> {
    // An empty feature list is the ORS "no route" verdict
    let feature = body
        .features
        .into_iter()
        .next()
        .ok_or(ProviderError::NoRouteFound)?;

    let summary = feature.properties.summary;
    check_summary(summary.distance, summary.duration)?;
    let geometry = geometry_from_lonlat(&feature.geometry.coordinates)?;

    Ok(ProviderRoute {
        geometry,
        distance_m: summary.distance,
        duration_s: summary.duration,
    })
}

impl RouteProvider for OrsProvider {
    fn id(&self) -> &str {
        "ors"
    }

    fn request_route(&self, req: &RouteRequest) -> Result<ProviderRoute, ProviderError> {
        let url = format!(
            "{}/v2/directions/{}/geojson",
            self.base_url,
            req.profile.ors_profile()
        );
        let body = OrsRequestBody {
            coordinates: [
                [req.start.lon, req.start.lat],
                [req.dest.lon, req.dest.lat],
            ],
            instructions: false,
        };

        let client = http_client(req.timeout)?;
        let resp = client
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .json(&body)
            .send()
            .map_err(classify_transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(classify_status(status));
        }

        let parsed: OrsResponse = resp
            .json()
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        decode(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_geojson_response() {
        let json = r#"{
            "features": [{
                "geometry": {
                    "coordinates": [[30.16, 55.14], [30.17, 55.145], [30.18, 55.15]]
                },
                "properties": {
                    "summary": { "distance": 1850.0, "duration": 240.0 }
                }
            }]
        }"#;

        let parsed: OrsResponse = serde_json::from_str(json).unwrap();
        let route = decode(parsed).unwrap();

        assert_eq!(route.geometry.points().len(), 3);
        assert_eq!(route.geometry.points()[0].lat, 55.14);
        assert_eq!(route.distance_m, 1850.0);
        assert_eq!(route.duration_s, 240.0);
    }

    #[test]
    fn decode_empty_features_is_no_route() {
        let parsed: OrsResponse = serde_json::from_str(r#"{"features": []}"#).unwrap();
        assert_eq!(decode(parsed).unwrap_err(), ProviderError::NoRouteFound);
    }

    #[test]
    fn decode_missing_features_is_no_route() {
        let parsed: OrsResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(decode(parsed).unwrap_err(), ProviderError::NoRouteFound);
    }

    #[test]
    fn decode_short_geometry_is_invalid() {
        let json = r#"{
            "features": [{
                "geometry": { "coordinates": [[30.16, 55.14]] },
                "properties": { "summary": { "distance": 0.0, "duration": 0.0 } }
            }]
        }"#;

        let parsed: OrsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            decode(parsed),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn decode_negative_summary_is_invalid() {
        let json = r#"{
            "features": [{
                "geometry": { "coordinates": [[30.16, 55.14], [30.18, 55.15]] },
                "properties": { "summary": { "distance": -5.0, "duration": 240.0 } }
            }]
        }"#;

        let parsed: OrsResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            decode(parsed),
            Err(ProviderError::InvalidResponse(_))
        ));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let p = OrsProvider::with_base_url("key", "http://localhost:8080/");
        assert_eq!(p.base_url, "http://localhost:8080");
    }
}
