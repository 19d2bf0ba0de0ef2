//! Provider fallback and degraded-route policy.
//!
//! A resolve walks the configured provider list in order and stops at
//! the first success. When every provider fails, the resolver degrades
//! to a straight-line estimate instead of surfacing an error, so the
//! caller always has something to render. Degraded results carry
//! `approximate: true`; their summary is a guess, not a measurement.

use std::sync::Arc;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::geo;
use crate::provider::{ProviderRoute, RouteProvider, RouteRequest};
use crate::route::{RouteGeometry, RouteResult, RouteSummary, TravelProfile};

/// Provider id recorded on degraded straight-line results.
pub const STRAIGHT_LINE_ID: &str = "straight-line";

/// Assumed speeds for degraded-route duration estimates, in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    pub driving_speed_mps: f64,
    pub walking_speed_mps: f64,
    pub cycling_speed_mps: f64,
    pub hgv_speed_mps: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            driving_speed_mps: 13.9,
            walking_speed_mps: 1.4,
            cycling_speed_mps: 4.2,
            hgv_speed_mps: 11.1,
        }
    }
}

impl ResolverConfig {
    /// Nominal speed for a profile.
    ///
    /// A non-positive configured value falls back to 1.0 m/s so the
    /// estimated duration stays finite.
    pub fn nominal_speed_mps(&self, profile: TravelProfile) -> f64 {
        let v = match profile {
            TravelProfile::Driving => self.driving_speed_mps,
            TravelProfile::Walking => self.walking_speed_mps,
            TravelProfile::Cycling => self.cycling_speed_mps,
            TravelProfile::HeavyGoodsVehicle => self.hgv_speed_mps,
        };
        if v > 0.0 {
            v
        } else {
            1.0
        }
    }
}

/// Resolution progress for one resolve call.
#[derive(Debug)]
enum ResolveState {
    Pending,
    TryingProvider(usize),
    Succeeded(RouteResult),
    AllFailed,
}

/// Orders providers and applies the fallback policy.
#[derive(Clone)]
pub struct RouteResolver {
    providers: Vec<Arc<dyn RouteProvider>>,
    config: ResolverConfig,
}

impl RouteResolver {
    /// Build a resolver over an ordered provider list.
    ///
    /// Priority is the list order and never changes afterwards.
    pub fn new(providers: Vec<Arc<dyn RouteProvider>>, config: ResolverConfig) -> Self {
        Self { providers, config }
    }

    /// Resolve one route request.
    ///
    /// Never fails: exhausting the provider list yields a straight-line
    /// estimate with `approximate: true`. Each provider is tried at
    /// most once per call, in order.
    pub fn resolve(&self, req: &RouteRequest) -> RouteResult {
        let mut state = ResolveState::Pending;

        loop {
            state = match state {
                ResolveState::Pending => {
                    if self.providers.is_empty() {
                        ResolveState::AllFailed
                    } else {
                        ResolveState::TryingProvider(0)
                    }
                }
                ResolveState::TryingProvider(i) => {
                    let provider = &self.providers[i];
                    debug!(
                        "trying provider {} ({}/{})",
                        provider.id(),
                        i + 1,
                        self.providers.len()
                    );
                    match provider.request_route(req) {
                        Ok(route) => ResolveState::Succeeded(success(provider.id(), route)),
                        Err(err) => {
                            warn!("provider {} failed: {err}", provider.id());
                            if i + 1 < self.providers.len() {
                                ResolveState::TryingProvider(i + 1)
                            } else {
                                ResolveState::AllFailed
                            }
                        }
                    }
                }
                ResolveState::Succeeded(result) => {
                    info!(
                        "route resolved by {}: {}",
                        result.provider_id, result.summary
                    );
                    return result;
                }
                ResolveState::AllFailed => {
                    warn!("all providers failed, degrading to straight line");
                    return self.straight_line(req);
                }
            };
        }
    }

    /// Two-point estimate between the endpoints.
    fn straight_line(&self, req: &RouteRequest) -> RouteResult {
        let distance_m = geo::distance(req.start, req.dest);
        let duration_s = distance_m / self.config.nominal_speed_mps(req.profile);

        RouteResult {
            geometry: RouteGeometry::line(req.start, req.dest),
            summary: RouteSummary {
                distance_m,
                duration_s,
            },
            provider_id: STRAIGHT_LINE_ID.to_string(),
            approximate: true,
        }
    }
}

fn success(provider_id: &str, route: ProviderRoute) -> RouteResult {
    RouteResult {
        geometry: route.geometry,
        summary: RouteSummary {
            distance_m: route.distance_m,
            duration_s: route.duration_s,
        },
        provider_id: provider_id.to_string(),
        approximate: false,
    }
}
