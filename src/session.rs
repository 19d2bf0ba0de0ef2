//! Stateful navigation façade.
//!
//! Owns the endpoints, profile, resolved route, and tracking state for
//! one navigation flow; no navigation state lives outside a session
//! instance. Resolution is
//! generation-tagged: starting a new resolve or clearing the session
//! supersedes anything still in flight, and superseded outcomes are
//! discarded at commit time. Samples can never race a resolve: both go
//! through `&mut self`, and the tracker is restarted whenever the
//! committed route changes.

use std::sync::Arc;

use log::{debug, info};

use crate::error::InvalidInput;
use crate::geo::Coordinate;
use crate::progress::{PositionSample, ProgressState, ProgressTracker};
use crate::provider::{RouteProvider, RouteRequest};
use crate::resolver::{ResolverConfig, RouteResolver};
use crate::route::{RouteResult, TravelProfile};

/// Callbacks through which the session reports to the host.
///
/// Every method defaults to a no-op so hosts implement only what they
/// render.
pub trait NavigationEvents {
    fn on_route_resolved(&mut self, _result: &RouteResult) {}

    fn on_progress_updated(&mut self, _state: &ProgressState) {}

    /// Called in addition to `on_route_resolved` when every provider
    /// failed and the committed result is a straight-line estimate.
    fn on_resolution_degraded(&mut self, _result: &RouteResult) {}
}

/// Events sink that ignores everything.
pub struct NoEvents;

impl NavigationEvents for NoEvents {}

/// Snapshot of one resolve attempt, runnable off the session thread.
///
/// Holds no borrow of the session; a host may move it to a worker,
/// call [`PendingResolve::run`], and hand the outcome back to
/// [`NavigationSession::complete_resolve`] on the session thread.
pub struct PendingResolve {
    generation: u64,
    request: RouteRequest,
    resolver: RouteResolver,
}

impl PendingResolve {
    /// Generation tag of this attempt.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run the blocking provider loop.
    pub fn run(&self) -> ResolveOutcome {
        ResolveOutcome {
            generation: self.generation,
            result: self.resolver.resolve(&self.request),
        }
    }
}

/// Result of a finished resolve attempt, tagged for supersession.
pub struct ResolveOutcome {
    generation: u64,
    result: RouteResult,
}

impl ResolveOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn result(&self) -> &RouteResult {
        &self.result
    }
}

/// One user-facing navigation flow.
///
/// Each session owns its resolver/tracker pair; nothing is shared
/// across sessions.
pub struct NavigationSession {
    start: Option<Coordinate>,
    dest: Option<Coordinate>,
    profile: TravelProfile,
    current: Option<RouteResult>,
    tracking: bool,
    generation: u64,
    resolver: RouteResolver,
    tracker: ProgressTracker,
    events: Box<dyn NavigationEvents>,
}

impl NavigationSession {
    pub fn new(
        providers: Vec<Arc<dyn RouteProvider>>,
        config: ResolverConfig,
        events: Box<dyn NavigationEvents>,
    ) -> Self {
        Self {
            start: None,
            dest: None,
            profile: TravelProfile::default(),
            current: None,
            tracking: false,
            generation: 0,
            resolver: RouteResolver::new(providers, config),
            tracker: ProgressTracker::new(),
            events,
        }
    }

    /// Set the start point.
    ///
    /// Returns whether both endpoints are now present, i.e. whether a
    /// `resolve_and_track` would proceed. The host decides when to
    /// actually call it, so repeated marker drags cannot storm the
    /// network from inside the core.
    pub fn set_start(&mut self, c: Coordinate) -> Result<bool, InvalidInput> {
        c.validate()?;
        self.start = Some(c);
        Ok(self.ready())
    }

    /// Set the destination point. Same contract as [`Self::set_start`].
    pub fn set_dest(&mut self, c: Coordinate) -> Result<bool, InvalidInput> {
        c.validate()?;
        self.dest = Some(c);
        Ok(self.ready())
    }

    /// Switch the travel profile. Returns whether a resolve would
    /// proceed; the host re-resolves when it wants the new mode applied.
    pub fn set_profile(&mut self, profile: TravelProfile) -> bool {
        self.profile = profile;
        self.ready()
    }

    /// Both endpoints set.
    pub fn ready(&self) -> bool {
        self.start.is_some() && self.dest.is_some()
    }

    pub fn profile(&self) -> TravelProfile {
        self.profile
    }

    pub fn current_result(&self) -> Option<&RouteResult> {
        self.current.as_ref()
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Current generation. Bumped by `begin_resolve` and `clear`.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Snapshot a resolve attempt and supersede any attempt still in
    /// flight; stale outcomes will be discarded at commit.
    pub fn begin_resolve(&mut self) -> Result<PendingResolve, InvalidInput> {
        let (Some(start), Some(dest)) = (self.start, self.dest) else {
            return Err(InvalidInput::MissingEndpoint);
        };

        self.generation += 1;
        debug!("resolve generation {} started", self.generation);

        Ok(PendingResolve {
            generation: self.generation,
            request: RouteRequest::new(start, dest, self.profile),
            resolver: self.resolver.clone(),
        })
    }

    /// Commit a finished attempt.
    ///
    /// Returns false, changing nothing, when the outcome was superseded
    /// by a newer `begin_resolve` or by `clear`. Otherwise replaces the
    /// current result, restarts the tracker if tracking was active, and
    /// notifies the events sink.
    pub fn complete_resolve(&mut self, outcome: ResolveOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(
                "discarding stale resolve outcome (generation {}, current {})",
                outcome.generation, self.generation
            );
            return false;
        }

        let result = outcome.result;
        info!(
            "route committed: {} via {}{}",
            result.summary,
            result.provider_id,
            if result.approximate { " (approximate)" } else { "" }
        );

        if self.tracking {
            self.tracker.start(result.geometry.clone(), result.summary);
        }

        self.events.on_route_resolved(&result);
        if result.approximate {
            self.events.on_resolution_degraded(&result);
        }

        self.current = Some(result);
        true
    }

    /// Resolve with the configured providers and restart tracking if it
    /// was active. The single entry point the host calls (debounced on
    /// its side) after endpoint or profile changes.
    pub fn resolve_and_track(&mut self) -> Result<RouteResult, InvalidInput> {
        let pending = self.begin_resolve()?;
        let outcome = pending.run();
        let result = outcome.result.clone();
        self.complete_resolve(outcome);
        Ok(result)
    }

    /// Begin forwarding position samples against the current route.
    ///
    /// Returns false when there is no resolved route to track yet.
    pub fn start_tracking(&mut self) -> bool {
        let Some(current) = &self.current else {
            return false;
        };
        self.tracker.start(current.geometry.clone(), current.summary);
        self.tracking = true;
        true
    }

    /// Stop forwarding samples and discard progress state.
    pub fn stop_tracking(&mut self) {
        self.tracking = false;
        self.tracker.stop();
    }

    /// Forward one position sample to the tracker.
    ///
    /// Ignored (`Ok(None)`) while not tracking. An out-of-range sample
    /// is rejected with an error and changes nothing.
    pub fn on_position_sample(
        &mut self,
        sample: PositionSample,
    ) -> Result<Option<ProgressState>, InvalidInput> {
        if !self.tracking {
            return Ok(None);
        }

        let state = self.tracker.on_position_sample(sample)?;
        if let Some(state) = &state {
            self.events.on_progress_updated(state);
        }
        Ok(state)
    }

    /// Drop endpoints, route, and tracking state.
    ///
    /// Any in-flight resolve is superseded; its outcome will be
    /// discarded on commit.
    pub fn clear(&mut self) {
        self.start = None;
        self.dest = None;
        self.current = None;
        self.stop_tracking();
        self.generation += 1;
        info!("session cleared");
    }

    /// Current result as JSON for a host boundary.
    pub fn current_result_json(&self) -> Result<Option<String>, serde_json::Error> {
        self.current.as_ref().map(|r| r.to_json()).transpose()
    }
}
