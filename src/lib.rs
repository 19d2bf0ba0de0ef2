//! Route-resolution and progress-tracking core for a map viewer.
//!
//! The host resolves addresses and paints overlays; this crate owns
//! the part in between: asking an ordered list of directions providers
//! for a route, falling back on failure (down to a straight-line
//! estimate), and projecting live position samples onto the resolved
//! path to report remaining distance and time.

pub mod error;
pub mod export;
pub mod geo;
pub mod ors;
pub mod osrm;
pub mod progress;
pub mod provider;
pub mod resolver;
pub mod route;
pub mod session;

pub use error::{ExportError, InvalidInput, ProviderError};
pub use geo::Coordinate;
pub use ors::OrsProvider;
pub use osrm::OsrmProvider;
pub use progress::{PositionSample, ProgressState, ProgressTracker};
pub use provider::{ProviderRoute, RouteProvider, RouteRequest};
pub use resolver::{ResolverConfig, RouteResolver, STRAIGHT_LINE_ID};
pub use session::{
    NavigationEvents, NavigationSession, NoEvents, PendingResolve, ResolveOutcome,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
