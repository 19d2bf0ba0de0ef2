//! GPX export of resolved routes.
//!
//! Writes a route result as a GPX 1.1 `<rte>` so the host can offer
//! saving or sharing a computed route. Routes are planned paths, so
//! they go out as `<rte>` rather than `<trk>`.

use geo_types::Point;
use gpx::{Gpx, GpxVersion, Route, Waypoint};

use crate::error::ExportError;
use crate::route::RouteResult;

/// Serialize a resolved route as a GPX 1.1 document.
///
/// The route name carries the producing provider id; the description
/// carries the summary. Approximate results are exported like any
/// other, the name makes their origin visible.
pub fn route_to_gpx(result: &RouteResult) -> Result<String, ExportError> {
    let mut route = Route::default();
    route.name = Some(result.provider_id.clone());
    route.description = Some(result.summary.to_string());
    route.points = result
        .geometry
        .points()
        .iter()
        .map(|c| Waypoint::new(Point::new(c.lon, c.lat)))
        .collect();

    let gpx = Gpx {
        version: GpxVersion::Gpx11,
        creator: Some("kartnav".to_string()),
        routes: vec![route],
        ..Gpx::default()
    };

    let mut out = Vec::new();
    gpx::write(&gpx, &mut out)?;
    Ok(String::from_utf8(out)?)
}
