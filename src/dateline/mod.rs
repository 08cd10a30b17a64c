//! Clipping and wrapping of spherical geometry at the dateline.
//!
//! The dateline is modelled as a polygon of zero width covering the whole
//! globe: front side at longitude +180, back side at -180, joined across both
//! poles. Geometry is clipped against it with a spherical Greiner-Hormann
//! pass so that each output piece lies on one side of the dateline and draws
//! without wrap-around lines in a rectangular lat/lon projection.

mod builder;
mod classify;
mod config;
mod graph;
mod intersect;
mod tag;
mod traverse;

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{
    BoundingSmallCircle, LatLonPoint, PointOnSphere, PolygonOnSphere, PolylineOnSphere,
};

pub use builder::GraphBuilder;
pub use classify::{ClassifiedVertex, Side, VertexClassification, VertexClassifier};
pub use config::{WrapperConfig, DEFAULT_DATELINE_THICKNESS, DEFAULT_POLE_RADIUS};
pub use graph::{DatelineCorners, DatelineEdge, IntersectionGraph, ListKind, Vertex, VertexId};
pub use intersect::{IntersectionKind, IntersectionSolver};
pub use tag::tag_entry_exit;
pub use traverse::{generate_polygons, generate_polylines};

/// A wrapped polyline piece.
pub type LatLonPolyline = Vec<LatLonPoint>;

/// A wrapped polygon piece, as an open ring (the first vertex is not repeated).
pub type LatLonPolygon = Vec<LatLonPoint>;

/// Geometry that can be wrapped to the dateline.
pub trait Wrappable {
    /// Appends the wrapped pieces of `self` to `output`.
    fn wrap_into(&self, wrapper: &DateLineWrapper, output: &mut Vec<Vec<LatLonPoint>>);
}

impl Wrappable for PolylineOnSphere {
    fn wrap_into(&self, wrapper: &DateLineWrapper, output: &mut Vec<Vec<LatLonPoint>>) {
        wrapper.wrap_polyline_into(self, output);
    }
}

impl Wrappable for PolygonOnSphere {
    fn wrap_into(&self, wrapper: &DateLineWrapper, output: &mut Vec<Vec<LatLonPoint>>) {
        wrapper.wrap_polygon_into(self, output);
    }
}

/// Splits polylines and polygons where they cross the dateline.
///
/// Holds only configuration; every call builds and drops its own graph, so a
/// wrapper can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateLineWrapper {
    config: WrapperConfig,
}

impl DateLineWrapper {
    /// Creates a wrapper with the default tolerances.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wrapper with custom tolerances.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTolerance` if a tolerance is out of range.
    pub fn with_config(config: WrapperConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &WrapperConfig {
        &self.config
    }

    /// Wraps any supported geometry, returning its pieces.
    #[must_use]
    pub fn wrap_to_dateline<G: Wrappable + ?Sized>(&self, geometry: &G) -> Vec<Vec<LatLonPoint>> {
        let mut output = Vec::new();
        geometry.wrap_into(self, &mut output);
        output
    }

    /// Wraps any supported geometry, appending its pieces to `output`.
    pub fn wrap_to_dateline_into<G: Wrappable + ?Sized>(
        &self,
        geometry: &G,
        output: &mut Vec<Vec<LatLonPoint>>,
    ) {
        geometry.wrap_into(self, output);
    }

    /// Wraps a polyline, returning at least one piece.
    #[must_use]
    pub fn wrap_polyline(&self, polyline: &PolylineOnSphere) -> Vec<LatLonPolyline> {
        let mut output = Vec::new();
        self.wrap_polyline_into(polyline, &mut output);
        output
    }

    /// Wraps a polygon, returning at least one piece.
    #[must_use]
    pub fn wrap_polygon(&self, polygon: &PolygonOnSphere) -> Vec<LatLonPolygon> {
        let mut output = Vec::new();
        self.wrap_polygon_into(polygon, &mut output);
        output
    }

    /// Wraps a polyline, appending its pieces to `output`.
    ///
    /// A polyline that does not cross the dateline is appended unchanged as a
    /// single piece; one that crosses is split at each crossing.
    pub fn wrap_polyline_into(
        &self,
        polyline: &PolylineOnSphere,
        output: &mut Vec<LatLonPolyline>,
    ) {
        self.wrap(polyline.vertices(), None, output);
    }

    /// Wraps a polygon, appending its pieces to `output`.
    ///
    /// Each piece is an open ring. Pieces that enclose a pole include the
    /// dateline corners along the top or bottom of the lat/lon rectangle.
    pub fn wrap_polygon_into(&self, polygon: &PolygonOnSphere, output: &mut Vec<LatLonPolygon>) {
        self.wrap(polygon.vertices(), Some(polygon), output);
    }

    /// Cheap test of whether geometry bounded by `bounding` might cross the
    /// dateline. `false` guarantees it does not.
    #[must_use]
    pub fn intersects_dateline(bounding: &BoundingSmallCircle) -> bool {
        bounding.angular_distance_to_dateline() <= bounding.angular_radius()
    }

    /// Tests the vertices of a geometry for anything that could need
    /// wrapping: a vertex on the dateline or at a pole, or an arc between
    /// vertices on opposite sides of the dateline plane.
    #[must_use]
    pub fn possibly_intersects_dateline(&self, points: &[PointOnSphere], is_polygon: bool) -> bool {
        let vertices: Vec<ClassifiedVertex> = VertexClassifier::new(&self.config)
            .classify_all(points)
            .collect();
        possibly_intersects(&vertices, is_polygon)
    }

    fn wrap(
        &self,
        points: &[PointOnSphere],
        polygon: Option<&PolygonOnSphere>,
        output: &mut Vec<Vec<LatLonPoint>>,
    ) {
        let is_polygon = polygon.is_some();
        let vertices: Vec<ClassifiedVertex> = VertexClassifier::new(&self.config)
            .classify_all(points)
            .collect();

        if !possibly_intersects(&vertices, is_polygon) {
            debug!(is_polygon, len = vertices.len(), "geometry does not touch dateline");
            output.push(vertices.iter().map(|v| v.lat_lon).collect());
            return;
        }

        if vertices.iter().all(|v| v.classification.side().is_none()) {
            debug!(is_polygon, len = vertices.len(), "geometry lies entirely on dateline plane");
            output.push(unclipped_on_dateline(&vertices));
            return;
        }

        let mut graph = GraphBuilder::new(&self.config).build(&vertices, is_polygon);

        if graph.intersection_count(ListKind::Geometry) == 0 {
            debug!(is_polygon, "geometry does not cross dateline");
            if vertices.iter().any(|v| v.classification.touches_dateline()) {
                output.push(graph.geometry_points());
            } else {
                output.push(vertices.iter().map(|v| v.lat_lon).collect());
            }
            return;
        }

        let pieces = match polygon {
            Some(polygon) => {
                tag_entry_exit(&mut graph, polygon);
                generate_polygons(&mut graph)
            }
            None => generate_polylines(&graph),
        };

        if pieces.is_empty() {
            warn!(is_polygon, "wrapping produced no output, returning geometry unclipped");
            output.push(graph.geometry_points());
        } else {
            output.extend(pieces);
        }
    }
}

fn possibly_intersects(vertices: &[ClassifiedVertex], is_polygon: bool) -> bool {
    if vertices.iter().any(|v| v.classification.touches_dateline()) {
        return true;
    }

    let opposite = |a: &ClassifiedVertex, b: &ClassifiedVertex| {
        matches!(
            (a.classification.side(), b.classification.side()),
            (Some(x), Some(y)) if x != y
        )
    };

    let closing = match (is_polygon, vertices.first(), vertices.last()) {
        (true, Some(first), Some(last)) => opposite(last, first),
        _ => false,
    };
    closing || vertices.windows(2).any(|w| opposite(&w[0], &w[1]))
}

/// Geometry lying on the dateline plane is returned unclipped, with dateline
/// vertices at +180.
fn unclipped_on_dateline(vertices: &[ClassifiedVertex]) -> Vec<LatLonPoint> {
    vertices
        .iter()
        .map(|v| match v.classification {
            VertexClassification::OnDatelineArc => {
                LatLonPoint::new_unchecked(v.lat_lon.latitude(), 180.0)
            }
            _ => v.lat_lon,
        })
        .collect()
}
