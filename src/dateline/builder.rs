use tracing::trace;

use crate::geometry::{GreatCircleArc, LatLonPoint};

use super::classify::{ClassifiedVertex, Side, VertexClassification};
use super::config::WrapperConfig;
use super::graph::IntersectionGraph;
use super::intersect::{IntersectionKind, IntersectionSolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pole {
    North,
    South,
}

impl Pole {
    fn latitude(self) -> f64 {
        match self {
            Pole::North => 90.0,
            Pole::South => -90.0,
        }
    }
}

/// Builds the intersection graph of a geometry and the dateline.
///
/// Walks the geometry's arcs in order, emitting regular vertices and, where an
/// arc crosses the dateline, a pair of intersection vertices: an exit on the
/// side being left and an entry on the side being reached.
#[derive(Debug, Clone, Copy)]
pub struct GraphBuilder {
    solver: IntersectionSolver,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(config: &WrapperConfig) -> Self {
        Self {
            solver: IntersectionSolver::new(config),
        }
    }

    /// Builds the graph for classified geometry vertices.
    ///
    /// Polygons are walked starting from their first vertex strictly in front
    /// of or behind the dateline so that no run of dateline vertices wraps
    /// around the end of the ring.
    #[must_use]
    pub fn build(&self, vertices: &[ClassifiedVertex], is_polygon: bool) -> IntersectionGraph {
        let start = if is_polygon {
            vertices
                .iter()
                .position(|v| v.classification.side().is_some())
                .unwrap_or(0)
        } else {
            0
        };
        let vertices: Vec<ClassifiedVertex> = vertices[start..]
            .iter()
            .chain(&vertices[..start])
            .copied()
            .collect();

        let initial_side = vertices
            .iter()
            .find_map(|v| v.classification.side())
            .unwrap_or(Side::Front);

        let mut state = BuildState {
            solver: &self.solver,
            graph: IntersectionGraph::new(is_polygon, vertices.len()),
            side: initial_side,
            last_longitude: None,
        };

        let n = vertices.len();
        let mut i = 0;
        while i < n {
            let vertex = &vertices[i];

            if vertex.classification.touches_dateline() {
                let mut end = i;
                while end + 1 < n && vertices[end + 1].classification.touches_dateline() {
                    end += 1;
                }
                let previous = i.checked_sub(1).map(|p| &vertices[p]);
                let next = if end + 1 < n {
                    Some(&vertices[end + 1])
                } else if is_polygon {
                    vertices.first()
                } else {
                    None
                };
                state.add_dateline_run(previous, &vertices[i..=end], next);
                i = end + 1;
                continue;
            }

            if let Some(previous) = i.checked_sub(1).map(|p| &vertices[p]) {
                state.add_arc(previous, vertex);
            }
            state.add_regular(vertex.lat_lon);
            if let Some(side) = vertex.classification.side() {
                state.side = side;
            }
            i += 1;
        }

        if is_polygon && n > 1 {
            state.add_arc(&vertices[n - 1], &vertices[0]);
        }

        state.graph
    }
}

struct BuildState<'a> {
    solver: &'a IntersectionSolver,
    graph: IntersectionGraph,
    /// Side of the dateline the geometry is currently attached to.
    side: Side,
    /// Longitude of the most recently emitted geometry vertex.
    last_longitude: Option<f64>,
}

impl BuildState<'_> {
    fn add_regular(&mut self, point: LatLonPoint) {
        self.graph.add_vertex(point);
        self.last_longitude = Some(point.longitude());
    }

    /// Handles whatever lies strictly between two consecutive vertices that
    /// are not themselves on the dateline.
    fn add_arc(&mut self, start: &ClassifiedVertex, end: &ClassifiedVertex) {
        use VertexClassification as C;

        match (start.classification, end.classification) {
            (C::Front | C::Back, C::Front | C::Back) => {
                let arc = GreatCircleArc::new(start.point, end.point);
                let Some((point, kind)) =
                    self.solver.intersect(&arc, start.classification, end.classification)
                else {
                    return;
                };
                let (Some(from), Some(to)) =
                    (start.classification.side(), end.classification.side())
                else {
                    return;
                };
                match kind {
                    IntersectionKind::Dateline => {
                        let latitude = LatLonPoint::from_point_on_sphere(&point).latitude();
                        self.add_dateline_crossing(latitude, from, to);
                    }
                    IntersectionKind::NorthPole => self.add_pole_crossing(
                        Pole::North,
                        start.lat_lon.longitude(),
                        end.lat_lon.longitude(),
                    ),
                    IntersectionKind::SouthPole => self.add_pole_crossing(
                        Pole::South,
                        start.lat_lon.longitude(),
                        end.lat_lon.longitude(),
                    ),
                }
            }
            (C::OnDatelineArc, C::OnPlaneOffArc) => {
                let pole = pole_passed(start.lat_lon.latitude(), end.lat_lon.latitude());
                self.add_pole_passage(
                    pole,
                    self.side.dateline_longitude(),
                    end.lat_lon.longitude(),
                );
            }
            _ => {}
        }
    }

    /// Emits a maximal run of vertices on the dateline arc or at a pole.
    ///
    /// The run is attached to the side of the vertex before it. If the vertex
    /// after it is on the other side, the run's last vertex becomes a
    /// crossing.
    fn add_dateline_run(
        &mut self,
        previous: Option<&ClassifiedVertex>,
        run: &[ClassifiedVertex],
        next: Option<&ClassifiedVertex>,
    ) {
        let side_in = previous
            .and_then(|v| v.classification.side())
            .unwrap_or(self.side);
        let side_out = next
            .and_then(|v| v.classification.side())
            .unwrap_or(side_in);

        if let (Some(previous), Some(first)) = (previous, run.first()) {
            if previous.classification == VertexClassification::OnPlaneOffArc
                && first.classification == VertexClassification::OnDatelineArc
            {
                let pole = pole_passed(previous.lat_lon.latitude(), first.lat_lon.latitude());
                self.add_pole_passage(
                    pole,
                    previous.lat_lon.longitude(),
                    side_in.dateline_longitude(),
                );
            }
        }

        for (k, vertex) in run.iter().enumerate() {
            let crosses = k + 1 == run.len() && side_in != side_out;
            let pole = match vertex.classification {
                VertexClassification::NearNorthPole => Pole::North,
                VertexClassification::NearSouthPole => Pole::South,
                VertexClassification::OnDatelineArc => {
                    let latitude = vertex.lat_lon.latitude();
                    if crosses {
                        self.add_dateline_crossing(latitude, side_in, side_out);
                    } else {
                        self.add_regular(LatLonPoint::new_unchecked(
                            latitude,
                            side_in.dateline_longitude(),
                        ));
                    }
                    continue;
                }
                VertexClassification::Front
                | VertexClassification::Back
                | VertexClassification::OnPlaneOffArc => {
                    self.add_regular(vertex.lat_lon);
                    continue;
                }
            };

            let following = run.get(k + 1).or(next);
            let after = following
                .and_then(|v| match v.classification {
                    VertexClassification::OnDatelineArc => Some(side_in.dateline_longitude()),
                    VertexClassification::NearNorthPole | VertexClassification::NearSouthPole => {
                        None
                    }
                    VertexClassification::Front
                    | VertexClassification::Back
                    | VertexClassification::OnPlaneOffArc => Some(v.lat_lon.longitude()),
                })
                .or(self.last_longitude)
                .unwrap_or_else(|| side_in.dateline_longitude());
            let before = self.last_longitude.unwrap_or(after);

            if crosses {
                self.add_pole_crossing(pole, before, after);
            } else {
                self.add_pole_passage(pole, before, after);
            }
        }

        self.side = side_out;
    }

    fn add_dateline_crossing(&mut self, latitude: f64, from: Side, to: Side) {
        trace!(latitude, ?from, ?to, "geometry crosses dateline");
        match from {
            Side::Front => self.graph.add_intersection_vertex_on_front_dateline(latitude, true),
            Side::Back => self.graph.add_intersection_vertex_on_back_dateline(latitude, true),
        };
        match to {
            Side::Front => self.graph.add_intersection_vertex_on_front_dateline(latitude, false),
            Side::Back => self.graph.add_intersection_vertex_on_back_dateline(latitude, false),
        };
        self.last_longitude = Some(to.dateline_longitude());
    }

    fn add_pole_crossing(&mut self, pole: Pole, exit_longitude: f64, entry_longitude: f64) {
        trace!(?pole, exit_longitude, entry_longitude, "geometry crosses dateline at pole");
        match pole {
            Pole::North => {
                self.graph.add_intersection_vertex_on_north_pole(exit_longitude, true);
                self.graph.add_intersection_vertex_on_north_pole(entry_longitude, false);
            }
            Pole::South => {
                self.graph.add_intersection_vertex_on_south_pole(exit_longitude, true);
                self.graph.add_intersection_vertex_on_south_pole(entry_longitude, false);
            }
        }
        self.last_longitude = Some(entry_longitude);
    }

    /// Two regular vertices along the top or bottom of the lat/lon rectangle.
    fn add_pole_passage(&mut self, pole: Pole, from_longitude: f64, to_longitude: f64) {
        match pole {
            Pole::North => self.graph.set_intersected_north_pole(),
            Pole::South => self.graph.set_intersected_south_pole(),
        }
        let latitude = pole.latitude();
        self.add_regular(LatLonPoint::new_unchecked(latitude, from_longitude));
        self.add_regular(LatLonPoint::new_unchecked(latitude, to_longitude));
    }
}

/// The pole on the shorter path between a point on the prime meridian and a
/// point on the dateline.
fn pole_passed(latitude_a: f64, latitude_b: f64) -> Pole {
    if latitude_a + latitude_b >= 0.0 {
        Pole::North
    } else {
        Pole::South
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::dateline::classify::VertexClassifier;
    use crate::dateline::graph::ListKind;
    use crate::geometry::PointOnSphere;

    fn classified(coords: &[(f64, f64)]) -> Vec<ClassifiedVertex> {
        let points: Vec<PointOnSphere> = coords
            .iter()
            .map(|&(lat, lon)| PointOnSphere::from_lat_lon(&LatLonPoint::new(lat, lon).unwrap()))
            .collect();
        VertexClassifier::new(&WrapperConfig::default())
            .classify_all(&points)
            .collect()
    }

    fn build(coords: &[(f64, f64)], is_polygon: bool) -> IntersectionGraph {
        GraphBuilder::new(&WrapperConfig::default()).build(&classified(coords), is_polygon)
    }

    fn longitudes(graph: &IntersectionGraph) -> Vec<f64> {
        graph.geometry_points().iter().map(LatLonPoint::longitude).collect()
    }

    // ── crossings ──

    #[test]
    fn straddling_square_gets_two_crossings() {
        let graph = build(
            &[(10.0, 175.0), (10.0, -175.0), (-10.0, -175.0), (-10.0, 175.0)],
            true,
        );
        assert_eq!(graph.len(ListKind::Geometry), 8);
        assert_eq!(graph.intersection_count(ListKind::Geometry), 4);
        assert_eq!(graph.intersection_count(ListKind::Dateline), 4);

        let lons = longitudes(&graph);
        assert_abs_diff_eq!(lons[1], 180.0);
        assert_abs_diff_eq!(lons[2], -180.0);
        assert_abs_diff_eq!(lons[5], -180.0);
        assert_abs_diff_eq!(lons[6], 180.0);
    }

    #[test]
    fn closing_arc_is_checked() {
        // Rotated so the crossing lands on the closing arc.
        let graph = build(
            &[(10.0, -175.0), (-10.0, -175.0), (-10.0, 175.0), (10.0, 175.0)],
            true,
        );
        assert_eq!(graph.intersection_count(ListKind::Geometry), 4);
        let lons = longitudes(&graph);
        assert_abs_diff_eq!(lons[6], 180.0);
        assert_abs_diff_eq!(lons[7], -180.0);
    }

    #[test]
    fn polyline_over_north_pole_crosses_at_pole() {
        let graph = build(&[(89.0, 10.0), (89.0, -170.0)], false);
        assert!(graph.intersected_north_pole());
        let points = graph.geometry_points();
        assert_eq!(points.len(), 4);
        assert_abs_diff_eq!(points[1].latitude(), 90.0);
        assert_abs_diff_eq!(points[1].longitude(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[2].longitude(), -170.0, epsilon = 1e-9);
    }

    #[test]
    fn prime_meridian_crossing_adds_nothing() {
        let graph = build(&[(0.0, 10.0), (0.0, -10.0)], false);
        assert_eq!(graph.len(ListKind::Geometry), 2);
        assert_eq!(graph.intersection_count(ListKind::Geometry), 0);
    }

    // ── vertices on the dateline ──

    #[test]
    fn touching_from_front_stays_at_plus_180() {
        let graph = build(&[(0.0, 170.0), (10.0, 180.0), (20.0, 170.0)], false);
        assert_eq!(graph.intersection_count(ListKind::Geometry), 0);
        assert_abs_diff_eq!(longitudes(&graph)[1], 180.0);
    }

    #[test]
    fn touching_from_back_stays_at_minus_180() {
        let graph = build(&[(0.0, -170.0), (10.0, 180.0), (20.0, -170.0)], false);
        assert_eq!(graph.intersection_count(ListKind::Geometry), 0);
        assert_abs_diff_eq!(longitudes(&graph)[1], -180.0);
    }

    #[test]
    fn vertex_on_dateline_between_sides_is_a_crossing() {
        let graph = build(&[(0.0, 170.0), (10.0, 180.0), (20.0, -170.0)], false);
        let lons = longitudes(&graph);
        assert_eq!(lons.len(), 4);
        assert_eq!(graph.intersection_count(ListKind::Geometry), 2);
        assert_abs_diff_eq!(lons[1], 180.0);
        assert_abs_diff_eq!(lons[2], -180.0);
    }

    #[test]
    fn meridian_arc_to_dateline_passes_pole() {
        let graph = build(&[(10.0, 20.0), (60.0, 0.0), (70.0, 180.0), (20.0, 170.0)], false);
        assert!(graph.intersected_north_pole());
        let points = graph.geometry_points();
        assert_eq!(points.len(), 6);
        assert_abs_diff_eq!(points[2].latitude(), 90.0);
        assert_abs_diff_eq!(points[3].latitude(), 90.0);
        assert_abs_diff_eq!(points[3].longitude(), 180.0);
        assert_abs_diff_eq!(points[4].longitude(), 180.0);
    }

    #[test]
    fn pole_vertex_becomes_two_vertices() {
        let graph = build(&[(80.0, 30.0), (90.0, 0.0), (80.0, 100.0)], false);
        let points = graph.geometry_points();
        assert_eq!(points.len(), 4);
        assert_abs_diff_eq!(points[1].longitude(), 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(points[2].longitude(), 100.0, epsilon = 1e-9);
        assert!(graph.intersected_north_pole());
    }
}
