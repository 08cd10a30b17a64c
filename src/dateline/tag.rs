use tracing::debug;

use crate::geometry::{LatLonPoint, PointOnSphere, PolygonOnSphere};

use super::graph::{DatelineEdge, IntersectionGraph, ListKind, VertexId};

/// Tags every intersection on the dateline list as entering or exiting the
/// geometry polygon.
///
/// One reference point on the dateline polygon that is known not to coincide with
/// the geometry is tested for containment in `polygon`. Walking the dateline
/// list from there, the inside/outside state toggles at each intersection.
///
/// # Panics
///
/// Panics if called on a polyline graph, or if the walk does not return to
/// its initial state (an odd number of dateline intersections).
pub fn tag_entry_exit(graph: &mut IntersectionGraph, polygon: &PolygonOnSphere) {
    let Some(corners) = graph.corners().copied() else {
        panic!("entry/exit tagging requires a polygon intersection graph");
    };

    let (start, reference) = if !graph.intersected_south_pole() {
        (corners.south_front, PointOnSphere::south_pole())
    } else if !graph.intersected_north_pole() {
        (corners.north_front, PointOnSphere::north_pole())
    } else {
        longest_side_gap(graph).unwrap_or((corners.south_front, PointOnSphere::south_pole()))
    };

    let initially_inside = polygon.is_point_in_polygon(&reference);
    debug!(initially_inside, "tagging dateline intersections");

    let mut inside = initially_inside;
    let mut id = graph.next(start);
    for _ in 0..graph.len(ListKind::Dateline) {
        let vertex = graph.vertex_mut(id);
        if vertex.is_intersection {
            vertex.exits_other_polygon = inside;
            inside = !inside;
        }
        id = graph.next(id);
    }

    assert_eq!(
        inside, initially_inside,
        "odd number of intersections on the dateline"
    );
}

/// Finds the widest latitude interval between consecutive vertices on the
/// front or back edge of the dateline polygon.
///
/// Returns the vertex at the start of that interval and a reference point at its
/// middle.
fn longest_side_gap(graph: &IntersectionGraph) -> Option<(VertexId, PointOnSphere)> {
    let mut best: Option<(f64, VertexId, f64, f64)> = None;

    for id in graph.iter(ListKind::Dateline) {
        let next = graph.next(id);
        let (a, b) = (graph.vertex(id), graph.vertex(next));
        let on_side = |edge: Option<DatelineEdge>| {
            matches!(edge, None | Some(DatelineEdge::Front | DatelineEdge::Back))
        };
        // Corners carry no edge; two consecutive vertices at the same
        // longitude bound an interval of the front or back edge.
        if !on_side(a.dateline_edge) || !on_side(b.dateline_edge) {
            continue;
        }
        if (a.point.longitude() - b.point.longitude()).abs() > f64::EPSILON {
            continue;
        }
        let gap = (a.point.latitude() - b.point.latitude()).abs();
        if best.is_none_or(|(widest, ..)| gap > widest) {
            let latitude = 0.5 * (a.point.latitude() + b.point.latitude());
            best = Some((gap, id, latitude, a.point.longitude()));
        }
    }

    best.map(|(_, start, latitude, longitude)| {
        (
            start,
            PointOnSphere::from_lat_lon(&LatLonPoint::new_unchecked(latitude, longitude)),
        )
    })
}
