use tracing::warn;

use crate::geometry::LatLonPoint;

use super::graph::{IntersectionGraph, ListKind, VertexId};

/// Splits a polyline graph at its intersections.
///
/// Each exit vertex ends the current piece and the entry vertex paired with
/// it starts the next one. The dateline list is never visited.
#[must_use]
pub fn generate_polylines(graph: &IntersectionGraph) -> Vec<Vec<LatLonPoint>> {
    let mut pieces = Vec::new();
    let mut current = Vec::new();

    for id in graph.iter(ListKind::Geometry) {
        let vertex = graph.vertex(id);
        current.push(vertex.point);
        if vertex.is_intersection && vertex.exits_other_polygon {
            pieces.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces.retain(|piece| piece.len() >= 2);
    pieces
}

/// Emits the output polygons of a tagged polygon graph.
///
/// Each polygon starts at an unused entry vertex on the geometry list,
/// follows the geometry to its next exit, then follows the dateline list
/// (backwards where the dateline exits the geometry, forwards otherwise) to
/// the next intersection, and switches back. It closes on returning to the
/// start vertex.
///
/// # Panics
///
/// Panics if an intersection has no neighbour or a traversal fails to close,
/// both of which mean the graph is corrupt.
#[must_use]
pub fn generate_polygons(graph: &mut IntersectionGraph) -> Vec<Vec<LatLonPoint>> {
    let mut polygons = Vec::new();
    // Each vertex is visited at most once per polygon.
    let max_steps = graph.len(ListKind::Geometry) + graph.len(ListKind::Dateline) + 1;

    while let Some(start) = next_unused_entry(graph) {
        let mut polygon = Vec::new();
        let mut current = start;
        let mut steps = 0;

        loop {
            // Geometry list, from an entry up to and including the next exit.
            graph.vertex_mut(current).used_to_output = true;
            polygon.push(graph.vertex(current).point);
            loop {
                current = graph.next(current);
                steps += 1;
                let vertex = graph.vertex(current);
                polygon.push(vertex.point);
                if vertex.is_intersection {
                    break;
                }
            }
            graph.vertex_mut(current).used_to_output = true;

            // Dateline list, up to the next intersection.
            current = neighbour(graph, current);
            let backwards = graph.vertex(current).exits_other_polygon;
            loop {
                current = if backwards {
                    graph.prev(current)
                } else {
                    graph.next(current)
                };
                steps += 1;
                let vertex = graph.vertex(current);
                if vertex.is_intersection {
                    break;
                }
                polygon.push(vertex.point);
            }

            current = neighbour(graph, current);
            assert!(
                steps <= max_steps,
                "polygon traversal did not close after {steps} steps"
            );
            if current == start {
                break;
            }
            if graph.vertex(current).exits_other_polygon {
                warn!("polygon traversal switched back onto an exiting vertex");
            }
        }

        polygons.push(polygon);
    }

    polygons
}

fn next_unused_entry(graph: &IntersectionGraph) -> Option<VertexId> {
    graph.iter(ListKind::Geometry).find(|&id| {
        let vertex = graph.vertex(id);
        vertex.is_intersection && !vertex.exits_other_polygon && !vertex.used_to_output
    })
}

fn neighbour(graph: &IntersectionGraph, id: VertexId) -> VertexId {
    match graph.vertex(id).neighbour {
        Some(neighbour) => neighbour,
        None => panic!("intersection vertex {id:?} has no neighbour"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ll(lat: f64, lon: f64) -> LatLonPoint {
        LatLonPoint::new(lat, lon).unwrap()
    }

    fn coords(piece: &[LatLonPoint]) -> Vec<(f64, f64)> {
        piece.iter().map(|p| (p.latitude(), p.longitude())).collect()
    }

    // ── polylines ──

    #[test]
    fn polyline_splits_at_each_crossing() {
        let mut graph = IntersectionGraph::new(false, 6);
        graph.add_vertex(ll(0.0, 170.0));
        graph.add_intersection_vertex_on_front_dateline(0.0, true);
        graph.add_intersection_vertex_on_back_dateline(0.0, false);
        graph.add_vertex(ll(0.0, -170.0));

        let pieces = generate_polylines(&graph);
        assert_eq!(pieces.len(), 2);
        assert_eq!(coords(&pieces[0]), vec![(0.0, 170.0), (0.0, 180.0)]);
        assert_eq!(coords(&pieces[1]), vec![(0.0, -180.0), (0.0, -170.0)]);
    }

    #[test]
    fn polyline_without_crossings_is_one_piece() {
        let mut graph = IntersectionGraph::new(false, 3);
        graph.add_vertex(ll(0.0, 10.0));
        graph.add_vertex(ll(5.0, 20.0));
        assert_eq!(generate_polylines(&graph).len(), 1);
    }

    // ── polygons ──

    /// The straddling square's graph: `(front exit, front entry, back exit,
    /// back entry)` geometry vertices at latitudes 10 and -10.
    fn square_graph() -> (IntersectionGraph, [VertexId; 4]) {
        let mut graph = IntersectionGraph::new(true, 8);
        graph.add_vertex(ll(10.0, 175.0));
        let front_exit = graph.add_intersection_vertex_on_front_dateline(10.0, true);
        let back_entry = graph.add_intersection_vertex_on_back_dateline(10.0, false);
        graph.add_vertex(ll(10.0, -175.0));
        graph.add_vertex(ll(-10.0, -175.0));
        let back_exit = graph.add_intersection_vertex_on_back_dateline(-10.0, true);
        let front_entry = graph.add_intersection_vertex_on_front_dateline(-10.0, false);
        graph.add_vertex(ll(-10.0, 175.0));
        (graph, [front_exit, front_entry, back_exit, back_entry])
    }

    fn dateline_twin(graph: &IntersectionGraph, id: VertexId) -> VertexId {
        graph.vertex(id).neighbour.unwrap()
    }

    #[test]
    fn straddling_square_becomes_two_polygons() {
        let (mut graph, _) = square_graph();

        // Tags as produced for a square that excludes the south pole.
        let ids: Vec<_> = graph
            .iter(ListKind::Dateline)
            .filter(|&id| graph.vertex(id).is_intersection)
            .collect();
        for (id, exits) in ids.into_iter().zip([false, true, false, true]) {
            graph.vertex_mut(id).exits_other_polygon = exits;
        }

        let polygons = generate_polygons(&mut graph);
        assert_eq!(polygons.len(), 2);
        assert_eq!(
            coords(&polygons[0]),
            vec![(10.0, -180.0), (10.0, -175.0), (-10.0, -175.0), (-10.0, -180.0)]
        );
        assert_eq!(
            coords(&polygons[1]),
            vec![(-10.0, 180.0), (-10.0, 175.0), (10.0, 175.0), (10.0, 180.0)]
        );
    }

    #[test]
    #[should_panic(expected = "has no neighbour")]
    fn missing_neighbour_is_fatal() {
        let (mut graph, [front_exit, ..]) = square_graph();
        graph.vertex_mut(front_exit).neighbour = None;

        let _ = generate_polygons(&mut graph);
    }

    #[test]
    #[should_panic(expected = "has no neighbour")]
    fn polyline_graph_cannot_form_polygons() {
        let mut graph = IntersectionGraph::new(false, 4);
        graph.add_vertex(ll(0.0, 170.0));
        graph.add_intersection_vertex_on_front_dateline(0.0, true);
        graph.add_intersection_vertex_on_back_dateline(0.0, false);
        graph.add_vertex(ll(0.0, -170.0));

        let _ = generate_polygons(&mut graph);
    }

    #[test]
    #[should_panic(expected = "polygon traversal did not close")]
    fn inconsistent_tags_are_fatal() {
        let (mut graph, [front_exit, _, back_exit, _]) = square_graph();
        // Leaving the back exit forwards reaches the front entry, and leaving
        // the front exit backwards returns to it again: a cycle that never
        // revisits the back entry the walk started from.
        let back_twin = dateline_twin(&graph, back_exit);
        let front_twin = dateline_twin(&graph, front_exit);
        graph.vertex_mut(back_twin).exits_other_polygon = false;
        graph.vertex_mut(front_twin).exits_other_polygon = true;

        let _ = generate_polygons(&mut graph);
    }

    #[test]
    fn polar_cap_picks_up_dateline_corners() {
        let mut graph = IntersectionGraph::new(true, 5);
        graph.add_vertex(ll(-60.0, 120.0));
        graph.add_intersection_vertex_on_front_dateline(-70.0, true);
        graph.add_intersection_vertex_on_back_dateline(-70.0, false);
        graph.add_vertex(ll(-60.0, -120.0));
        graph.add_vertex(ll(-60.0, 0.0));

        // The south pole is inside the cap: front crossing first, tagged inside.
        let ids: Vec<_> = graph
            .iter(ListKind::Dateline)
            .filter(|&id| graph.vertex(id).is_intersection)
            .collect();
        graph.vertex_mut(ids[0]).exits_other_polygon = true;
        graph.vertex_mut(ids[1]).exits_other_polygon = false;

        let polygons = generate_polygons(&mut graph);
        assert_eq!(polygons.len(), 1);
        assert_eq!(
            coords(&polygons[0]),
            vec![
                (-70.0, -180.0),
                (-60.0, -120.0),
                (-60.0, 0.0),
                (-60.0, 120.0),
                (-70.0, 180.0),
                (-90.0, 180.0),
                (-90.0, -180.0),
            ]
        );
        assert!(graph
            .iter(ListKind::Geometry)
            .filter(|&id| graph.vertex(id).is_intersection)
            .all(|id| graph.vertex(id).used_to_output));
    }
}
