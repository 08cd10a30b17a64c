use slotmap::SlotMap;

use crate::geometry::LatLonPoint;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in an intersection graph.
    pub struct VertexId;
}

/// Which of the graph's two vertex lists a vertex belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Geometry,
    Dateline,
}

/// One of the four edges of the dateline polygon.
///
/// Traversed in this order (clockwise when viewed from above the dateline):
/// up the front side, across the north pole, down the back side, and across
/// the south pole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatelineEdge {
    Front,
    North,
    Back,
    South,
}

impl DatelineEdge {
    /// Position along this edge, increasing in traversal order.
    fn key(self, point: &LatLonPoint) -> f64 {
        match self {
            DatelineEdge::Front => point.latitude(),
            DatelineEdge::North => -point.longitude(),
            DatelineEdge::Back => -point.latitude(),
            DatelineEdge::South => point.longitude(),
        }
    }
}

/// A vertex in the intersection graph.
#[derive(Debug, Clone)]
pub struct Vertex {
    pub point: LatLonPoint,
    /// `true` if this vertex is where the geometry meets the dateline.
    pub is_intersection: bool,
    /// On the geometry list: the geometry exits the dateline polygon here.
    /// On the dateline list: the dateline exits the geometry polygon here.
    pub exits_other_polygon: bool,
    /// Set once a polygon traversal has emitted this vertex.
    pub used_to_output: bool,
    /// The paired vertex on the other list (polygon graphs only).
    pub neighbour: Option<VertexId>,
    /// Edge of the dateline polygon, for vertices on the dateline list.
    pub dateline_edge: Option<DatelineEdge>,
    next: VertexId,
    prev: VertexId,
}

impl Vertex {
    fn new(point: LatLonPoint, id: VertexId) -> Self {
        Self {
            point,
            is_intersection: false,
            exits_other_polygon: false,
            used_to_output: false,
            neighbour: None,
            dateline_edge: None,
            next: id,
            prev: id,
        }
    }
}

/// The four corner vertices of the dateline polygon.
///
/// In a rectangular lat/lon projection these are the map corners:
///
/// ```text
///   NF -> NB
///   /\    |
///   |     \/
///   SF <- SB
///
///          dateline
///             |
///   <--- +180 | -180 --->
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DatelineCorners {
    pub south_front: VertexId,
    pub north_front: VertexId,
    pub north_back: VertexId,
    pub south_back: VertexId,
}

impl DatelineCorners {
    /// The corner where `edge` starts.
    #[must_use]
    pub fn start_of(&self, edge: DatelineEdge) -> VertexId {
        match edge {
            DatelineEdge::Front => self.south_front,
            DatelineEdge::North => self.north_front,
            DatelineEdge::Back => self.north_back,
            DatelineEdge::South => self.south_back,
        }
    }
}

/// A circular doubly-linked list threaded through the graph's arena.
#[derive(Debug, Clone, Copy, Default)]
struct VertexList {
    head: Option<VertexId>,
    len: usize,
}

/// Graph of a geometry and the dateline, cross-linked at their intersections.
///
/// The dateline is treated as an infinitesimally thin polygon covering the
/// whole globe so that ordinary polygon-polygon clipping applies. All vertices
/// live in a single arena dropped with the graph.
#[derive(Debug)]
pub struct IntersectionGraph {
    vertices: SlotMap<VertexId, Vertex>,
    geometry: VertexList,
    dateline: VertexList,
    corners: Option<DatelineCorners>,
    intersected_north_pole: bool,
    intersected_south_pole: bool,
}

impl IntersectionGraph {
    /// Creates an empty graph.
    ///
    /// Polygon graphs also get the four dateline corners; polyline graphs
    /// never touch the dateline list.
    #[must_use]
    pub fn new(is_polygon: bool, capacity: usize) -> Self {
        let mut graph = Self {
            vertices: SlotMap::with_capacity_and_key(capacity + 4),
            geometry: VertexList::default(),
            dateline: VertexList::default(),
            corners: None,
            intersected_north_pole: false,
            intersected_south_pole: false,
        };

        if is_polygon {
            let mut corner = |lat: f64, lon: f64| {
                graph.push_back(ListKind::Dateline, LatLonPoint::new_unchecked(lat, lon))
            };
            let corners = DatelineCorners {
                south_front: corner(-90.0, 180.0),
                north_front: corner(90.0, 180.0),
                north_back: corner(90.0, -180.0),
                south_back: corner(-90.0, -180.0),
            };
            graph.corners = Some(corners);
        }

        graph
    }

    #[must_use]
    pub fn is_polygon_graph(&self) -> bool {
        self.corners.is_some()
    }

    /// The dateline corners, present for polygon graphs only.
    #[must_use]
    pub fn corners(&self) -> Option<&DatelineCorners> {
        self.corners.as_ref()
    }

    /// Returns the vertex for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph, which means the graph
    /// has been corrupted.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        match self.vertices.get(id) {
            Some(vertex) => vertex,
            None => panic!("vertex {id:?} is not in the intersection graph"),
        }
    }

    /// Mutable counterpart of [`vertex`](Self::vertex).
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        match self.vertices.get_mut(id) {
            Some(vertex) => vertex,
            None => panic!("vertex {id:?} is not in the intersection graph"),
        }
    }

    #[must_use]
    pub fn next(&self, id: VertexId) -> VertexId {
        self.vertex(id).next
    }

    #[must_use]
    pub fn prev(&self, id: VertexId) -> VertexId {
        self.vertex(id).prev
    }

    /// First vertex of a list.
    #[must_use]
    pub fn head(&self, list: ListKind) -> Option<VertexId> {
        self.list(list).head
    }

    /// Number of vertices in a list.
    #[must_use]
    pub fn len(&self, list: ListKind) -> usize {
        self.list(list).len
    }

    /// Returns `true` if the geometry list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geometry.len == 0
    }

    /// Iterates a list once around, starting at its head.
    pub fn iter(&self, list: ListKind) -> impl Iterator<Item = VertexId> + '_ {
        let head = self.list(list).head;
        let len = self.list(list).len;
        std::iter::successors(head, move |&id| Some(self.next(id))).take(len)
    }

    /// Number of intersection vertices in a list.
    #[must_use]
    pub fn intersection_count(&self, list: ListKind) -> usize {
        self.iter(list)
            .filter(|&id| self.vertex(id).is_intersection)
            .count()
    }

    /// The geometry vertices as lat/lon points, in order.
    #[must_use]
    pub fn geometry_points(&self) -> Vec<LatLonPoint> {
        self.iter(ListKind::Geometry)
            .map(|id| self.vertex(id).point)
            .collect()
    }

    #[must_use]
    pub fn intersected_north_pole(&self) -> bool {
        self.intersected_north_pole
    }

    #[must_use]
    pub fn intersected_south_pole(&self) -> bool {
        self.intersected_south_pole
    }

    /// Records that the geometry touched or crossed the north pole.
    pub fn set_intersected_north_pole(&mut self) {
        self.intersected_north_pole = true;
    }

    /// Records that the geometry touched or crossed the south pole.
    pub fn set_intersected_south_pole(&mut self) {
        self.intersected_south_pole = true;
    }

    /// Adds a regular vertex that is *not* the result of meeting the dateline.
    pub fn add_vertex(&mut self, point: LatLonPoint) -> VertexId {
        self.push_back(ListKind::Geometry, point)
    }

    /// Adds an intersection on the front (+180) side of the dateline.
    pub fn add_intersection_vertex_on_front_dateline(
        &mut self,
        latitude: f64,
        exiting_dateline_polygon: bool,
    ) -> VertexId {
        self.add_intersection_vertex(
            LatLonPoint::new_unchecked(latitude, 180.0),
            DatelineEdge::Front,
            exiting_dateline_polygon,
        )
    }

    /// Adds an intersection on the back (-180) side of the dateline.
    pub fn add_intersection_vertex_on_back_dateline(
        &mut self,
        latitude: f64,
        exiting_dateline_polygon: bool,
    ) -> VertexId {
        self.add_intersection_vertex(
            LatLonPoint::new_unchecked(latitude, -180.0),
            DatelineEdge::Back,
            exiting_dateline_polygon,
        )
    }

    /// Adds an intersection at the north pole, approached along `longitude`.
    pub fn add_intersection_vertex_on_north_pole(
        &mut self,
        longitude: f64,
        exiting_dateline_polygon: bool,
    ) -> VertexId {
        self.intersected_north_pole = true;
        self.add_intersection_vertex(
            LatLonPoint::new_unchecked(90.0, longitude),
            DatelineEdge::North,
            exiting_dateline_polygon,
        )
    }

    /// Adds an intersection at the south pole, approached along `longitude`.
    pub fn add_intersection_vertex_on_south_pole(
        &mut self,
        longitude: f64,
        exiting_dateline_polygon: bool,
    ) -> VertexId {
        self.intersected_south_pole = true;
        self.add_intersection_vertex(
            LatLonPoint::new_unchecked(-90.0, longitude),
            DatelineEdge::South,
            exiting_dateline_polygon,
        )
    }

    fn add_intersection_vertex(
        &mut self,
        point: LatLonPoint,
        edge: DatelineEdge,
        exiting_dateline_polygon: bool,
    ) -> VertexId {
        let geometry_id = self.push_back(ListKind::Geometry, point);
        {
            let vertex = self.vertex_mut(geometry_id);
            vertex.is_intersection = true;
            vertex.exits_other_polygon = exiting_dateline_polygon;
        }

        if let Some(corners) = self.corners {
            let dateline_id = self.insert_on_dateline_edge(&corners, point, edge);
            self.link_intersection_vertices(geometry_id, dateline_id);
        }

        geometry_id
    }

    /// Inserts an intersection vertex on `edge`, keeping the edge's vertices
    /// sorted along the traversal direction.
    fn insert_on_dateline_edge(
        &mut self,
        corners: &DatelineCorners,
        point: LatLonPoint,
        edge: DatelineEdge,
    ) -> VertexId {
        let key = edge.key(&point);
        let mut after = corners.start_of(edge);
        loop {
            let next = self.next(after);
            let candidate = self.vertex(next);
            if !candidate.is_intersection || edge.key(&candidate.point) > key {
                break;
            }
            after = next;
        }

        let id = self.insert_after(ListKind::Dateline, after, point);
        let vertex = self.vertex_mut(id);
        vertex.is_intersection = true;
        vertex.dateline_edge = Some(edge);
        id
    }

    fn link_intersection_vertices(&mut self, a: VertexId, b: VertexId) {
        self.vertex_mut(a).neighbour = Some(b);
        self.vertex_mut(b).neighbour = Some(a);
    }

    fn list(&self, list: ListKind) -> &VertexList {
        match list {
            ListKind::Geometry => &self.geometry,
            ListKind::Dateline => &self.dateline,
        }
    }

    fn list_mut(&mut self, list: ListKind) -> &mut VertexList {
        match list {
            ListKind::Geometry => &mut self.geometry,
            ListKind::Dateline => &mut self.dateline,
        }
    }

    fn push_back(&mut self, list: ListKind, point: LatLonPoint) -> VertexId {
        match self.list(list).head {
            Some(head) => {
                let tail = self.prev(head);
                self.insert_after(list, tail, point)
            }
            None => {
                let id = self.vertices.insert_with_key(|id| Vertex::new(point, id));
                let list = self.list_mut(list);
                list.head = Some(id);
                list.len = 1;
                id
            }
        }
    }

    fn insert_after(&mut self, list: ListKind, after: VertexId, point: LatLonPoint) -> VertexId {
        let before = self.next(after);
        let id = self.vertices.insert_with_key(|id| {
            let mut vertex = Vertex::new(point, id);
            vertex.prev = after;
            vertex.next = before;
            vertex
        });
        self.vertex_mut(after).next = id;
        self.vertex_mut(before).prev = id;
        self.list_mut(list).len += 1;
        id
    }
}
