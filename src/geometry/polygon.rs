use crate::error::{GeometryError, Result};
use crate::math::sphere::{angle_between, arc_touches_point, arcs_cross};
use crate::math::{UnitVector3, Vector3, TOLERANCE};

use super::{GreatCircleArc, PointOnSphere};

/// Distance (radians) below which a ray is considered to graze a polygon vertex.
const RAY_GRAZE_TOLERANCE: f64 = 1e-10;

/// Directions used to tilt the reference point away from the anti-centroid
/// when the first ray is degenerate. Not axis-aligned.
const REFERENCE_TILTS: [[f64; 3]; 4] = [
    [0.267, 0.534, 0.802],
    [-0.713, 0.218, 0.667],
    [0.381, -0.874, 0.302],
    [0.577, 0.391, -0.717],
];

/// Fallback axis for building a detour when the ray endpoints are antipodal.
const DETOUR_AXIS: [f64; 3] = [0.571, 0.393, 0.721];

/// A closed sequence of great-circle arcs on the sphere.
///
/// Like the lat/lon polygons produced by dateline wrapping, the ring is
/// implicitly closed: the last vertex is *not* a copy of the first.
#[derive(Debug, Clone)]
pub struct PolygonOnSphere {
    points: Vec<PointOnSphere>,
}

impl PolygonOnSphere {
    /// Minimum number of vertices in a polygon.
    pub const MIN_POINTS: usize = 3;

    /// Creates a polygon from its vertices.
    ///
    /// # Errors
    ///
    /// - `GeometryError::InsufficientPoints` if fewer than 3 points are given
    /// - `GeometryError::AntipodalSegment` if two consecutive points (including
    ///   the closing pair) are antipodal
    pub fn new(points: Vec<PointOnSphere>) -> Result<Self> {
        let n = points.len();
        if n < Self::MIN_POINTS {
            return Err(GeometryError::InsufficientPoints {
                kind: "polygon",
                required: Self::MIN_POINTS,
                actual: n,
            }
            .into());
        }
        for i in 0..n {
            if points[i].is_antipodal_to(&points[(i + 1) % n]) {
                return Err(GeometryError::AntipodalSegment { index: i }.into());
            }
        }
        Ok(Self { points })
    }

    /// Returns the vertices in order (the ring is not explicitly closed).
    #[must_use]
    pub fn vertices(&self) -> &[PointOnSphere] {
        &self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a polygon has at least three vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the arcs of the ring, including the closing arc.
    pub fn arcs(&self) -> impl Iterator<Item = GreatCircleArc> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| GreatCircleArc::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Normalized sum of the vertices, or `None` when they cancel out.
    #[must_use]
    pub fn centroid(&self) -> Option<PointOnSphere> {
        let sum: Vector3 = self.points.iter().map(PointOnSphere::vector).sum();
        UnitVector3::try_new(sum, TOLERANCE).map(PointOnSphere::from_unit)
    }

    /// Tests whether `point` lies inside the polygon.
    ///
    /// The interior is the region *not* containing the antipode of the
    /// centroid. A ray is cast from `point` to that reference and polygon
    /// edge crossings are counted: odd = inside. If the ray grazes a polygon
    /// vertex the reference is tilted and the test retried.
    #[must_use]
    pub fn is_point_in_polygon(&self, point: &PointOnSphere) -> bool {
        let anti_centroid = self
            .centroid()
            .unwrap_or(self.points[0])
            .antipode()
            .vector();

        let references = std::iter::once(anti_centroid).chain(
            REFERENCE_TILTS
                .iter()
                .map(|t| (anti_centroid + Vector3::from(*t) * 0.01).normalize()),
        );

        let p = point.vector();
        let mut last = false;
        for reference in references {
            match self.ray_cast(&p, &reference) {
                RayCastResult::Clear(inside) => return inside,
                RayCastResult::Degenerate(inside) => last = inside,
            }
        }

        // Every ray grazed a vertex - very unlikely, use the last count.
        last
    }

    fn ray_cast(&self, p: &Vector3, reference: &Vector3) -> RayCastResult {
        if angle_between(p, reference) < RAY_GRAZE_TOLERANCE {
            return RayCastResult::Clear(false);
        }

        // Rays longer than a quarter turn go through a detour point so that
        // each leg is a well-defined (shorter than half-turn) arc.
        let legs: Vec<(Vector3, Vector3)> = if p.dot(reference) < 0.0 {
            let detour = UnitVector3::try_new(p.cross(reference), 1e-6)
                .or_else(|| UnitVector3::try_new(p.cross(&Vector3::from(DETOUR_AXIS)), TOLERANCE))
                .map_or_else(Vector3::x, UnitVector3::into_inner);
            vec![(*p, detour), (detour, *reference)]
        } else {
            vec![(*p, *reference)]
        };

        let mut crossings = 0u32;
        let mut degenerate = false;
        for (a, b) in &legs {
            if self
                .points
                .iter()
                .any(|v| arc_touches_point(a, b, &v.vector(), RAY_GRAZE_TOLERANCE))
            {
                degenerate = true;
            }
            for arc in self.arcs() {
                if arcs_cross(a, b, &arc.start().vector(), &arc.end().vector()) {
                    crossings += 1;
                }
            }
        }

        let inside = crossings % 2 == 1;
        if degenerate {
            RayCastResult::Degenerate(inside)
        } else {
            RayCastResult::Clear(inside)
        }
    }
}

enum RayCastResult {
    Clear(bool),
    Degenerate(bool),
}
