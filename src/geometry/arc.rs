use crate::math::sphere::arcs_cross;
use crate::math::{Vector3, TOLERANCE};

use super::PointOnSphere;

/// A great-circle arc between two points on the sphere.
///
/// The arc is the shorter of the two great-circle paths between its
/// endpoints. Arcs are derived on the fly from consecutive geometry vertices.
#[derive(Debug, Clone, Copy)]
pub struct GreatCircleArc {
    start: PointOnSphere,
    end: PointOnSphere,
    axis: Vector3,
}

impl GreatCircleArc {
    /// Creates an arc from `start` to `end`.
    #[must_use]
    pub fn new(start: PointOnSphere, end: PointOnSphere) -> Self {
        let axis = start.vector().cross(&end.vector());
        Self { start, end, axis }
    }

    #[must_use]
    pub fn start(&self) -> &PointOnSphere {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> &PointOnSphere {
        &self.end
    }

    /// The (unnormalized) rotation axis `start × end`.
    #[must_use]
    pub fn axis(&self) -> &Vector3 {
        &self.axis
    }

    /// Returns `true` if the endpoints coincide (or are antipodal), so no
    /// unique great circle passes through them.
    #[must_use]
    pub fn is_zero_length(&self) -> bool {
        self.axis.norm() < TOLERANCE
    }

    /// Returns `true` if this arc strictly crosses `other`.
    #[must_use]
    pub fn crosses(&self, other: &Self) -> bool {
        arcs_cross(
            &self.start.vector(),
            &self.end.vector(),
            &other.start.vector(),
            &other.end.vector(),
        )
    }
}
