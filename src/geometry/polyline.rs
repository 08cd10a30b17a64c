use crate::error::{GeometryError, Result};

use super::{GreatCircleArc, PointOnSphere};

/// An open sequence of great-circle arcs on the sphere.
#[derive(Debug, Clone)]
pub struct PolylineOnSphere {
    points: Vec<PointOnSphere>,
}

impl PolylineOnSphere {
    /// Minimum number of vertices in a polyline.
    pub const MIN_POINTS: usize = 2;

    /// Creates a polyline from its vertices.
    ///
    /// # Errors
    ///
    /// - `GeometryError::InsufficientPoints` if fewer than 2 points are given
    /// - `GeometryError::AntipodalSegment` if two consecutive points are antipodal
    pub fn new(points: Vec<PointOnSphere>) -> Result<Self> {
        if points.len() < Self::MIN_POINTS {
            return Err(GeometryError::InsufficientPoints {
                kind: "polyline",
                required: Self::MIN_POINTS,
                actual: points.len(),
            }
            .into());
        }
        if let Some(index) = points
            .windows(2)
            .position(|pair| pair[0].is_antipodal_to(&pair[1]))
        {
            return Err(GeometryError::AntipodalSegment { index }.into());
        }
        Ok(Self { points })
    }

    /// Returns the vertices in order.
    #[must_use]
    pub fn vertices(&self) -> &[PointOnSphere] {
        &self.points
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a polyline has at least two vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Iterates the arcs between consecutive vertices.
    pub fn arcs(&self) -> impl Iterator<Item = GreatCircleArc> + '_ {
        self.points
            .windows(2)
            .map(|pair| GreatCircleArc::new(pair[0], pair[1]))
    }
}
