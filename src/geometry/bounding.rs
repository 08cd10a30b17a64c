use std::f64::consts::PI;

use crate::error::{GeometryError, Result};
use crate::math::sphere::angle_between;
use crate::math::{UnitVector3, Vector3, TOLERANCE};

use super::PointOnSphere;

/// A spherical cap bounding some geometry: a centre and an angular radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSmallCircle {
    centre: PointOnSphere,
    angular_radius: f64,
    cos_radius: f64,
}

impl BoundingSmallCircle {
    /// Creates a small circle from its centre and angular radius (radians).
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::InvalidRadius` if the radius is not in `[0, pi]`.
    pub fn new(centre: PointOnSphere, angular_radius: f64) -> Result<Self> {
        if !(0.0..=PI).contains(&angular_radius) {
            return Err(GeometryError::InvalidRadius(angular_radius).into());
        }
        Ok(Self {
            centre,
            angular_radius,
            cos_radius: angular_radius.cos(),
        })
    }

    /// Builds a small circle bounding all `points`, centred on their
    /// normalized sum.
    ///
    /// Returns `None` for an empty iterator. If the points cancel out the
    /// circle covers the whole sphere.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a PointOnSphere>) -> Option<Self> {
        let points: Vec<&PointOnSphere> = points.into_iter().collect();
        let first = **points.first()?;

        let sum: Vector3 = points.iter().map(|p| p.vector()).sum();
        let Some(centre) = UnitVector3::try_new(sum, TOLERANCE).map(PointOnSphere::from_unit) else {
            return Some(Self {
                centre: first,
                angular_radius: PI,
                cos_radius: -1.0,
            });
        };

        let angular_radius = points
            .iter()
            .map(|p| angle_between(&centre.vector(), &p.vector()))
            .fold(0.0_f64, f64::max)
            .min(PI);

        Some(Self {
            centre,
            angular_radius,
            cos_radius: angular_radius.cos(),
        })
    }

    #[must_use]
    pub fn centre(&self) -> &PointOnSphere {
        &self.centre
    }

    /// Angular radius in radians.
    #[must_use]
    pub fn angular_radius(&self) -> f64 {
        self.angular_radius
    }

    /// Cosine of the angular radius.
    #[must_use]
    pub fn cos_radius(&self) -> f64 {
        self.cos_radius
    }

    /// Returns `true` if `point` lies inside or on the circle.
    #[must_use]
    pub fn contains(&self, point: &PointOnSphere) -> bool {
        self.centre.dot(point) >= self.cos_radius - TOLERANCE
    }

    /// Angular distance (radians) from the centre to the nearest point of
    /// the dateline arc, the half great circle at longitude 180 joining the
    /// poles.
    #[must_use]
    pub fn angular_distance_to_dateline(&self) -> f64 {
        let (x, y, z) = (self.centre.x(), self.centre.y(), self.centre.z());
        if x <= 0.0 {
            // Nearest point is on the arc's own meridian.
            y.abs().atan2(x.hypot(z))
        } else {
            // Nearest point is whichever pole is closer.
            x.hypot(y).atan2(z.abs())
        }
    }
}
