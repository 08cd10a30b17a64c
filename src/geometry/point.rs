use crate::error::{GeometryError, Result};
use crate::math::{UnitVector3, Vector3, TOLERANCE};

/// A point on the unit sphere.
///
/// Immutable once constructed; the underlying vector is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointOnSphere {
    position: UnitVector3,
}

impl PointOnSphere {
    /// Creates a point from cartesian coordinates, normalizing onto the sphere.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroVector` if the vector has (near) zero length.
    pub fn from_xyz(x: f64, y: f64, z: f64) -> Result<Self> {
        let position = UnitVector3::try_new(Vector3::new(x, y, z), TOLERANCE)
            .ok_or(GeometryError::ZeroVector)?;
        Ok(Self { position })
    }

    /// Creates a point from an already normalized vector.
    #[must_use]
    pub fn from_unit(position: UnitVector3) -> Self {
        Self { position }
    }

    /// Creates a point from a latitude/longitude pair.
    #[must_use]
    pub fn from_lat_lon(lat_lon: &LatLonPoint) -> Self {
        let lat = lat_lon.latitude().to_radians();
        let lon = lat_lon.longitude().to_radians();
        let (sin_lat, cos_lat) = lat.sin_cos();
        let (sin_lon, cos_lon) = lon.sin_cos();
        Self {
            position: UnitVector3::new_normalize(Vector3::new(
                cos_lat * cos_lon,
                cos_lat * sin_lon,
                sin_lat,
            )),
        }
    }

    /// The north pole `(0, 0, 1)`.
    #[must_use]
    pub fn north_pole() -> Self {
        Self {
            position: Vector3::z_axis(),
        }
    }

    /// The south pole `(0, 0, -1)`.
    #[must_use]
    pub fn south_pole() -> Self {
        Self {
            position: -Vector3::z_axis(),
        }
    }

    /// Returns the unit vector of this point by value.
    #[must_use]
    pub fn vector(&self) -> Vector3 {
        self.position.into_inner()
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.position.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.position.y
    }

    #[must_use]
    pub fn z(&self) -> f64 {
        self.position.z
    }

    /// Dot product of the two unit vectors (cosine of the angle between them).
    #[must_use]
    pub fn dot(&self, other: &Self) -> f64 {
        self.position.dot(&*other.position)
    }

    /// Returns the diametrically opposite point.
    #[must_use]
    pub fn antipode(&self) -> Self {
        Self {
            position: -self.position,
        }
    }

    /// Returns `true` if `other` is (within tolerance) antipodal to this point.
    #[must_use]
    pub fn is_antipodal_to(&self, other: &Self) -> bool {
        (self.vector() + other.vector()).norm() < TOLERANCE
    }
}

/// A latitude/longitude pair in degrees.
///
/// Produced as output of dateline wrapping. Conversion from a sphere point
/// always yields a longitude in `(-180, 180]`. Only the dateline wrapper emits
/// `-180`, on vertices it places on the back side of the dateline seam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLonPoint {
    latitude: f64,
    longitude: f64,
}

impl LatLonPoint {
    /// Creates a lat/lon point.
    ///
    /// # Errors
    ///
    /// Returns an error if the latitude is outside `[-90, 90]` or the longitude
    /// is outside `[-360, 360]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryError::LatitudeOutOfRange(latitude).into());
        }
        if !(-360.0..=360.0).contains(&longitude) {
            return Err(GeometryError::LongitudeOutOfRange(longitude).into());
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Creates a lat/lon point from values already known to be in range.
    pub(crate) fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        debug_assert!((-90.0..=90.0).contains(&latitude));
        debug_assert!((-180.0..=180.0).contains(&longitude));
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts a point on the sphere, normalizing the longitude to `(-180, 180]`.
    ///
    /// The poles map to longitude zero.
    #[must_use]
    pub fn from_point_on_sphere(point: &PointOnSphere) -> Self {
        let latitude = point.z().clamp(-1.0, 1.0).asin().to_degrees().clamp(-90.0, 90.0);
        let mut longitude = point.y().atan2(point.x()).to_degrees();
        if longitude <= -180.0 {
            longitude += 360.0;
        }
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn ll(lat: f64, lon: f64) -> LatLonPoint {
        LatLonPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn from_xyz_normalizes() {
        let p = PointOnSphere::from_xyz(0.0, 3.0, 4.0).unwrap();
        assert_abs_diff_eq!(p.vector().norm(), 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(p.y(), 0.6, epsilon = 1e-15);
    }

    #[test]
    fn from_xyz_rejects_zero_vector() {
        assert!(PointOnSphere::from_xyz(0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn lat_lon_rejects_out_of_range() {
        assert!(LatLonPoint::new(90.5, 0.0).is_err());
        assert!(LatLonPoint::new(0.0, 361.0).is_err());
        assert!(LatLonPoint::new(-90.0, -360.0).is_ok());
    }

    #[test]
    fn lat_lon_conversion_preserves_coordinates() {
        for &(lat, lon) in &[(10.0, 20.0), (-45.0, 170.0), (0.0, -120.0), (89.0, -1.0)] {
            let back =
                LatLonPoint::from_point_on_sphere(&PointOnSphere::from_lat_lon(&ll(lat, lon)));
            assert_abs_diff_eq!(back.latitude(), lat, epsilon = 1e-9);
            assert_abs_diff_eq!(back.longitude(), lon, epsilon = 1e-9);
        }
    }

    #[test]
    fn longitude_wraps_into_half_open_range() {
        let p = PointOnSphere::from_lat_lon(&ll(0.0, 190.0));
        assert_abs_diff_eq!(
            LatLonPoint::from_point_on_sphere(&p).longitude(),
            -170.0,
            epsilon = 1e-9
        );

        // atan2(-0.0, -1.0) is -180; it must come back as +180.
        let p = PointOnSphere::from_xyz(-1.0, -0.0, 0.0).unwrap();
        assert_abs_diff_eq!(LatLonPoint::from_point_on_sphere(&p).longitude(), 180.0);
    }

    #[test]
    fn poles_have_extreme_latitudes() {
        let n = LatLonPoint::from_point_on_sphere(&PointOnSphere::north_pole());
        let s = LatLonPoint::from_point_on_sphere(&PointOnSphere::south_pole());
        assert_abs_diff_eq!(n.latitude(), 90.0);
        assert_abs_diff_eq!(s.latitude(), -90.0);
    }

    #[test]
    fn antipodal_points() {
        let p = PointOnSphere::from_lat_lon(&ll(30.0, 40.0));
        assert!(p.is_antipodal_to(&p.antipode()));
        assert!(!p.is_antipodal_to(&p));
        assert_abs_diff_eq!(p.dot(&p.antipode()), -1.0, epsilon = 1e-15);
    }
}
