use crate::geometry::{LatLonPoint, PointOnSphere};
use crate::math::sphere::{classify_point_plane, PointPlaneClassification};
use crate::math::{UnitVector3, Vector3};

use super::config::WrapperConfig;

/// Normal of the plane containing the dateline arc (and the prime meridian).
///
/// Points with positive longitudes below 180 lie in front of it.
pub(crate) fn dateline_plane_normal() -> UnitVector3 {
    Vector3::y_axis()
}

/// Which side of the dateline plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Longitudes in `(0, 180)`.
    Front,
    /// Longitudes in `(-180, 0)`.
    Back,
}

impl Side {
    /// Longitude at which this side meets the dateline.
    #[must_use]
    pub fn dateline_longitude(self) -> f64 {
        match self {
            Side::Front => 180.0,
            Side::Back => -180.0,
        }
    }
}

/// Classification of a vertex relative to the dateline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexClassification {
    /// In front of the thick dateline plane.
    Front,
    /// Behind the thick dateline plane.
    Back,
    /// On the thick plane but off the dateline arc (longitude near zero).
    OnPlaneOffArc,
    /// On the thick plane and on the dateline arc (longitude near +/-180).
    OnDatelineArc,
    /// Within the pole radius of the north pole.
    NearNorthPole,
    /// Within the pole radius of the south pole.
    NearSouthPole,
}

impl VertexClassification {
    /// The side for `Front`/`Back`, `None` for anything on the plane.
    #[must_use]
    pub fn side(self) -> Option<Side> {
        match self {
            Self::Front => Some(Side::Front),
            Self::Back => Some(Side::Back),
            Self::OnPlaneOffArc
            | Self::OnDatelineArc
            | Self::NearNorthPole
            | Self::NearSouthPole => None,
        }
    }

    /// Returns `true` for vertices touching the dateline arc or a pole.
    #[must_use]
    pub fn touches_dateline(self) -> bool {
        match self {
            Self::OnDatelineArc | Self::NearNorthPole | Self::NearSouthPole => true,
            Self::Front | Self::Back | Self::OnPlaneOffArc => false,
        }
    }
}

/// A geometry vertex together with its classification and lat/lon form.
#[derive(Debug, Clone, Copy)]
pub struct ClassifiedVertex {
    pub point: PointOnSphere,
    pub lat_lon: LatLonPoint,
    pub classification: VertexClassification,
}

/// Classifies points against the thick dateline plane and the thick poles.
#[derive(Debug, Clone, Copy)]
pub struct VertexClassifier {
    dateline_thickness: f64,
    pole_radius: f64,
}

impl VertexClassifier {
    #[must_use]
    pub fn new(config: &WrapperConfig) -> Self {
        Self {
            dateline_thickness: config.dateline_thickness,
            pole_radius: config.pole_radius,
        }
    }

    /// Classifies a single point.
    #[must_use]
    pub fn classify(&self, point: &PointOnSphere) -> VertexClassification {
        let normal = dateline_plane_normal();
        match classify_point_plane(&point.vector(), &normal, self.dateline_thickness) {
            PointPlaneClassification::Front => VertexClassification::Front,
            PointPlaneClassification::Back => VertexClassification::Back,
            PointPlaneClassification::On => {
                if let Some(pole) = self.pole_at(point) {
                    return pole;
                }
                // The great circle through both poles with normal along x
                // bounds the dateline half of the plane.
                if point.x() < 0.0 {
                    VertexClassification::OnDatelineArc
                } else {
                    VertexClassification::OnPlaneOffArc
                }
            }
        }
    }

    /// Returns the pole classification if `point` is within the pole radius.
    #[must_use]
    pub fn pole_at(&self, point: &PointOnSphere) -> Option<VertexClassification> {
        if point.x().hypot(point.y()) > self.pole_radius {
            return None;
        }
        Some(if point.z() > 0.0 {
            VertexClassification::NearNorthPole
        } else {
            VertexClassification::NearSouthPole
        })
    }

    /// Classifies every point, keeping the lat/lon form alongside.
    pub fn classify_all<'a>(
        &'a self,
        points: &'a [PointOnSphere],
    ) -> impl Iterator<Item = ClassifiedVertex> + 'a {
        points.iter().map(|point| ClassifiedVertex {
            point: *point,
            lat_lon: LatLonPoint::from_point_on_sphere(point),
            classification: self.classify(point),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> PointOnSphere {
        PointOnSphere::from_lat_lon(&LatLonPoint::new(lat, lon).unwrap())
    }

    fn classifier() -> VertexClassifier {
        VertexClassifier::new(&WrapperConfig::default())
    }

    #[test]
    fn positive_longitudes_are_in_front() {
        assert_eq!(classifier().classify(&pt(0.0, 90.0)), VertexClassification::Front);
        assert_eq!(classifier().classify(&pt(-30.0, 179.9)), VertexClassification::Front);
    }

    #[test]
    fn negative_longitudes_are_behind() {
        assert_eq!(classifier().classify(&pt(0.0, -90.0)), VertexClassification::Back);
        assert_eq!(classifier().classify(&pt(45.0, -179.9)), VertexClassification::Back);
    }

    #[test]
    fn dateline_points_are_on_arc() {
        assert_eq!(classifier().classify(&pt(0.0, 180.0)), VertexClassification::OnDatelineArc);
        assert_eq!(classifier().classify(&pt(60.0, -180.0)), VertexClassification::OnDatelineArc);
    }

    #[test]
    fn prime_meridian_points_are_off_arc() {
        assert_eq!(classifier().classify(&pt(0.0, 0.0)), VertexClassification::OnPlaneOffArc);
        assert_eq!(classifier().classify(&pt(-60.0, 0.0)), VertexClassification::OnPlaneOffArc);
    }

    #[test]
    fn poles_are_classified_before_arc_test() {
        assert_eq!(
            classifier().classify(&PointOnSphere::north_pole()),
            VertexClassification::NearNorthPole
        );
        assert_eq!(
            classifier().classify(&PointOnSphere::south_pole()),
            VertexClassification::NearSouthPole
        );
    }

    #[test]
    fn thickness_comes_from_config() {
        let near = pt(0.0, 179.99);
        assert_eq!(classifier().classify(&near), VertexClassification::Front);

        let thick = VertexClassifier::new(&WrapperConfig::default().with_dateline_thickness(5e-4));
        assert_eq!(thick.classify(&near), VertexClassification::OnDatelineArc);
    }

    #[test]
    fn touching_and_sides() {
        assert!(VertexClassification::OnDatelineArc.touches_dateline());
        assert!(VertexClassification::NearSouthPole.touches_dateline());
        assert!(!VertexClassification::OnPlaneOffArc.touches_dateline());
        assert_eq!(VertexClassification::Back.side(), Some(Side::Back));
        assert_eq!(VertexClassification::OnDatelineArc.side(), None);
    }
}
