use crate::geometry::{GreatCircleArc, PointOnSphere};
use crate::math::sphere::great_circle_intersection;

use super::classify::{dateline_plane_normal, VertexClassification, VertexClassifier};
use super::config::WrapperConfig;

/// Where an arc crossed the dateline plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// Crossed the dateline arc away from the poles.
    Dateline,
    /// Passed within the pole radius of the north pole.
    NorthPole,
    /// Passed within the pole radius of the south pole.
    SouthPole,
}

/// Computes where a geometry arc crosses the dateline.
#[derive(Debug, Clone, Copy)]
pub struct IntersectionSolver {
    classifier: VertexClassifier,
}

impl IntersectionSolver {
    #[must_use]
    pub fn new(config: &WrapperConfig) -> Self {
        Self {
            classifier: VertexClassifier::new(config),
        }
    }

    /// Intersects `arc` with the dateline.
    ///
    /// Only arcs whose endpoints are strictly on opposite sides of the thick
    /// plane (one `Front`, one `Back`) are subdivided; any other pair of
    /// classifications returns `None` because the endpoint on the plane stands
    /// in for the crossing. Also returns `None` when the arc crosses the plane
    /// on the prime-meridian half rather than the dateline, or when the arc is
    /// too short to have a plane or its plane coincides with the dateline
    /// plane.
    #[must_use]
    pub fn intersect(
        &self,
        arc: &GreatCircleArc,
        start_classification: VertexClassification,
        end_classification: VertexClassification,
    ) -> Option<(PointOnSphere, IntersectionKind)> {
        match (start_classification.side(), end_classification.side()) {
            (Some(a), Some(b)) if a != b => {}
            _ => return None,
        }
        if arc.is_zero_length() {
            return None;
        }

        let direction = great_circle_intersection(arc.axis(), &dateline_plane_normal())?;

        // Of the two antipodal candidates, the one on the arc is closer to the
        // arc's midpoint.
        let midpoint = arc.start().vector() + arc.end().vector();
        let point = if direction.dot(&midpoint) >= 0.0 {
            PointOnSphere::from_unit(direction)
        } else {
            PointOnSphere::from_unit(-direction)
        };

        if let Some(pole) = self.classifier.pole_at(&point) {
            let kind = match pole {
                VertexClassification::NearSouthPole => IntersectionKind::SouthPole,
                _ => IntersectionKind::NorthPole,
            };
            return Some((point, kind));
        }

        (point.x() < 0.0).then_some((point, IntersectionKind::Dateline))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::geometry::LatLonPoint;

    fn pt(lat: f64, lon: f64) -> PointOnSphere {
        PointOnSphere::from_lat_lon(&LatLonPoint::new(lat, lon).unwrap())
    }

    fn solve(a: (f64, f64), b: (f64, f64)) -> Option<(PointOnSphere, IntersectionKind)> {
        let config = WrapperConfig::default();
        let classifier = VertexClassifier::new(&config);
        let (pa, pb) = (pt(a.0, a.1), pt(b.0, b.1));
        IntersectionSolver::new(&config).intersect(
            &GreatCircleArc::new(pa, pb),
            classifier.classify(&pa),
            classifier.classify(&pb),
        )
    }

    #[test]
    fn equator_arc_crosses_dateline_at_equator() {
        let (point, kind) = solve((0.0, 170.0), (0.0, -170.0)).unwrap();
        assert_eq!(kind, IntersectionKind::Dateline);
        let ll = LatLonPoint::from_point_on_sphere(&point);
        assert_abs_diff_eq!(ll.latitude(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(ll.longitude().abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn reversed_arc_finds_same_crossing() {
        let (forward, _) = solve((10.0, 175.0), (12.0, -175.0)).unwrap();
        let (backward, _) = solve((12.0, -175.0), (10.0, 175.0)).unwrap();
        assert_abs_diff_eq!(forward.z(), backward.z(), epsilon = 1e-12);
        assert!(forward.x() < 0.0);
    }

    #[test]
    fn prime_meridian_crossing_is_ignored() {
        assert!(solve((0.0, 10.0), (0.0, -10.0)).is_none());
    }

    #[test]
    fn same_side_endpoints_are_not_subdivided() {
        assert!(solve((0.0, 10.0), (0.0, 170.0)).is_none());
        assert!(solve((0.0, 180.0), (0.0, -170.0)).is_none());
    }

    #[test]
    fn zero_length_arc_has_no_crossing() {
        let p = pt(0.0, 179.0);
        let solver = IntersectionSolver::new(&WrapperConfig::default());
        let crossing = solver.intersect(
            &GreatCircleArc::new(p, p),
            VertexClassification::Front,
            VertexClassification::Back,
        );
        assert!(crossing.is_none());
    }

    #[test]
    fn arc_over_north_pole() {
        let (point, kind) = solve((89.0, 10.0), (89.0, -170.0)).unwrap();
        assert_eq!(kind, IntersectionKind::NorthPole);
        assert!(point.z() > 0.999_999);
    }

    #[test]
    fn arc_under_south_pole() {
        let (_, kind) = solve((-80.0, -30.0), (-70.0, 150.0)).unwrap();
        assert_eq!(kind, IntersectionKind::SouthPole);
    }
}
