use super::{UnitVector3, Vector3, TOLERANCE};

/// Classification of a point relative to a plane through the sphere centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointPlaneClassification {
    /// Point is on the positive side (in the direction of the normal).
    Front,
    /// Point is on the negative side (opposite the normal).
    Back,
    /// Point lies within `thickness` of the plane.
    On,
}

/// Signed distance from a point to a plane through the origin.
/// Positive = on the normal side, negative = opposite.
#[must_use]
pub fn signed_distance_to_plane(point: &Vector3, normal: &UnitVector3) -> f64 {
    normal.dot(point)
}

/// Classifies a point relative to a "thick" plane through the origin.
#[must_use]
pub fn classify_point_plane(
    point: &Vector3,
    normal: &UnitVector3,
    thickness: f64,
) -> PointPlaneClassification {
    let dist = signed_distance_to_plane(point, normal);

    if dist > thickness {
        PointPlaneClassification::Front
    } else if dist < -thickness {
        PointPlaneClassification::Back
    } else {
        PointPlaneClassification::On
    }
}

/// Intersects two great-circle planes, given by their normals.
///
/// Returns one of the two antipodal intersection points, or `None` when the
/// planes coincide (normals parallel or anti-parallel, or either normal is
/// degenerate).
#[must_use]
pub fn great_circle_intersection(na: &Vector3, nb: &Vector3) -> Option<UnitVector3> {
    UnitVector3::try_new(na.cross(nb), TOLERANCE)
}

/// Angle in radians between two vectors.
///
/// Uses `atan2` of the cross and dot products, which stays accurate for
/// nearly coincident and nearly antipodal vectors.
#[must_use]
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    a.cross(b).norm().atan2(a.dot(b))
}

/// Returns `true` if great-circle arc `a→b` strictly crosses arc `c→d`.
///
/// Touching at an endpoint, or sharing a vertex, is not a crossing.
#[must_use]
pub fn arcs_cross(a: &Vector3, b: &Vector3, c: &Vector3, d: &Vector3) -> bool {
    let ab = a.cross(b);
    let acb = -ab.dot(c);
    let bda = ab.dot(d);
    if acb * bda <= 0.0 {
        return false;
    }

    let cd = c.cross(d);
    let cbd = -cd.dot(b);
    let dac = cd.dot(a);
    acb * cbd > 0.0 && acb * dac > 0.0
}

/// Returns `true` if the arc `a→b` passes through (or touches) `p`.
///
/// Used to detect degenerate rays that graze a polygon vertex.
#[must_use]
pub fn arc_touches_point(a: &Vector3, b: &Vector3, p: &Vector3, tolerance: f64) -> bool {
    let n = a.cross(b);
    let n_len = n.norm();
    if n_len < TOLERANCE {
        return angle_between(a, p) < tolerance;
    }
    if (n.dot(p) / n_len).abs() > tolerance {
        return false;
    }
    // Within the plane: on the arc when between the endpoints.
    a.cross(p).dot(&n) >= -tolerance && p.cross(b).dot(&n) >= -tolerance && (a + b).dot(p) > 0.0
}
