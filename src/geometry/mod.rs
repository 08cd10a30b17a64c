pub mod arc;
pub mod bounding;
pub mod point;
pub mod polygon;
pub mod polyline;

pub use arc::GreatCircleArc;
pub use bounding::BoundingSmallCircle;
pub use point::{LatLonPoint, PointOnSphere};
pub use polygon::PolygonOnSphere;
pub use polyline::PolylineOnSphere;
