pub mod dateline;
pub mod error;
pub mod geometry;
pub mod math;

pub use dateline::{DateLineWrapper, LatLonPolygon, LatLonPolyline, Wrappable, WrapperConfig};
pub use error::{DatelineError, Result};
pub use geometry::{
    BoundingSmallCircle, LatLonPoint, PointOnSphere, PolygonOnSphere, PolylineOnSphere,
};
