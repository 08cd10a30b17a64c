use crate::error::{ConfigError, Result};

/// Default half-width of the "thick" dateline plane, in unit-sphere distance.
pub const DEFAULT_DATELINE_THICKNESS: f64 = 1e-9;

/// Default radius of the "thick" poles, in unit-sphere distance from the
/// polar axis (roughly radians of colatitude).
pub const DEFAULT_POLE_RADIUS: f64 = 1e-9;

/// Tolerances larger than this would swallow real geometry.
const MAX_TOLERANCE: f64 = 1e-3;

/// Numerical tolerances used when classifying geometry against the dateline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapperConfig {
    /// Points closer than this to the dateline plane are "on" the plane.
    pub dateline_thickness: f64,
    /// Points closer than this to the polar axis are "on" a pole.
    pub pole_radius: f64,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            dateline_thickness: DEFAULT_DATELINE_THICKNESS,
            pole_radius: DEFAULT_POLE_RADIUS,
        }
    }
}

impl WrapperConfig {
    /// Sets the dateline plane thickness.
    #[must_use]
    pub fn with_dateline_thickness(mut self, dateline_thickness: f64) -> Self {
        self.dateline_thickness = dateline_thickness;
        self
    }

    /// Sets the pole radius.
    #[must_use]
    pub fn with_pole_radius(mut self, pole_radius: f64) -> Self {
        self.pole_radius = pole_radius;
        self
    }

    /// Checks that every tolerance is finite, non-negative and small.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidTolerance` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("dateline_thickness", self.dateline_thickness),
            ("pole_radius", self.pole_radius),
        ] {
            if !value.is_finite() || value < 0.0 || value >= MAX_TOLERANCE {
                return Err(ConfigError::InvalidTolerance {
                    name,
                    value,
                    max: MAX_TOLERANCE,
                }
                .into());
            }
        }
        Ok(())
    }
}
