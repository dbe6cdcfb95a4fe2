use crate::{ConfigError, Direction};

/// Configuration shared by both layout variants.
///
/// Construct with [`LayoutOptions::scroll`] or [`LayoutOptions::paged`] and adjust with the
/// `with_*` builders. [`crate::WindowLayout::new`] validates the result.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    pub direction: Direction,
    /// Extra distance beyond the viewport (and before position zero) that stays mounted.
    pub margin: f64,
    /// Gesture scale applied while pushing past a pinned edge (`0..=1`).
    pub edge_grip: f64,
    /// Edge spring period, in milliseconds.
    pub spring_period: f64,
    /// Edge spring damping ratio (`1.0` is critical damping).
    pub spring_damping: f64,
    /// Speed (units per millisecond) above which the surface counts as flinging.
    ///
    /// Drives the `Other` edge state and the paged variant's velocity page switch.
    pub page_switch_speed: f64,
}

impl LayoutOptions {
    /// Defaults for continuous scrolling.
    pub fn scroll() -> Self {
        Self {
            direction: Direction::Y,
            margin: 1000.0,
            edge_grip: 0.2,
            spring_period: 300.0,
            spring_damping: 1.0,
            page_switch_speed: 1.0,
        }
    }

    /// Defaults for one-item-per-page carousels.
    pub fn paged() -> Self {
        Self {
            spring_period: 400.0,
            ..Self::scroll()
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_edge_grip(mut self, edge_grip: f64) -> Self {
        self.edge_grip = edge_grip;
        self
    }

    pub fn with_spring(mut self, period: f64, damping: f64) -> Self {
        self.spring_period = period;
        self.spring_damping = damping;
        self
    }

    pub fn with_page_switch_speed(mut self, speed: f64) -> Self {
        self.page_switch_speed = speed;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_non_negative("margin", self.margin)?;
        if !(0.0..=1.0).contains(&self.edge_grip) {
            return Err(ConfigError::InvalidEdgeGrip(self.edge_grip));
        }
        if !(self.spring_period.is_finite() && self.spring_period > 0.0) {
            return Err(ConfigError::InvalidSpringPeriod(self.spring_period));
        }
        ConfigError::check_non_negative("spring_damping", self.spring_damping)?;
        ConfigError::check_non_negative("page_switch_speed", self.page_switch_speed)?;
        Ok(())
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::scroll()
    }
}
