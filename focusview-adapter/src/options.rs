use focusview::{ConfigError, LayoutOptions};

/// Configuration for a [`crate::ScrollCoordinator`].
///
/// Coefficients are per millisecond. `edge_drag` / `edge_friction` replace `drag` /
/// `friction` while the surface coasts against a pinned edge, and are restored when the next
/// gesture starts.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScrollOptions {
    pub layout: LayoutOptions,
    /// Linear drag strength.
    pub friction: f64,
    /// Quadratic drag strength.
    pub drag: f64,
    pub edge_friction: f64,
    pub edge_drag: f64,
    /// Maximum speed a gesture can hand to the simulation.
    pub speed_limit: f64,
    /// Multiplier for gesture deltas and velocities. Pushing into a pinned edge uses the
    /// layout's edge grip instead.
    pub scale: f64,
}

impl ScrollOptions {
    pub fn new(layout: LayoutOptions) -> Self {
        Self {
            layout,
            friction: 0.005,
            drag: 0.0001,
            edge_friction: 0.05,
            edge_drag: 0.01,
            speed_limit: 5.0,
            scale: 1.0,
        }
    }

    pub fn scroll() -> Self {
        Self::new(LayoutOptions::scroll())
    }

    pub fn paged() -> Self {
        Self::new(LayoutOptions::paged())
    }

    pub fn with_layout(mut self, layout: LayoutOptions) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_edge_brake(mut self, edge_friction: f64, edge_drag: f64) -> Self {
        self.edge_friction = edge_friction;
        self.edge_drag = edge_drag;
        self
    }

    pub fn with_speed_limit(mut self, speed_limit: f64) -> Self {
        self.speed_limit = speed_limit;
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Largest per-sample delta accepted from slip input.
    pub fn delta_limit(&self) -> f64 {
        self.speed_limit * 16.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        for (name, value) in [
            ("friction", self.friction),
            ("drag", self.drag),
            ("edge_friction", self.edge_friction),
            ("edge_drag", self.edge_drag),
            ("speed_limit", self.speed_limit),
            ("scale", self.scale),
        ] {
            ConfigError::check_non_negative(name, value)?;
        }
        Ok(())
    }
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self::scroll()
    }
}
