use alloc::string::String;

/// Rejected layout or scroll configuration.
///
/// Options are validated when they are applied; out-of-range values are never clamped.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid scroll direction {0:?}, expected \"x\" or \"y\"")]
    InvalidDirection(String),
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },
    #[error("edge grip must be within 0..=1, got {0}")]
    InvalidEdgeGrip(f64),
    #[error("spring period must be finite and positive, got {0}")]
    InvalidSpringPeriod(f64),
}

impl ConfigError {
    /// Checks that `value` is finite and `>= 0`.
    pub fn check_non_negative(name: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::Negative { name, value })
        }
    }
}
