/// One gesture sample along the scroll axis.
///
/// `delta` is the distance moved since the previous sample and `velocity` is in units per
/// millisecond. `slip` marks continuous input (wheel, trackpad momentum) as opposed to a
/// direct touch drag; slip input is clamped to the configured speed limit.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GestureEvent {
    pub delta: f64,
    pub velocity: f64,
    pub slip: bool,
}

impl GestureEvent {
    pub fn touch(delta: f64, velocity: f64) -> Self {
        Self {
            delta,
            velocity,
            slip: false,
        }
    }

    pub fn slip(delta: f64, velocity: f64) -> Self {
        Self {
            delta,
            velocity,
            slip: true,
        }
    }
}
