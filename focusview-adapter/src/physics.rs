//! The simulation seam used by the coordinator, plus a small reference integrator.

use focusview::geometry::abs;

/// The forces a coordinator can attach to its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Force {
    /// Pulls the body toward [`SpringParams::anchor`].
    Spring,
    /// Quadratic drag, `-μ·v·|v|`.
    Drag,
    /// Linear drag, `-μ·v`.
    Friction,
}

/// Spring configuration.
///
/// `period` is the undamped oscillation period in milliseconds; `damping_ratio` of `1.0` is
/// critical damping.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpringParams {
    pub anchor: f64,
    pub period: f64,
    pub damping_ratio: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            anchor: 0.0,
            period: 300.0,
            damping_ratio: 1.0,
        }
    }
}

impl SpringParams {
    fn angular_frequency(&self) -> f64 {
        if self.period > 0.0 {
            core::f64::consts::TAU / self.period
        } else {
            0.0
        }
    }

    /// Stiffness for a unit mass.
    pub fn stiffness(&self) -> f64 {
        let w = self.angular_frequency();
        w * w
    }

    pub fn damping(&self) -> f64 {
        2.0 * self.damping_ratio * self.angular_frequency()
    }
}

/// Result of one [`Simulation::step`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// The body came to rest during this step. Reported once per rest.
    pub settled: bool,
}

/// A one-dimensional body with a registry of attachable forces.
///
/// Implementations must not call back into the coordinator; the coordinator reads the
/// outcome of [`Simulation::step`] and applies any follow-up force changes itself.
pub trait Simulation {
    fn position(&self) -> f64;
    fn set_position(&mut self, position: f64);

    fn velocity(&self) -> f64;
    fn set_velocity(&mut self, velocity: f64);

    fn attach(&mut self, force: Force);
    fn detach(&mut self, force: Force);
    fn is_attached(&self, force: Force) -> bool;

    fn spring(&self) -> SpringParams;
    fn set_spring(&mut self, params: SpringParams);

    /// Strength of [`Force::Drag`] or [`Force::Friction`]. Ignored for the spring.
    fn drag_strength(&self, force: Force) -> f64;
    fn set_drag_strength(&mut self, force: Force, strength: f64);

    /// Advances the body by `dt_ms` milliseconds.
    fn step(&mut self, dt_ms: f64) -> StepOutcome;
}

/// Longest integration sub-step, in milliseconds.
const MAX_SUB_STEP_MS: f64 = 4.0;
/// Below this speed (units per millisecond) the body may rest.
const REST_SPEED: f64 = 0.005;
/// With a spring attached, the body rests only this close to the anchor.
const REST_DISTANCE: f64 = 0.5;

/// Reference [`Simulation`]: a unit-mass particle integrated with semi-implicit Euler.
///
/// The engine sleeps once the body comes to rest and reports `settled` on that step only.
/// Changing position, velocity, spring or drag parameters wakes it, and so does attaching a
/// force.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PhysicsEngine {
    position: f64,
    velocity: f64,
    spring: SpringParams,
    drag: f64,
    friction: f64,
    spring_on: bool,
    drag_on: bool,
    friction_on: bool,
    asleep: bool,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self {
            position: 0.0,
            velocity: 0.0,
            spring: SpringParams::default(),
            drag: 0.0001,
            friction: 0.005,
            spring_on: false,
            drag_on: false,
            friction_on: false,
            asleep: true,
        }
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_asleep(&self) -> bool {
        self.asleep
    }

    fn flag(&mut self, force: Force) -> &mut bool {
        match force {
            Force::Spring => &mut self.spring_on,
            Force::Drag => &mut self.drag_on,
            Force::Friction => &mut self.friction_on,
        }
    }

    fn set_flag(&mut self, force: Force, on: bool) {
        let flag = self.flag(force);
        if *flag != on {
            *flag = on;
            // A body at rest stays at rest when a force is removed.
            if on {
                self.asleep = false;
            }
        }
    }

    fn sub_step(&mut self, h: f64) {
        let mut v = self.velocity;

        let mut brake = 0.0;
        if self.friction_on {
            brake += self.friction;
        }
        if self.drag_on {
            brake += self.drag * abs(v);
        }
        // Drag only ever slows the incoming motion; it never holds a body against the spring.
        let dv = brake * h;
        v = if dv >= abs(v) {
            0.0
        } else if v > 0.0 {
            v - dv
        } else {
            v + dv
        };

        if self.spring_on {
            let x = self.position - self.spring.anchor;
            v += (-self.spring.stiffness() * x - self.spring.damping() * v) * h;
        }

        self.velocity = v;
        self.position += v * h;
    }

    fn at_rest(&self) -> bool {
        if abs(self.velocity) >= REST_SPEED {
            return false;
        }
        !self.spring_on || abs(self.position - self.spring.anchor) < REST_DISTANCE
    }
}

impl Simulation for PhysicsEngine {
    fn position(&self) -> f64 {
        self.position
    }

    fn set_position(&mut self, position: f64) {
        if self.position != position {
            self.position = position;
            self.asleep = false;
        }
    }

    fn velocity(&self) -> f64 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: f64) {
        if self.velocity != velocity {
            self.velocity = velocity;
            self.asleep = false;
        }
    }

    fn attach(&mut self, force: Force) {
        self.set_flag(force, true);
    }

    fn detach(&mut self, force: Force) {
        self.set_flag(force, false);
    }

    fn is_attached(&self, force: Force) -> bool {
        match force {
            Force::Spring => self.spring_on,
            Force::Drag => self.drag_on,
            Force::Friction => self.friction_on,
        }
    }

    fn spring(&self) -> SpringParams {
        self.spring
    }

    fn set_spring(&mut self, params: SpringParams) {
        if self.spring != params {
            self.spring = params;
            self.asleep = false;
        }
    }

    fn drag_strength(&self, force: Force) -> f64 {
        match force {
            Force::Drag => self.drag,
            Force::Friction => self.friction,
            Force::Spring => 0.0,
        }
    }

    fn set_drag_strength(&mut self, force: Force, strength: f64) {
        let slot = match force {
            Force::Drag => &mut self.drag,
            Force::Friction => &mut self.friction,
            Force::Spring => return,
        };
        if *slot != strength {
            *slot = strength;
            self.asleep = false;
        }
    }

    fn step(&mut self, dt_ms: f64) -> StepOutcome {
        if self.asleep || dt_ms.is_nan() || dt_ms <= 0.0 {
            return StepOutcome::default();
        }

        let mut remaining = dt_ms;
        while remaining > 0.0 {
            let h = remaining.min(MAX_SUB_STEP_MS);
            self.sub_step(h);
            remaining -= h;
        }

        if !self.at_rest() {
            return StepOutcome::default();
        }
        if self.spring_on {
            self.position = self.spring.anchor;
        }
        self.velocity = 0.0;
        self.asleep = true;
        StepOutcome { settled: true }
    }
}
