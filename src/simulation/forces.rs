//! Force / acceleration contributors for the toss engine
//!
//! Defines the per-frame acceleration trait and the three contributors the
//! integrator sums before the velocity kick: constant gravity, vertical air
//! drag, and two-tier target steering
//!
//! The integrator runs with a unit frame step, so velocity-proportional
//! terms double as per-frame velocity damping: a contribution of
//! `(k - 1) * v` is exactly `v *= k` after the kick. The steering tiers
//! below use that to fold their extra damping into the acceleration buffer.

use crate::simulation::states::{System, NVec3};

/// Collection of acceleration terms (gravity, drag, steering, etc.)
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per particle
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    /// Compute total accelerations at time `t` for all particles in `sys`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, t: f64, sys: &System, out: &mut [NVec3]) {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        // Iterate over all acceleration contributors
        for term in &self.terms {
            term.acceleration(t, sys, out);
        }
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for acceleration sources operating on [`System`]
/// Implementations add their contribution into `out[i]` for each particle
pub trait Acceleration {
    fn acceleration(&self, t: f64, sys: &System, out: &mut [NVec3]);
}

/// Constant downward gravity on the height axis
pub struct ConstantGravity {
    pub g: f64,
}

impl Acceleration for ConstantGravity {
    fn acceleration(&self, _t: f64, _sys: &System, out: &mut [NVec3]) {
        for a in out.iter_mut() {
            a.z -= self.g;
        }
    }
}

/// Air resistance on the vertical velocity component only, so fast-moving
/// particles decelerate harder. Lateral motion is handled by the global
/// dampening pass instead.
pub struct AirDrag {
    pub coeff: f64,
}

impl Acceleration for AirDrag {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) {
        for (a, p) in out.iter_mut().zip(sys.particles.iter()) {
            a.z -= self.coeff * p.vel.z;
        }
    }
}

/// Critically-damped lateral pursuit of the assigned formation target.
///
/// Inactive unless the system is in shape-forming mode. Three distance
/// tiers:
/// - beyond `near_radius`: weak far-field pull (`far_gain` past
///   `far_radius`, `near_gain` inside it) with `steer_damp` velocity decay
/// - between `lock_radius` and `near_radius`: strong final-approach pull
///   with heavier `approach_damp` decay, arriving with decaying oscillation
/// - inside `lock_radius`: nothing; the integrator snaps and pins there
pub struct TargetSteering {
    pub far_radius: f64,
    pub near_radius: f64,
    pub lock_radius: f64,
    pub far_gain: f64,
    pub near_gain: f64,
    pub approach_gain: f64,
    pub steer_damp: f64,
    pub approach_damp: f64,
}

impl Acceleration for TargetSteering {
    fn acceleration(&self, _t: f64, sys: &System, out: &mut [NVec3]) {
        if !sys.forming {
            return;
        }

        for (a, p) in out.iter_mut().zip(sys.particles.iter()) {
            let Some(target) = p.target else {
                continue;
            };

            // Lateral displacement to the formation point
            let dx = target.x - p.pos.x;
            let dy = target.y - p.pos.y;
            let dist = (dx * dx + dy * dy).sqrt();

            if dist > self.near_radius {
                // Two-tier pull that strengthens as the particle closes in,
                // with extra damping of the existing lateral velocity
                let gain = if dist > self.far_radius {
                    self.far_gain
                } else {
                    self.near_gain
                };
                a.x += (self.steer_damp - 1.0) * p.vel.x + dx * gain;
                a.y += (self.steer_damp - 1.0) * p.vel.y + dy * gain;
            } else if dist > self.lock_radius {
                // Final approach: much stronger damping and attraction
                a.x += (self.approach_damp - 1.0) * p.vel.x + dx * self.approach_gain;
                a.y += (self.approach_damp - 1.0) * p.vel.y + dy * self.approach_gain;
            }
            // dist <= lock_radius: locked, handled by the integrator
        }
    }
}
