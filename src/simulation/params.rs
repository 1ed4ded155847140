//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - frame clock step and gravity/drag/damping constants,
//! - bounce restitution for floor and wall contacts,
//! - target-steering gains, radii and damping tiers,
//! - settling thresholds and the deterministic random seed
//!
//! All kinematic constants are per-frame quantities (the integrator runs
//! with a unit time step); `h0` only advances the wall-clock used by the
//! toss choreography.

#[derive(Debug, Clone)]
pub struct Parameters {
    pub h0: f64,                // seconds advanced per frame (nominally 1/60)
    pub gravity: f64,           // downward acceleration on z per frame
    pub dampening: f64,         // global per-frame velocity multiplier
    pub air_resistance: f64,    // drag coefficient on the z velocity only
    pub floor_restitution: f64, // fraction of vz kept (sign flipped) on floor bounce
    pub wall_restitution: f64,  // fraction of lateral speed kept on rim bounce
    pub far_radius: f64,        // steering: beyond this the weak far gain applies
    pub near_radius: f64,       // steering: inside this the final-approach tier applies
    pub lock_radius: f64,       // steering: snap-to-target distance
    pub far_gain: f64,          // steering pull per unit displacement, far field
    pub near_gain: f64,         // steering pull per unit displacement, near field
    pub approach_gain: f64,     // steering pull during final approach
    pub steer_damp: f64,        // extra velocity multiplier while steering
    pub approach_damp: f64,     // extra velocity multiplier during final approach
    pub settle_speed: f64,      // below this linear speed, spin decays faster
    pub settle_decay: f64,      // extra rotation-speed multiplier when settling
    pub seed: u64,              // deterministic seed to make runs reproducible
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: 1.0 / 60.0,
            gravity: 0.5,
            dampening: 0.98,
            air_resistance: 0.02,
            floor_restitution: 0.4,
            wall_restitution: 0.6,
            far_radius: 50.0,
            near_radius: 5.0,
            lock_radius: 1.0,
            far_gain: 0.002,
            near_gain: 0.0035,
            approach_gain: 0.1,
            steer_damp: 0.85,
            approach_damp: 0.7,
            settle_speed: 0.5,
            settle_decay: 0.9,
            seed: 42,
        }
    }
}
