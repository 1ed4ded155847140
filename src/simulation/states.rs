//! Core state types for the wok-toss simulation.
//!
//! Defines the particle pool and its records:
//! - `Particle` using `NVec3` (x, y lateral / z height above the rim plane)
//! - `ParticleKind` visual category (no effect on physics)
//! - `System` holding the fixed pool, the simulation clock `t`, and the
//!   shape-forming flag
//!
//! The pool is allocated once and reused forever; only position, velocity,
//! rotation and target mutate after startup.

use nalgebra::{Vector2, Vector3};
use rand::Rng;

use crate::simulation::geometry::Vessel;

pub type NVec2 = Vector2<f64>;
pub type NVec3 = Vector3<f64>;

/// Visual category of an ingredient fragment. Rendering picks shape/color
/// from this; physics never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleKind {
    Ginger,
    Garlic,
    Rice,
    Beans,
}

impl ParticleKind {
    pub const ALL: [ParticleKind; 4] = [
        ParticleKind::Ginger,
        ParticleKind::Garlic,
        ParticleKind::Rice,
        ParticleKind::Beans,
    ];
}

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: NVec3,            // x, y lateral; z height above the rim plane
    pub vel: NVec3,            // velocity per frame
    pub rotation: f64,         // orientation angle
    pub rotation_speed: f64,   // angular velocity per frame, decays over time
    pub kind: ParticleKind,    // visual category only
    pub target: Option<NVec2>, // lateral formation point; None = free-floating
}

#[derive(Debug, Clone)]
pub struct System {
    pub particles: Vec<Particle>, // fixed-size pool
    pub t: f64,                   // simulation clock, seconds
    pub forming: bool,            // steering active for targeted particles
}

impl System {
    /// Allocate the pool and scatter it inside the vessel at rest.
    pub fn new(count: usize, vessel: &Vessel, rng: &mut impl Rng) -> Self {
        let mut sys = Self {
            particles: Vec::with_capacity(count),
            t: 0.0,
            forming: false,
        };
        for _ in 0..count {
            let kind = ParticleKind::ALL[rng.gen_range(0..ParticleKind::ALL.len())];
            sys.particles.push(Particle {
                pos: NVec3::zeros(),
                vel: NVec3::zeros(),
                rotation: 0.0,
                rotation_speed: 0.0,
                kind,
                target: None,
            });
        }
        sys.scatter(vessel, rng);
        sys
    }

    /// Re-seat every particle at a random resting spot inside the vessel,
    /// zero its motion, and clear all targets. Kinds are kept.
    pub fn scatter(&mut self, vessel: &Vessel, rng: &mut impl Rng) {
        self.forming = false;
        let reach = vessel.rest_radius();
        for p in self.particles.iter_mut() {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let dist = rng.gen_range(0.0..reach);
            let lateral = vessel.center + NVec2::new(angle.cos(), angle.sin()) * dist;

            p.pos = NVec3::new(lateral.x, lateral.y, vessel.rest_height(dist));
            p.vel = NVec3::zeros();
            p.rotation = rng.gen_range(0.0..std::f64::consts::TAU);
            p.rotation_speed = rng.gen_range(-0.1..0.1);
            p.target = None;
        }
    }
}
