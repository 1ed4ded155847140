//! Fixed-order frame integrator for the particle system
//!
//! Advances every particle by one frame (semi-implicit Euler, unit time
//! step) driven by an `AccelSet`, the `Vessel` geometry and `Parameters`.
//! The phase order is fixed:
//!
//! 1. target lock (snap + pin inside the lock radius)
//! 2. acceleration accumulation and velocity kick
//! 3. position drift
//! 4. collision resolution - radial clamp first, floor clamp only if the
//!    radial clamp did not fire this frame
//! 5. global velocity dampening
//! 6. rotation integration with faster decay once a particle settles
//!
//! Particles never collide with each other, only with the vessel.

use crate::simulation::forces::AccelSet;
use crate::simulation::geometry::Vessel;
use crate::simulation::params::Parameters;
use crate::simulation::states::{System, NVec2, NVec3};

/// Advance the whole system by one frame in-place and bump `sys.t` by
/// `params.h0`. All kinematic constants are per-frame quantities.
pub fn step_frame(sys: &mut System, forces: &AccelSet, vessel: &Vessel, params: &Parameters) {
    let n = sys.particles.len();
    if n == 0 {
        sys.t += params.h0;
        return;
    }

    // Lock pass: a forming particle inside the lock radius is pinned
    // laterally onto its target with zero lateral velocity. Terminal state,
    // the steering term contributes nothing there afterwards.
    if sys.forming {
        for p in sys.particles.iter_mut() {
            if let Some(target) = p.target {
                let lateral = NVec2::new(p.pos.x, p.pos.y);
                if (target - lateral).norm() <= params.lock_radius {
                    p.pos.x = target.x;
                    p.pos.y = target.y;
                    p.vel.x = 0.0;
                    p.vel.y = 0.0;
                }
            }
        }
    }

    // Accumulate accelerations (steering, gravity, drag) at the current
    // state, then kick velocities before any position moves.
    let mut accels = vec![NVec3::zeros(); n];
    forces.accumulate_accels(sys.t, &*sys, &mut accels);

    for (p, a) in sys.particles.iter_mut().zip(accels.iter()) {
        p.vel += *a;
    }

    // Drift: full-step position update from the fresh velocities
    for p in sys.particles.iter_mut() {
        p.pos += p.vel;
    }

    // Collision resolution against the vessel. The radial clamp wins when
    // both would apply in the same frame; the floor clamp is skipped then.
    for p in sys.particles.iter_mut() {
        let lateral = NVec2::new(p.pos.x, p.pos.y) - vessel.center;
        let dist = lateral.norm();
        let allowed = vessel.allowed_radius(p.pos.z);

        if dist > allowed && dist > 0.0 {
            // Clamp back to the boundary along the same bearing
            let normal = lateral / dist;
            let clamped = vessel.center + normal * allowed;
            p.pos.x = clamped.x;
            p.pos.y = clamped.y;

            // Specular reflection of the lateral velocity about the outward
            // normal, scaled by the wall restitution
            let v_lat = NVec2::new(p.vel.x, p.vel.y);
            let reflected = (v_lat - 2.0 * v_lat.dot(&normal) * normal) * params.wall_restitution;
            p.vel.x = reflected.x;
            p.vel.y = reflected.y;
        } else {
            let rest = vessel.rest_height(dist);
            if p.pos.z < rest {
                p.pos.z = rest;
                p.vel.z = -params.floor_restitution * p.vel.z;
            }
        }
    }

    // Global dampening: ambient friction on every velocity component and
    // the spin, applied after all force and collision updates.
    for p in sys.particles.iter_mut() {
        p.vel *= params.dampening;
        p.rotation_speed *= params.dampening;
    }

    // Rotation: integrate spin, then decay it faster once the particle has
    // effectively come to rest.
    for p in sys.particles.iter_mut() {
        p.rotation += p.rotation_speed;
        if p.vel.norm() < params.settle_speed {
            p.rotation_speed *= params.settle_decay;
        }
    }

    sys.t += params.h0;
}
