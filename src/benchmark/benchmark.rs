use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation::forces::{AccelSet, AirDrag, ConstantGravity, TargetSteering};
use crate::simulation::geometry::{Profile, Vessel};
use crate::simulation::integrator::step_frame;
use crate::simulation::params::Parameters;
use crate::simulation::shape;
use crate::simulation::states::{Particle, ParticleKind, System, NVec2, NVec3};

/// Helper to build a pool of size `n` mid-flight over a flat vessel
/// Deterministic positions, no rand needed
fn make_system(n: usize, vessel: &Vessel) -> System {
    let mut particles = Vec::with_capacity(n);

    for i in 0..n {
        let i_f = i as f64;
        let pos = NVec3::new(
            vessel.center.x + (i_f * 0.37).sin() * 100.0,
            vessel.center.y + (i_f * 0.13).cos() * 100.0,
            (i_f * 0.07).sin().abs() * 60.0,
        );
        let vel = NVec3::new((i_f * 0.11).cos() * 2.0, (i_f * 0.23).sin() * 2.0, 10.0);

        particles.push(Particle {
            pos,
            vel,
            rotation: 0.0,
            rotation_speed: 0.1,
            kind: ParticleKind::ALL[i % ParticleKind::ALL.len()],
            target: None,
        });
    }

    System {
        particles,
        t: 0.0,
        forming: false,
    }
}

fn make_forces(params: &Parameters) -> AccelSet {
    AccelSet::new()
        .with(ConstantGravity { g: params.gravity })
        .with(AirDrag {
            coeff: params.air_resistance,
        })
        .with(TargetSteering {
            far_radius: params.far_radius,
            near_radius: params.near_radius,
            lock_radius: params.lock_radius,
            far_gain: params.far_gain,
            near_gain: params.near_gain,
            approach_gain: params.approach_gain,
            steer_damp: params.steer_damp,
            approach_damp: params.approach_damp,
        })
}

/// Time one integrator frame across a range of pool sizes, free-falling and
/// shape-forming
pub fn bench_step() {
    let ns = [200, 400, 800, 1600, 3200, 6400];
    let steps = 200;

    let vessel = Vessel::new(NVec2::new(0.0, 0.0), 180.0, 20.0, Profile::Flat);
    let params = Parameters::default();
    let forces = make_forces(&params);

    for n in ns {
        // Free-flight frames
        let mut sys_free = make_system(n, &vessel);

        // Warm up
        step_frame(&mut sys_free, &forces, &vessel, &params);

        let t0 = Instant::now();
        for _ in 0..steps {
            step_frame(&mut sys_free, &forces, &vessel, &params);
        }
        let free_per_step = t0.elapsed().as_secs_f64() / steps as f64;

        // Shape-forming frames: every particle steered to a ring of targets
        let mut sys_form = make_system(n, &vessel);
        sys_form.forming = true;
        for (i, p) in sys_form.particles.iter_mut().enumerate() {
            let angle = i as f64 * 0.1;
            p.target = Some(vessel.center + NVec2::new(angle.cos(), angle.sin()) * 100.0);
        }

        step_frame(&mut sys_form, &forces, &vessel, &params);

        let t1 = Instant::now();
        for _ in 0..steps {
            step_frame(&mut sys_form, &forces, &vessel, &params);
        }
        let form_per_step = t1.elapsed().as_secs_f64() / steps as f64;

        println!(
            "N = {n:5}, free step = {:8.6} s, forming step = {:8.6} s",
            free_per_step, form_per_step
        );
    }
}

/// Time digit rasterization + point generation for one- and two-digit
/// numbers
pub fn bench_shape() {
    let vessel = Vessel::new(NVec2::new(0.0, 0.0), 180.0, 20.0, Profile::Flat);
    let mut rng = StdRng::seed_from_u64(42);
    let rounds = 100;

    for number in [5_i64, 42, 99] {
        // Warm up
        let points = shape::number_points(number, &vessel, &mut rng);

        let t0 = Instant::now();
        for _ in 0..rounds {
            let _ = shape::number_points(number, &vessel, &mut rng);
        }
        let per_call = t0.elapsed().as_secs_f64() / rounds as f64;

        println!(
            "number = {number:3}, points = {:5}, rasterize = {:8.6} s",
            points.len(),
            per_call
        );
    }
}
