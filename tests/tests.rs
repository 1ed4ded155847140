use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use woksim::configuration::config::{
    EngineConfig, ParametersConfig, ScenarioConfig, TossConfig, VesselConfig,
};
use woksim::simulation::choreographer::NumberRange;
use woksim::simulation::forces::{AccelSet, AirDrag, ConstantGravity, TargetSteering};
use woksim::simulation::geometry::{Profile, Vessel};
use woksim::simulation::integrator::step_frame;
use woksim::simulation::params::Parameters;
use woksim::simulation::scenario::Scenario;
use woksim::simulation::shape;
use woksim::simulation::states::{Particle, ParticleKind, System, NVec2, NVec3};

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters::default()
}

/// Flat circular vessel matching the reference geometry
pub fn flat_vessel() -> Vessel {
    Vessel::new(NVec2::new(0.0, 0.0), 180.0, 20.0, Profile::Flat)
}

/// Spherical-cap bowl vessel
pub fn bowl_vessel() -> Vessel {
    Vessel::new(NVec2::new(0.0, 0.0), 200.0, 20.0, Profile::Bowl { depth: 0.15 })
}

/// Build the standard force set from a parameter bundle
pub fn force_set(p: &Parameters) -> AccelSet {
    AccelSet::new()
        .with(ConstantGravity { g: p.gravity })
        .with(AirDrag {
            coeff: p.air_resistance,
        })
        .with(TargetSteering {
            far_radius: p.far_radius,
            near_radius: p.near_radius,
            lock_radius: p.lock_radius,
            far_gain: p.far_gain,
            near_gain: p.near_gain,
            approach_gain: p.approach_gain,
            steer_damp: p.steer_damp,
            approach_damp: p.approach_damp,
        })
}

/// Build a system holding exactly the given particles
pub fn pool(particles: Vec<Particle>) -> System {
    System {
        particles,
        t: 0.0,
        forming: false,
    }
}

/// A single resting particle with no target
pub fn resting_particle(x: f64, y: f64, z: f64) -> Particle {
    Particle {
        pos: NVec3::new(x, y, z),
        vel: NVec3::zeros(),
        rotation: 0.0,
        rotation_speed: 0.0,
        kind: ParticleKind::Rice,
        target: None,
    }
}

/// Scenario config used by the end-to-end choreography tests
fn test_scenario_config(min_tosses: u32, max_tosses: u32, number_min: i64, number_max: i64) -> ScenarioConfig {
    ScenarioConfig {
        engine: EngineConfig {
            dimension: false,
            particles: Some(100),
        },
        parameters: ParametersConfig {
            h0: 1.0 / 60.0,
            gravity: 0.5,
            dampening: 0.98,
            air_resistance: 0.02,
            floor_restitution: 0.4,
            wall_restitution: 0.6,
            seed: 7,
        },
        vessel: VesselConfig {
            center: vec![0.0, 0.0],
            radius: 180.0,
            margin: Some(20.0),
            depth: None,
        },
        toss: TossConfig {
            windup_ms: None,
            snap_ms: None,
            next_delay_min_ms: None,
            next_delay_max_ms: None,
            settle_ms: None,
            min_tosses: Some(min_tosses),
            max_tosses: Some(max_tosses),
            number_min: Some(number_min),
            number_max: Some(number_max),
        },
    }
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn rest_state_is_idempotent() {
    let vessel = flat_vessel();
    let params = test_params();
    let forces = force_set(&params);

    let mut sys = pool(vec![resting_particle(40.0, 10.0, 0.0)]);

    for _ in 0..20 {
        step_frame(&mut sys, &forces, &vessel, &params);
        let p = &sys.particles[0];

        // Lateral state untouched; height clamped back to the resting
        // surface by the gravity-then-clamp cycle every frame
        assert_eq!(p.pos.x, 40.0, "lateral x drifted at rest");
        assert_eq!(p.pos.y, 10.0, "lateral y drifted at rest");
        assert_eq!(p.pos.z, 0.0, "height not clamped to the resting surface");
        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.vel.y, 0.0);
    }
}

#[test]
fn boundary_never_violated_after_resolution_flat() {
    let vessel = flat_vessel();
    let params = test_params();
    let forces = force_set(&params);
    let mut rng = StdRng::seed_from_u64(3);

    let mut sys = System::new(50, &vessel, &mut rng);
    // Fling everything outward hard
    for p in sys.particles.iter_mut() {
        p.vel = NVec3::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(0.0..25.0),
        );
    }

    for _ in 0..300 {
        step_frame(&mut sys, &forces, &vessel, &params);
        for p in &sys.particles {
            let dist = (NVec2::new(p.pos.x, p.pos.y) - vessel.center).norm();
            let allowed = vessel.allowed_radius(p.pos.z);
            assert!(
                dist <= allowed + 1e-9,
                "particle escaped: dist {} > allowed {}",
                dist,
                allowed
            );
        }
    }
}

#[test]
fn boundary_never_violated_after_resolution_bowl() {
    let vessel = bowl_vessel();
    let params = test_params();
    let forces = force_set(&params);
    let mut rng = StdRng::seed_from_u64(4);

    let mut sys = System::new(50, &vessel, &mut rng);
    for p in sys.particles.iter_mut() {
        p.vel = NVec3::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-30.0..30.0),
            rng.gen_range(0.0..25.0),
        );
    }

    for _ in 0..300 {
        step_frame(&mut sys, &forces, &vessel, &params);
        for p in &sys.particles {
            let dist = (NVec2::new(p.pos.x, p.pos.y) - vessel.center).norm();
            let allowed = vessel.allowed_radius(p.pos.z);
            assert!(
                dist <= allowed + 1e-9,
                "particle escaped the bowl: dist {} > allowed {}",
                dist,
                allowed
            );
        }
    }
}

#[test]
fn bowl_geometry_matches_cap_profile() {
    let vessel = bowl_vessel();
    let depth_angle = 0.15 * std::f64::consts::PI;

    // Bottom of the cap sits at -R sin(D pi), rim at height 0
    let bottom = vessel.rest_height(0.0);
    assert!((bottom + 200.0 * depth_angle.sin()).abs() < 1e-9);
    assert!(vessel.rest_height(vessel.rim_radius()).abs() < 1e-9);

    // Walls curve inward below the rim
    let at_rim = vessel.allowed_radius(0.0);
    let below = vessel.allowed_radius(bottom * 0.5);
    assert!(below < at_rim, "allowed radius must shrink below the rim");

    // Airborne particles get the rim allowance
    assert_eq!(vessel.allowed_radius(50.0), at_rim);
}

// ==================================================================================
// Steering tests
// ==================================================================================

#[test]
fn steering_converges_then_locks_exactly() {
    let vessel = flat_vessel();
    let params = test_params();
    let forces = force_set(&params);

    let target = NVec2::new(-20.0, 30.0);
    let mut p = resting_particle(60.0, 30.0, 0.0);
    p.target = Some(target);
    let mut sys = pool(vec![p]);
    sys.forming = true;

    let lateral = |sys: &System| NVec2::new(sys.particles[0].pos.x, sys.particles[0].pos.y);
    let mut dist = (target - lateral(&sys)).norm();
    let mut locked = false;

    for _ in 0..2000 {
        step_frame(&mut sys, &forces, &vessel, &params);
        let new_dist = (target - lateral(&sys)).norm();
        if new_dist == 0.0 {
            locked = true;
            break;
        }
        assert!(
            new_dist < dist,
            "distance to target must shrink every frame: {} -> {}",
            dist,
            new_dist
        );
        dist = new_dist;
    }
    assert!(locked, "particle never locked onto its target");

    // Locked state is terminal: exact position, zero lateral velocity,
    // and further frames change nothing laterally
    for _ in 0..10 {
        step_frame(&mut sys, &forces, &vessel, &params);
        let p = &sys.particles[0];
        assert_eq!(p.pos.x, target.x);
        assert_eq!(p.pos.y, target.y);
        assert_eq!(p.vel.x, 0.0);
        assert_eq!(p.vel.y, 0.0);
    }
}

#[test]
fn steering_inactive_without_forming_flag() {
    let vessel = flat_vessel();
    let params = test_params();
    let forces = force_set(&params);

    let mut p = resting_particle(60.0, 30.0, 0.0);
    p.target = Some(NVec2::new(0.0, 0.0));
    let mut sys = pool(vec![p]);
    // forming stays false: the target must be ignored

    for _ in 0..50 {
        step_frame(&mut sys, &forces, &vessel, &params);
    }
    assert_eq!(sys.particles[0].pos.x, 60.0);
    assert_eq!(sys.particles[0].pos.y, 30.0);
}

// ==================================================================================
// Shape generator tests
// ==================================================================================

#[test]
fn shape_points_deterministic_up_to_shuffle() {
    let vessel = flat_vessel();

    let mut rng_a = StdRng::seed_from_u64(1);
    let mut rng_b = StdRng::seed_from_u64(999);

    let mut a = shape::number_points(42, &vessel, &mut rng_a);
    let mut b = shape::number_points(42, &vessel, &mut rng_b);
    assert!(!a.is_empty());
    assert_eq!(a.len(), b.len());

    // Different shuffles, same unordered point set
    let key = |v: &NVec2| (v.x.to_bits(), v.y.to_bits());
    a.sort_by_key(key);
    b.sort_by_key(key);
    for (pa, pb) in a.iter().zip(b.iter()) {
        assert_eq!(key(pa), key(pb));
    }
}

#[test]
fn shape_assignment_leaves_excess_particles_free() {
    let vessel = flat_vessel();
    let mut rng = StdRng::seed_from_u64(5);

    let points = shape::number_points(7, &vessel, &mut rng);
    let count = points.len() + 25;
    let mut sys = pool((0..count).map(|_| resting_particle(0.0, 0.0, 0.0)).collect());

    shape::assign_targets(&mut sys, &points);

    for (i, p) in sys.particles.iter().enumerate() {
        if i < points.len() {
            assert_eq!(p.target, Some(points[i]));
        } else {
            assert_eq!(p.target, None, "particle {} past the point count must stay free", i);
        }
    }
}

#[test]
fn ballistic_solve_lands_on_target() {
    let pos = NVec3::new(0.0, 0.0, 0.0);
    let target = NVec2::new(50.0, -30.0);
    let g = 0.5;
    let vz = 20.0;

    let lateral = shape::ballistic_lateral(&pos, vz, target, 0.0, g).expect("valid arc");

    // Flight time for a same-height arc is 2 vz / g frames
    let flight = 2.0 * vz / g;
    assert!((lateral.x - target.x / flight).abs() < 1e-12);
    assert!((lateral.y - target.y / flight).abs() < 1e-12);

    // Drag-free replay of the closed-form arc lands exactly on the target
    let mut p = NVec3::new(pos.x, pos.y, pos.z);
    let mut v = NVec3::new(lateral.x, lateral.y, vz);
    for _ in 0..flight as usize {
        v.z -= g;
        p += v;
    }
    assert!((p.x - target.x).abs() < 1e-9);
    assert!((p.y - target.y).abs() < 1e-9);
}

#[test]
fn ballistic_solve_rejects_unreachable_target() {
    let pos = NVec3::new(0.0, 0.0, 0.0);
    // Apex of the arc is vz^2 / 2g = 400; a target height above it has no root
    let unreachable = shape::ballistic_lateral(&pos, 20.0, NVec2::new(10.0, 0.0), 500.0, 0.5);
    assert!(unreachable.is_none());
}

// ==================================================================================
// Choreography tests
// ==================================================================================

#[test]
fn toss_sequence_round_trip() {
    let mut scenario = Scenario::build_scenario(test_scenario_config(3, 3, 10, 99));
    assert!(scenario.activate(), "first trigger must start the sequence");

    let mut snaps: Vec<(u32, bool)> = Vec::new();
    let mut last_count = 0;
    let mut final_snap_t = None;
    let mut idle_t = None;

    // Run up to 30 simulated seconds
    for _ in 0..(30 * 60) {
        scenario.advance_frame();

        let count = scenario.choreographer.state.toss_count;
        if count != last_count {
            snaps.push((count, scenario.system.forming));
            last_count = count;
            if count == 3 {
                final_snap_t = Some(scenario.system.t);
            }
        }
        if !scenario.choreographer.state.active {
            idle_t = Some(scenario.system.t);
            break;
        }
    }

    // Exactly two scatter launches before the third, shape-forming one
    assert_eq!(
        snaps,
        vec![(1, false), (2, false), (3, true)],
        "expected scatter, scatter, then the final forming toss"
    );

    // Back to Idle after the settle delay, with the forming flag cleared
    let (final_snap_t, idle_t) = (final_snap_t.unwrap(), idle_t.expect("sequence never returned to Idle"));
    assert!(idle_t - final_snap_t >= 4.0, "settle delay too short");
    assert!(!scenario.system.forming);
}

#[test]
fn trigger_while_active_is_a_no_op() {
    let mut scenario = Scenario::build_scenario(test_scenario_config(3, 4, 10, 99));
    assert!(scenario.activate());

    // Part-way into the wind-up
    for _ in 0..5 {
        scenario.advance_frame();
    }

    let before = scenario.choreographer.state;
    let pending = scenario.choreographer.pending();

    assert!(!scenario.activate(), "re-entrant trigger must be rejected");
    let after = scenario.choreographer.state;

    assert_eq!(before.active, after.active);
    assert_eq!(before.toss_count, after.toss_count);
    assert_eq!(before.target_toss_count, after.target_toss_count);
    assert_eq!(before.direction, after.direction);
    assert_eq!(pending, scenario.choreographer.pending());
}

// ==================================================================================
// Number range tests
// ==================================================================================

#[test]
fn number_range_defaults_and_normalization() {
    let defaulted = NumberRange { min: None, max: None };
    assert_eq!(defaulted.resolve(), (10, 99));

    let swapped = NumberRange {
        min: Some(50),
        max: Some(10),
    };
    let ordered = NumberRange {
        min: Some(10),
        max: Some(50),
    };
    assert_eq!(swapped.resolve(), ordered.resolve());

    let collapsed = NumberRange {
        min: Some(5),
        max: Some(5),
    };
    assert_eq!(collapsed.resolve(), (5, 5));
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..10 {
        assert_eq!(collapsed.draw(&mut rng), 5);
    }
}

#[test]
fn single_value_range_forms_that_number() {
    // One-toss sequence so the first snap is the final, forming one
    let mut scenario = Scenario::build_scenario(test_scenario_config(1, 1, 5, 5));
    assert!(scenario.activate());

    for _ in 0..(2 * 60) {
        scenario.advance_frame();
        if scenario.system.forming {
            break;
        }
    }
    assert!(scenario.system.forming, "final toss never fired");
    assert_eq!(scenario.choreographer.last_number, Some(5));

    // Every assigned target belongs to the point set of the digit "5"
    let mut rng = StdRng::seed_from_u64(0);
    let reference: std::collections::HashSet<(u64, u64)> =
        shape::number_points(5, &scenario.vessel, &mut rng)
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();
    let mut assigned = 0;
    for p in &scenario.system.particles {
        if let Some(t) = p.target {
            assert!(
                reference.contains(&(t.x.to_bits(), t.y.to_bits())),
                "target {:?} is not a pixel of the digit 5",
                t
            );
            assigned += 1;
        }
    }
    assert!(assigned > 0, "no particle received a formation target");
}
