//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces the runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - vessel geometry and pose (`Vessel`)
//! - the particle pool (`System`, scattered at t = 0)
//! - active force set (`AccelSet`: gravity, drag, steering)
//! - the toss choreographer and the seeded random source
//!
//! The scenario is inserted into Bevy as a `Resource` and consumed by the
//! per-frame step and visualization systems

use bevy::prelude::Resource;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::choreographer::{Choreographer, NumberRange, TossTuning};
use crate::simulation::engine::Engine;
use crate::simulation::forces::{AccelSet, AirDrag, ConstantGravity, TargetSteering};
use crate::simulation::geometry::{Profile, Vessel};
use crate::simulation::integrator::step_frame;
use crate::simulation::params::Parameters;
use crate::simulation::states::{System, NVec2};

/// Bevy resource representing a fully-initialized wok-toss scenario
///
/// This is the main "runtime bundle" constructed from a [`ScenarioConfig`]:
/// it owns every piece of mutable simulation state, so a single system can
/// advance one whole frame with no partial reads visible anywhere else
#[derive(Resource)]
pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub vessel: Vessel,
    pub system: System,
    pub forces: AccelSet,
    pub choreographer: Choreographer,
    pub rng: StdRng,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Self {
        // Parameters (runtime) from ParametersConfig; steering gains and
        // settle thresholds keep their built-in defaults
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            h0: p_cfg.h0,
            gravity: p_cfg.gravity,
            dampening: p_cfg.dampening,
            air_resistance: p_cfg.air_resistance,
            floor_restitution: p_cfg.floor_restitution,
            wall_restitution: p_cfg.wall_restitution,
            seed: p_cfg.seed,
            ..Parameters::default()
        };

        // Engine (runtime) from EngineConfig
        let e_cfg = cfg.engine;
        let engine = Engine {
            dimension: e_cfg.dimension,
            particles: e_cfg.particles.unwrap_or(400),
        };

        // Vessel: the dimension flag selects the depth profile
        let v_cfg = cfg.vessel;
        let profile = if engine.dimension {
            Profile::Bowl {
                depth: v_cfg.depth.unwrap_or(0.15),
            }
        } else {
            Profile::Flat
        };
        let vessel = Vessel::new(
            NVec2::new(v_cfg.center[0], v_cfg.center[1]),
            v_cfg.radius,
            v_cfg.margin.unwrap_or(20.0),
            profile,
        );

        // Choreography tuning from TossConfig; milliseconds to seconds,
        // toss-count bounds normalized so a swapped pair still works
        let t_cfg = cfg.toss;
        let defaults = TossTuning::default();
        let lo = t_cfg.min_tosses.unwrap_or(defaults.min_tosses);
        let hi = t_cfg.max_tosses.unwrap_or(defaults.max_tosses);
        let tuning = TossTuning {
            windup: t_cfg.windup_ms.map_or(defaults.windup, |ms| ms / 1000.0),
            snap: t_cfg.snap_ms.map_or(defaults.snap, |ms| ms / 1000.0),
            next_delay_min: t_cfg
                .next_delay_min_ms
                .map_or(defaults.next_delay_min, |ms| ms / 1000.0),
            next_delay_max: t_cfg
                .next_delay_max_ms
                .map_or(defaults.next_delay_max, |ms| ms / 1000.0),
            settle: t_cfg.settle_ms.map_or(defaults.settle, |ms| ms / 1000.0),
            min_tosses: lo.min(hi),
            max_tosses: lo.max(hi),
            range: NumberRange {
                min: t_cfg.number_min,
                max: t_cfg.number_max,
            },
            ..defaults
        };

        // Forces: gravity, vertical drag, and target steering wired to the
        // same parameter set the integrator uses
        let forces = AccelSet::new()
            .with(ConstantGravity {
                g: parameters.gravity,
            })
            .with(AirDrag {
                coeff: parameters.air_resistance,
            })
            .with(TargetSteering {
                far_radius: parameters.far_radius,
                near_radius: parameters.near_radius,
                lock_radius: parameters.lock_radius,
                far_gain: parameters.far_gain,
                near_gain: parameters.near_gain,
                approach_gain: parameters.approach_gain,
                steer_damp: parameters.steer_damp,
                approach_damp: parameters.approach_damp,
            });

        // Deterministic random source, shared by every randomized operation
        let mut rng = StdRng::seed_from_u64(parameters.seed);

        // Initial pool: scattered at rest, t = 0
        let system = System::new(engine.particles, &vessel, &mut rng);

        Self {
            engine,
            parameters,
            vessel,
            system,
            forces,
            choreographer: Choreographer::new(tuning),
            rng,
        }
    }

    /// Advance the whole scenario by one frame: drain due choreography
    /// tasks, ease the vessel pose toward its targets, then integrate every
    /// particle. The frame is complete when this returns; presentation
    /// reads state only between calls.
    pub fn advance_frame(&mut self) {
        let Scenario {
            system,
            vessel,
            parameters,
            forces,
            choreographer,
            rng,
            ..
        } = self;

        choreographer.update(system, vessel, parameters, rng);
        vessel.pose.ease();
        step_frame(system, forces, vessel, parameters);
    }

    /// External activate trigger. Ignored while a sequence is running.
    pub fn activate(&mut self) -> bool {
        self.choreographer.trigger(self.system.t, &mut self.rng)
    }
}
