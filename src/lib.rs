pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Particle, ParticleKind, System, NVec2, NVec3};
pub use simulation::geometry::{Profile, Vessel, VesselPose};
pub use simulation::params::Parameters;
pub use simulation::forces::{Acceleration, AccelSet, ConstantGravity, AirDrag, TargetSteering};
pub use simulation::integrator::step_frame;
pub use simulation::shape::{number_points, assign_targets, ballistic_lateral};
pub use simulation::choreographer::{Choreographer, NumberRange, Phase, TossState, TossTuning};
pub use simulation::scenario::Scenario;

pub use configuration::config::{EngineConfig, ParametersConfig, VesselConfig, TossConfig, ScenarioConfig};

pub use visualization::{vis2d::run_2d, vis3d::run_3d};

pub use benchmark::benchmark::{bench_step, bench_shape};
