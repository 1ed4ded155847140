//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! wok-toss scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – global engine options (dimension, pool size)
//! - [`ParametersConfig`] – numerical physics parameters
//! - [`VesselConfig`]     – container geometry
//! - [`TossConfig`]       – toss choreography timing and the number range
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example flat-vessel scenario YAML matching these types:
//!
//! ```yaml
//! engine:
//!   dimension: false        # false -> flat vessel / 2D view, true -> bowl / 3D view
//!   particles: 400
//!
//! parameters:
//!   h0: 0.016666            # seconds per frame
//!   gravity: 0.5            # per-frame downward acceleration
//!   dampening: 0.98         # global per-frame velocity multiplier
//!   air_resistance: 0.02    # drag on the vertical velocity component
//!   floor_restitution: 0.4  # bounce energy kept on floor contact
//!   wall_restitution: 0.6   # bounce energy kept on rim contact
//!   seed: 42                # deterministic seed
//!
//! vessel:
//!   center: [ 0.0, 0.0 ]
//!   radius: 180.0
//!   margin: 20.0
//!   # depth: 0.15           # bowl profile only (engine.dimension: true)
//!
//! toss:
//!   min_tosses: 3
//!   max_tosses: 4
//!   number_min: 10
//!   number_max: 99
//! ```
//!
//! The engine then maps this configuration into its internal runtime
//! scenario representation. Steering gains and the remaining fine-grained
//! tunables keep their built-in defaults unless overridden here.

use serde::Deserialize;

/// High-level engine configuration
/// Controls the structure of the simulation
#[derive(Deserialize, Debug)]
pub struct EngineConfig {
    pub dimension: bool,          // `false` - flat vessel / 2D view, `true` - bowl / 3D view
    pub particles: Option<usize>, // pool size, default 400
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub h0: f64,                // seconds advanced per frame
    pub gravity: f64,           // per-frame downward acceleration
    pub dampening: f64,         // global per-frame velocity multiplier
    pub air_resistance: f64,    // drag on the vertical velocity component
    pub floor_restitution: f64, // bounce energy kept on floor contact
    pub wall_restitution: f64,  // bounce energy kept on rim contact
    pub seed: u64,              // deterministic seed to make runs reproducible
}

/// Container geometry for a scenario
#[derive(Deserialize, Debug, Clone)]
pub struct VesselConfig {
    pub center: Vec<f64>,    // lateral center [x, y]
    pub radius: f64,         // rim radius (flat) or sphere radius (bowl)
    pub margin: Option<f64>, // rim inset, default 20
    pub depth: Option<f64>,  // angular depth of the bowl profile, default 0.15
}

/// Toss choreography timing and the externally-supplied number range.
/// Durations are milliseconds to match how the gesture is usually tuned.
#[derive(Deserialize, Debug, Clone)]
pub struct TossConfig {
    pub windup_ms: Option<f64>,     // default 150
    pub snap_ms: Option<f64>,       // default 300
    pub next_delay_min_ms: Option<f64>, // default 800
    pub next_delay_max_ms: Option<f64>, // default 1400
    pub settle_ms: Option<f64>,     // default 4000
    pub min_tosses: Option<u32>,    // default 3
    pub max_tosses: Option<u32>,    // default 4
    pub number_min: Option<i64>,    // default 10, normalized against number_max at use
    pub number_max: Option<i64>,    // default 99
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,         // engine-level configuration (dimension, pool size)
    pub parameters: ParametersConfig, // global numerical and physical parameters
    pub vessel: VesselConfig,         // container geometry
    pub toss: TossConfig,             // choreography timing and number range
}
