//! Toss choreography state machine
//!
//! Drives the multi-toss gesture: vessel pose targets and particle launch
//! impulses across WindUp -> Snap -> Recovery phases, repeating until the
//! final toss steers the particles into a number instead of scattering
//! them.
//!
//! Phase transitions are deferred actions held in an explicit task queue of
//! `(fire_at, Phase)` entries keyed on the simulation clock, drained at the
//! top of each frame. A later phase always overwrites the pose and velocity
//! targets set by an earlier one, so an already-queued task is never
//! corrective and nothing needs cancelling. Triggers received while a
//! sequence is active are ignored outright; there is no mid-sequence abort
//! path.

use rand::Rng;

use crate::simulation::geometry::{Profile, Vessel};
use crate::simulation::params::Parameters;
use crate::simulation::shape;
use crate::simulation::states::System;

// Vessel gesture magnitudes. Presentation-scale values; physics never reads
// the pose.
const WINDUP_DIP: f64 = 8.0;
const WINDUP_TILT: f64 = 0.10;
const WINDUP_ROLL: f64 = 0.06;
const WINDUP_SWAY: f64 = 10.0;
const SNAP_LIFT: f64 = 22.0;
const SNAP_TILT: f64 = 0.22;
const SNAP_ROLL: f64 = 0.12;
const SNAP_SWAY: f64 = 16.0;

/// Gesture phase fired from the task queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    WindUp,
    Snap,
    Recovery,
    Settle,
}

#[derive(Debug, Clone, Copy)]
struct Task {
    fire_at: f64,
    phase: Phase,
}

/// Externally supplied number range, read only at the instant the final
/// toss fires. Missing values fall back to the defaults; the bounds are
/// order-normalized at use time.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl NumberRange {
    pub const DEFAULT_MIN: i64 = 10;
    pub const DEFAULT_MAX: i64 = 99;

    pub fn resolve(&self) -> (i64, i64) {
        let a = self.min.unwrap_or(Self::DEFAULT_MIN);
        let b = self.max.unwrap_or(Self::DEFAULT_MAX);
        (a.min(b), a.max(b))
    }

    /// Uniform draw over the resolved inclusive range.
    pub fn draw(&self, rng: &mut impl Rng) -> i64 {
        let (lo, hi) = self.resolve();
        rng.gen_range(lo..=hi)
    }
}

/// Timing and launch tunables for the toss gesture. Durations in seconds.
#[derive(Debug, Clone)]
pub struct TossTuning {
    pub windup: f64,         // WindUp duration before the snap fires
    pub snap: f64,           // Snap duration before recovery begins
    pub next_delay_min: f64, // randomized gap before the next toss
    pub next_delay_max: f64,
    pub settle: f64,         // delay after the final toss before Idle
    pub min_tosses: u32,     // inclusive range the final-toss ordinal is drawn from
    pub max_tosses: u32,
    pub spread_min: f64,     // outward launch speed range
    pub spread_max: f64,
    pub jitter: f64,         // uniform lateral launch noise amplitude
    pub launch_vz_min: f64,  // upward launch speed range
    pub launch_vz_max: f64,
    pub spin: f64,           // rotation-speed kick amplitude
    pub windup_rate: f64,    // pose ease rates per phase
    pub snap_rate: f64,
    pub recover_rate: f64,
    pub range: NumberRange,
}

impl Default for TossTuning {
    fn default() -> Self {
        Self {
            windup: 0.15,
            snap: 0.30,
            next_delay_min: 0.8,
            next_delay_max: 1.4,
            settle: 4.0,
            min_tosses: 3,
            max_tosses: 4,
            spread_min: 2.0,
            spread_max: 5.0,
            jitter: 1.0,
            launch_vz_min: 18.0,
            launch_vz_max: 28.0,
            spin: 0.25,
            windup_rate: 0.08,
            snap_rate: 0.25,
            recover_rate: 0.12,
            range: NumberRange::default(),
        }
    }
}

/// Toss sequence bookkeeping. One cohesive bundle, owned by the
/// choreographer and mutated nowhere else.
#[derive(Debug, Clone, Copy)]
pub struct TossState {
    pub active: bool,
    pub toss_count: u32,
    pub target_toss_count: u32, // ordinal of the final (shape-forming) toss
    pub direction: f64,         // +1 / -1, alternates per toss
}

impl Default for TossState {
    fn default() -> Self {
        Self {
            active: false,
            toss_count: 0,
            target_toss_count: 0,
            direction: 1.0,
        }
    }
}

pub struct Choreographer {
    pub tuning: TossTuning,
    pub state: TossState,
    /// Number drawn by the most recent final toss.
    pub last_number: Option<i64>,
    queue: Vec<Task>,
}

impl Choreographer {
    pub fn new(tuning: TossTuning) -> Self {
        Self {
            tuning,
            state: TossState::default(),
            last_number: None,
            queue: Vec::new(),
        }
    }

    /// External activate entry point (e.g. a click). Starts a fresh toss
    /// sequence, or does nothing if one is already running. Returns whether
    /// the trigger was accepted.
    pub fn trigger(&mut self, now: f64, rng: &mut impl Rng) -> bool {
        if self.state.active {
            return false;
        }
        self.state.active = true;
        self.state.toss_count = 0;
        self.state.target_toss_count = rng.gen_range(self.tuning.min_tosses..=self.tuning.max_tosses);
        self.state.direction = 1.0;
        self.schedule(now, Phase::WindUp);
        true
    }

    /// Number of queued phase transitions.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    fn schedule(&mut self, fire_at: f64, phase: Phase) {
        self.queue.push(Task { fire_at, phase });
    }

    /// Drain every task due at the current simulation clock, in firing
    /// order. Runs once per frame, before pose easing and integration.
    pub fn update(
        &mut self,
        sys: &mut System,
        vessel: &mut Vessel,
        params: &Parameters,
        rng: &mut impl Rng,
    ) {
        let now = sys.t;
        loop {
            // Earliest due task; stable for ties so same-instant tasks fire
            // in the order they were queued.
            let due = self
                .queue
                .iter()
                .enumerate()
                .filter(|(_, task)| task.fire_at <= now)
                .min_by(|(_, a), (_, b)| a.fire_at.total_cmp(&b.fire_at))
                .map(|(i, _)| i);
            let Some(i) = due else {
                break;
            };
            let task = self.queue.remove(i);
            self.fire(task.phase, now, sys, vessel, params, rng);
        }
    }

    fn fire(
        &mut self,
        phase: Phase,
        now: f64,
        sys: &mut System,
        vessel: &mut Vessel,
        params: &Parameters,
        rng: &mut impl Rng,
    ) {
        let dir = self.state.direction;
        match phase {
            Phase::WindUp => {
                // Dip and tilt away from the throw direction, slowly
                vessel.pose.retarget(
                    -WINDUP_DIP,
                    -WINDUP_TILT,
                    -WINDUP_ROLL * dir,
                    -WINDUP_SWAY * dir,
                    self.tuning.windup_rate,
                );
                self.schedule(now + self.tuning.windup, Phase::Snap);
            }
            Phase::Snap => {
                self.state.toss_count += 1;
                // Exaggerated lift and tilt toward the throw direction, fast
                vessel.pose.retarget(
                    SNAP_LIFT,
                    SNAP_TILT,
                    SNAP_ROLL * dir,
                    SNAP_SWAY * dir,
                    self.tuning.snap_rate,
                );
                if self.state.toss_count == self.state.target_toss_count {
                    self.launch_final(sys, vessel, params, rng);
                } else {
                    self.launch_scatter(sys, vessel, rng);
                }
                self.state.direction = -dir;
                self.schedule(now + self.tuning.snap, Phase::Recovery);
            }
            Phase::Recovery => {
                vessel.pose.retarget(0.0, 0.0, 0.0, 0.0, self.tuning.recover_rate);
                if self.state.toss_count >= self.state.target_toss_count {
                    self.schedule(now + self.tuning.settle, Phase::Settle);
                } else {
                    let (lo, hi) = (self.tuning.next_delay_min, self.tuning.next_delay_max);
                    let delay = if hi > lo { rng.gen_range(lo..hi) } else { lo };
                    self.schedule(now + delay, Phase::WindUp);
                }
            }
            Phase::Settle => {
                self.state.active = false;
                sys.forming = false;
            }
        }
    }

    /// Scatter launch: clear targets and fling every particle outward and
    /// up from the vessel center with randomized impulses.
    fn launch_scatter(&mut self, sys: &mut System, vessel: &Vessel, rng: &mut impl Rng) {
        let t = &self.tuning;
        for p in sys.particles.iter_mut() {
            p.target = None;

            let bearing = (p.pos.y - vessel.center.y).atan2(p.pos.x - vessel.center.x);
            let spread = rng.gen_range(t.spread_min..t.spread_max);
            p.vel.x = bearing.cos() * spread + rng.gen_range(-t.jitter..t.jitter);
            p.vel.y = bearing.sin() * spread + rng.gen_range(-t.jitter..t.jitter);
            p.vel.z = rng.gen_range(t.launch_vz_min..t.launch_vz_max);
            p.rotation_speed = rng.gen_range(-t.spin..t.spin);
        }
    }

    /// Final launch: draw the number, assign shuffled formation targets,
    /// enter shape-forming mode, and send every particle up. The bowl
    /// profile replaces the lateral impulse with the ballistic velocity
    /// that lands the arc on the target; a degenerate solve degrades that
    /// particle to an ordinary free launch.
    fn launch_final(
        &mut self,
        sys: &mut System,
        vessel: &Vessel,
        params: &Parameters,
        rng: &mut impl Rng,
    ) {
        let number = self.tuning.range.draw(rng);
        self.last_number = Some(number);

        let points = shape::number_points(number, vessel, rng);
        shape::assign_targets(sys, &points);
        sys.forming = true;

        let t = &self.tuning;
        for p in sys.particles.iter_mut() {
            let bearing = (p.pos.y - vessel.center.y).atan2(p.pos.x - vessel.center.x);
            let spread = rng.gen_range(t.spread_min..t.spread_max);
            p.vel.x = bearing.cos() * spread + rng.gen_range(-t.jitter..t.jitter);
            p.vel.y = bearing.sin() * spread + rng.gen_range(-t.jitter..t.jitter);
            p.vel.z = rng.gen_range(t.launch_vz_min..t.launch_vz_max);
            p.rotation_speed = rng.gen_range(-t.spin..t.spin);

            if let (Profile::Bowl { .. }, Some(target)) = (vessel.profile, p.target) {
                let target_z = vessel.rest_height((target - vessel.center).norm());
                match shape::ballistic_lateral(&p.pos, p.vel.z, target, target_z, params.gravity) {
                    Some(lateral) => {
                        p.vel.x = lateral.x;
                        p.vel.y = lateral.y;
                    }
                    // No valid flight time: leave this one scattered
                    None => p.target = None,
                }
            }
        }
    }
}
