//! Vessel geometry and animated pose
//!
//! Defines the container the particles live in:
//! - `Profile` – flat circular pan or spherical-cap bowl
//! - `Vessel`  – center, radius, rim margin, profile, and the animated pose
//! - `VesselPose` – lift/tilt/roll/sway channels, each a damped pursuit of
//!   a target value set by the toss choreographer
//!
//! The boundary test and resting surface are pure functions of the geometry
//! parameters. The pose is presentation-only: physics runs in the vessel's
//! rest frame and never reads it.

use crate::simulation::states::NVec2;

/// Depth profile of the vessel interior.
#[derive(Debug, Clone, Copy)]
pub enum Profile {
    /// Flat-bottomed circular boundary: resting height 0 everywhere,
    /// constant allowed radius.
    Flat,
    /// Spherical-cap bowl of sphere radius `radius` and angular depth
    /// `depth`: bottom at `-radius * sin(depth * PI)`, rim in the z = 0
    /// plane, walls curving inward below the rim.
    Bowl { depth: f64 },
}

#[derive(Debug, Clone)]
pub struct Vessel {
    pub center: NVec2, // lateral center
    pub radius: f64,   // rim radius (flat) or sphere radius (bowl)
    pub margin: f64,   // rim inset particles may not cross
    pub profile: Profile,
    pub pose: VesselPose,
}

impl Vessel {
    pub fn new(center: NVec2, radius: f64, margin: f64, profile: Profile) -> Self {
        Self {
            center,
            radius,
            margin,
            profile,
            pose: VesselPose::default(),
        }
    }

    /// Height of the sphere center above the rim plane (bowl only).
    fn sphere_center_height(&self, depth: f64) -> f64 {
        self.radius * (1.0 - (depth * std::f64::consts::PI).sin())
    }

    /// Resting surface height at radial distance `dist` from the center.
    pub fn rest_height(&self, dist: f64) -> f64 {
        match self.profile {
            Profile::Flat => 0.0,
            Profile::Bowl { depth } => {
                let zc = self.sphere_center_height(depth);
                let d = dist.min(self.rim_radius());
                zc - (self.radius * self.radius - d * d).sqrt()
            }
        }
    }

    /// Lateral radius of the rim circle (where the interior meets z = 0).
    pub fn rim_radius(&self) -> f64 {
        match self.profile {
            Profile::Flat => self.radius,
            Profile::Bowl { depth } => {
                let zc = self.sphere_center_height(depth);
                (self.radius * self.radius - zc * zc).max(0.0).sqrt()
            }
        }
    }

    /// Maximum allowed radial distance from the center at height `z`.
    /// Constant for the flat profile; shrinks as a particle sinks below the
    /// rim of a bowl. Airborne particles (z above the rim) get the rim
    /// allowance. Below the rim the shell itself is the bound and the rim
    /// margin does not apply: a particle resting on the shell at radial
    /// distance `d` sits exactly at `allowed_radius(rest_height(d)) == d`.
    pub fn allowed_radius(&self, z: f64) -> f64 {
        match self.profile {
            Profile::Flat => (self.radius - self.margin).max(0.0),
            Profile::Bowl { depth } => {
                if z >= 0.0 {
                    (self.rim_radius() - self.margin).max(0.0)
                } else {
                    let zc = self.sphere_center_height(depth);
                    let dz = (z - zc).clamp(-self.radius, self.radius);
                    (self.radius * self.radius - dz * dz).sqrt()
                }
            }
        }
    }

    /// Largest radial distance at which a particle can rest.
    pub fn rest_radius(&self) -> f64 {
        (self.rim_radius() - self.margin).max(0.0)
    }
}

/// One animated pose value: the current value chases the target with
/// exponential ease, `current += (target - current) * rate` per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoseChannel {
    pub current: f64,
    pub target: f64,
}

impl PoseChannel {
    fn ease(&mut self, rate: f64) {
        self.current += (self.target - self.current) * rate;
    }
}

/// Animated gesture pose of the vessel. Targets are written only by the
/// toss choreographer; `ease` runs once per frame before integration.
#[derive(Debug, Clone)]
pub struct VesselPose {
    pub lift: PoseChannel, // vertical offset of the whole vessel
    pub tilt: PoseChannel, // pitch toward/away from the viewer
    pub roll: PoseChannel, // rotation about the viewing axis
    pub sway: PoseChannel, // lateral offset along the throw direction
    pub rate: f64,         // ease rate for the current gesture phase
}

impl Default for VesselPose {
    fn default() -> Self {
        Self {
            lift: PoseChannel::default(),
            tilt: PoseChannel::default(),
            roll: PoseChannel::default(),
            sway: PoseChannel::default(),
            rate: 0.1,
        }
    }
}

impl VesselPose {
    pub fn ease(&mut self) {
        let rate = self.rate;
        self.lift.ease(rate);
        self.tilt.ease(rate);
        self.roll.ease(rate);
        self.sway.ease(rate);
    }

    /// Retarget all four channels at once with a new ease rate.
    pub fn retarget(&mut self, lift: f64, tilt: f64, roll: f64, sway: f64, rate: f64) {
        self.lift.target = lift;
        self.tilt.target = tilt;
        self.roll.target = roll;
        self.sway.target = sway;
        self.rate = rate;
    }
}
