//! High-level runtime engine settings
//!
//! Selects the vessel dimension (flat 2D view vs bowl 3D view) and the
//! particle pool size used when building and running a `Scenario`

#[derive(Debug, Clone)]
pub struct Engine {
    pub dimension: bool,  // false = flat vessel / 2D view, true = bowl vessel / 3D view
    pub particles: usize, // fixed pool size
}
