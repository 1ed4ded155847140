pub mod vis2d;
pub mod vis3d;
