// Re-export glam for convenience
pub use glam::*;

// srt math types
mod aabb;
mod interval;
mod ray;
mod transform;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use transform::{Axis, Transform};

