//! Shared value types used by the format decoders

mod bounds;
mod color;
mod vector;

pub use bounds::{BoundingBox2D, BoundingBox3D, ValueRange};
pub use color::PointColor;
pub use vector::{Vector2, Vector3};
