//! Core data structures for parascope
//!
//! This crate provides the geometry data model shared by the compute-service
//! boundary and the interactive viewer: triangle meshes, curve sets, point
//! sets, bounding volumes, and the loosely-typed records the compute service
//! produces.

pub mod bounds;
pub mod curve;
pub mod error;
pub mod mesh;
pub mod point;
pub mod point_set;
pub mod record;

pub use bounds::*;
pub use curve::*;
pub use error::*;
pub use mesh::*;
pub use point::*;
pub use point_set::*;
pub use record::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix4, Point3, Vector3};
