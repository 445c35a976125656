//! Point set data structures

use crate::point::*;
use serde::{Deserialize, Serialize};

/// A set of discrete 3D points rendered as individual markers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointSet {
    pub points: Vec<Point3f>,
}

impl PointSet {
    /// Create a new empty point set
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a point set from a vector of points
    pub fn from_points(points: Vec<Point3f>) -> Self {
        Self { points }
    }

    /// Get the number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the point set is empty
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Add a point to the set
    pub fn push(&mut self, point: Point3f) {
        self.points.push(point);
    }

    /// Get an iterator over the points
    pub fn iter(&self) -> std::slice::Iter<Point3f> {
        self.points.iter()
    }
}
