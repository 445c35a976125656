//! Polyline and curve-set data structures

use crate::point::*;
use serde::{Deserialize, Serialize};

/// An ordered sequence of points forming a polyline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point3f>,
}

impl Polyline {
    /// Create a polyline from a vector of points
    pub fn from_points(points: Vec<Point3f>) -> Self {
        Self { points }
    }

    /// Get the number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the polyline has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A polyline needs at least two points to produce a visible segment
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 2
    }
}

/// A collection of polylines treated as one renderable object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurveSet {
    pub curves: Vec<Polyline>,
}

impl CurveSet {
    /// Create a curve set from a vector of polylines
    pub fn from_curves(curves: Vec<Polyline>) -> Self {
        Self { curves }
    }

    /// Get the number of curves
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Check if the curve set is empty
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Iterate over the curves
    pub fn iter(&self) -> std::slice::Iter<Polyline> {
        self.curves.iter()
    }
}
