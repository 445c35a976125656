//! Axis-aligned bounding boxes and the `Bounded` trait

use crate::curve::CurveSet;
use crate::mesh::TriangleMesh;
use crate::point::*;
use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box.
///
/// The empty box has `min > max` on every axis so that growing it by any
/// point produces a valid box around that point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Point3f,
    pub max: Point3f,
}

impl Aabb {
    /// The canonical empty box
    pub fn empty() -> Self {
        Self {
            min: Point3f::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Point3f::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    /// Build the bounding box of a point iterator
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3f>,
    {
        let mut aabb = Self::empty();
        for p in points {
            aabb.grow(p);
        }
        aabb
    }

    /// Expand the box to contain a point
    pub fn grow(&mut self, p: &Point3f) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);

        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Merge another box into this one
    pub fn merge(&mut self, other: &Aabb) {
        if other.is_empty() {
            return;
        }
        self.grow(&other.min);
        self.grow(&other.max);
    }

    /// True when the box contains no points
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Get the center point of the box
    pub fn center(&self) -> Point3f {
        Point3f::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
            (self.min.z + self.max.z) / 2.0,
        )
    }

    /// Get the extents of the box along each axis
    pub fn size(&self) -> Vector3f {
        self.max - self.min
    }

    /// Get the largest extent across the three axes
    pub fn max_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}

/// Trait for objects with a spatial extent
pub trait Bounded {
    /// Get the bounding box of the object
    fn bounding_box(&self) -> Aabb;

    /// Get the center point of the object
    fn center(&self) -> Point3f {
        self.bounding_box().center()
    }
}

impl Bounded for TriangleMesh {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }
}

impl Bounded for PointSet {
    fn bounding_box(&self) -> Aabb {
        Aabb::from_points(&self.points)
    }
}

impl Bounded for CurveSet {
    fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for curve in &self.curves {
            for p in &curve.points {
                aabb.grow(p);
            }
        }
        aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn empty_box_reports_empty() {
        assert!(Aabb::empty().is_empty());
    }

    #[test]
    fn grow_produces_point_box() {
        let mut aabb = Aabb::empty();
        aabb.grow(&Point3::new(100.0, 0.0, 0.0));
        assert!(!aabb.is_empty());
        assert_eq!(aabb.center(), Point3::new(100.0, 0.0, 0.0));
        assert_eq!(aabb.max_dimension(), 0.0);
    }

    #[test]
    fn merge_with_empty_is_identity() {
        let mut aabb = Aabb::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 3.0),
        ]);
        let before = aabb;
        aabb.merge(&Aabb::empty());
        assert_eq!(aabb, before);
    }

    #[test]
    fn mesh_bounding_box_matches_vertices() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let aabb = mesh.bounding_box();
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn max_dimension_picks_largest_axis() {
        let aabb = Aabb::from_points(&[
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 5.0, 1.0),
        ]);
        assert_eq!(aabb.max_dimension(), 5.0);
    }
}
