//! Triangle mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices and faces
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Verify that every face index refers to an existing vertex.
    ///
    /// Downstream code indexes `vertices` without re-checking, so this runs
    /// once at the classification boundary.
    pub fn validate_indices(&self) -> Result<()> {
        let n = self.vertices.len();
        for (fi, face) in self.faces.iter().enumerate() {
            for &idx in face {
                if idx >= n {
                    return Err(Error::MalformedRecord(format!(
                        "face {} references vertex {} but mesh has {} vertices",
                        fi, idx, n
                    )));
                }
            }
        }
        Ok(())
    }

    /// Calculate face normals
    pub fn face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                let v0 = self.vertices[face[0]];
                let v1 = self.vertices[face[1]];
                let v2 = self.vertices[face[2]];

                let edge1 = v1 - v0;
                let edge2 = v2 - v0;

                edge1.cross(&edge2)
            })
            .collect()
    }

    /// Compute smooth per-vertex normals by accumulating area-weighted face
    /// normals. Vertices not referenced by any face get a +Z normal.
    pub fn vertex_normals(&self) -> Vec<Vector3f> {
        let mut normals = vec![Vector3f::zeros(); self.vertices.len()];
        for (face, normal) in self.faces.iter().zip(self.face_normals()) {
            for &idx in face {
                normals[idx] += normal;
            }
        }
        for normal in &mut normals {
            let len = normal.norm();
            if len > f32::EPSILON {
                *normal /= len;
            } else {
                *normal = Vector3f::new(0.0, 0.0, 1.0);
            }
        }
        normals
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
