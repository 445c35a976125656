//! Loosely-typed geometry records and their classification
//!
//! The compute service hands back records whose shape is only discoverable by
//! field presence. `RawRecord` models that wire shape; [`RawRecord::classify`]
//! turns it into the explicit [`GeometryRecord`] tagged union, validating at
//! the boundary so the rest of the pipeline can trust what it holds.

use crate::curve::{CurveSet, Polyline};
use crate::error::{Error, Result};
use crate::mesh::TriangleMesh;
use crate::point::Point3f;
use crate::point_set::PointSet;
use serde::{Deserialize, Serialize};

/// One geometry record as produced by the compute service, before
/// classification. All fields are optional; the combination present
/// determines the render variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub vertices: Option<Vec<[f32; 3]>>,
    #[serde(default)]
    pub faces: Option<Vec<[usize; 3]>>,
    #[serde(default)]
    pub curves: Option<Vec<Vec<[f32; 3]>>>,
}

/// A classified, validated geometry record
#[derive(Debug, Clone)]
pub enum GeometryRecord {
    Mesh(TriangleMesh),
    Curves(CurveSet),
    Points(PointSet),
}

fn to_points(raw: &[[f32; 3]]) -> Vec<Point3f> {
    raw.iter().map(|p| Point3f::new(p[0], p[1], p[2])).collect()
}

impl RawRecord {
    /// Classify this record into a render variant.
    ///
    /// Shapes are tested in priority order: mesh (vertices + at least one
    /// face), curve set, point set. Mesh face indices are validated here;
    /// a record matching no shape is an error the caller should skip.
    pub fn classify(&self) -> Result<GeometryRecord> {
        if let (Some(vertices), Some(faces)) = (&self.vertices, &self.faces) {
            if !vertices.is_empty() && !faces.is_empty() {
                let mesh = TriangleMesh::from_vertices_and_faces(to_points(vertices), faces.clone());
                mesh.validate_indices()?;
                return Ok(GeometryRecord::Mesh(mesh));
            }
        }

        if let Some(curves) = &self.curves {
            if !curves.is_empty() {
                let curves = curves
                    .iter()
                    .map(|c| Polyline::from_points(to_points(c)))
                    .collect();
                return Ok(GeometryRecord::Curves(CurveSet::from_curves(curves)));
            }
        }

        if let Some(vertices) = &self.vertices {
            if !vertices.is_empty() {
                return Ok(GeometryRecord::Points(PointSet::from_points(to_points(
                    vertices,
                ))));
            }
        }

        Err(Error::MalformedRecord(
            "record matches no known shape".to_string(),
        ))
    }
}

impl From<TriangleMesh> for GeometryRecord {
    fn from(mesh: TriangleMesh) -> Self {
        GeometryRecord::Mesh(mesh)
    }
}

impl From<CurveSet> for GeometryRecord {
    fn from(curves: CurveSet) -> Self {
        GeometryRecord::Curves(curves)
    }
}

impl From<PointSet> for GeometryRecord {
    fn from(points: PointSet) -> Self {
        GeometryRecord::Points(points)
    }
}
