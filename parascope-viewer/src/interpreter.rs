//! Geometry interpretation: records to renderable primitives
//!
//! Each classified record expands into concrete primitives with a
//! deterministic palette color keyed by the record's position in the batch.
//! A mesh becomes a translucent surface plus a wireframe overlay, a curve set
//! becomes one line strip per polyline, a point set becomes one small sphere
//! marker per vertex. Per-record failures are logged and skipped; a bad
//! record never aborts the batch.

use parascope_core::{CurveSet, GeometryRecord, Point3f, PointSet, RawRecord, TriangleMesh};
use std::collections::BTreeSet;

/// Pastel palette cycled across the batch so successive objects stay
/// visually distinct without per-record color metadata.
pub const PALETTE: [[f32; 3]; 10] = [
    [0.557, 0.792, 0.902], // 0x8ecae6
    [0.129, 0.620, 0.737], // 0x219ebc
    [0.008, 0.188, 0.278], // 0x023047
    [1.000, 0.702, 0.729], // 0xffb3ba
    [1.000, 0.875, 0.729], // 0xffdfba
    [1.000, 1.000, 0.729], // 0xffffba
    [0.729, 1.000, 0.788], // 0xbaffc9
    [0.729, 0.882, 1.000], // 0xbae1ff
    [0.969, 0.839, 0.580], // 0xf7d794
    [0.910, 0.706, 0.796], // 0xe8b4cb
];

/// Surface translucency
pub const SURFACE_ALPHA: f32 = 0.9;

/// Wireframe overlay tone (neutral dark, mostly transparent)
pub const WIREFRAME_COLOR: [f32; 4] = [0.267, 0.267, 0.267, 0.2];

/// Point marker radius in world units
pub const MARKER_RADIUS: f32 = 50.0;

const MARKER_SEGMENTS: u32 = 8;
const MARKER_RINGS: u32 = 6;

/// Get the palette color for a record index
pub fn palette_color(index: usize) -> [f32; 3] {
    PALETTE[index % PALETTE.len()]
}

/// Render role of a primitive; determines pipeline and topology
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    /// Shaded triangle surface
    Surface,
    /// Mesh edge overlay, drawn as a line list
    Wireframe,
    /// Polyline, drawn as a line strip
    Line,
    /// Point marker sphere
    Marker,
}

/// One renderable primitive: plain CPU-side buffers plus a uniform color.
/// GPU residency is handled by the scene's renderable group.
#[derive(Debug, Clone)]
pub struct Primitive {
    pub kind: PrimitiveKind,
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals; empty for line primitives
    pub normals: Vec<[f32; 3]>,
    /// Empty means a non-indexed draw
    pub indices: Vec<u32>,
    pub color: [f32; 4],
}

impl Primitive {
    /// Bounding box over the primitive's positions
    pub fn bounding_box(&self) -> parascope_core::Aabb {
        let mut aabb = parascope_core::Aabb::empty();
        for p in &self.positions {
            aabb.grow(&Point3f::new(p[0], p[1], p[2]));
        }
        aabb
    }
}

fn surface_primitive(mesh: &TriangleMesh, color: [f32; 3]) -> Primitive {
    let positions = mesh.vertices.iter().map(|v| [v.x, v.y, v.z]).collect();
    let normals = mesh
        .vertex_normals()
        .iter()
        .map(|n| [n.x, n.y, n.z])
        .collect();
    let indices = mesh
        .faces
        .iter()
        .flat_map(|f| [f[0] as u32, f[1] as u32, f[2] as u32])
        .collect();
    Primitive {
        kind: PrimitiveKind::Surface,
        positions,
        normals,
        indices,
        color: [color[0], color[1], color[2], SURFACE_ALPHA],
    }
}

fn wireframe_primitive(mesh: &TriangleMesh) -> Primitive {
    // Unique undirected edges; interior edges shared by two faces are drawn once.
    let mut edges = BTreeSet::new();
    for face in &mesh.faces {
        for (a, b) in [(face[0], face[1]), (face[1], face[2]), (face[2], face[0])] {
            edges.insert((a.min(b), a.max(b)));
        }
    }
    let positions = mesh.vertices.iter().map(|v| [v.x, v.y, v.z]).collect();
    let indices = edges
        .into_iter()
        .flat_map(|(a, b)| [a as u32, b as u32])
        .collect();
    Primitive {
        kind: PrimitiveKind::Wireframe,
        positions,
        normals: Vec::new(),
        indices,
        color: WIREFRAME_COLOR,
    }
}

fn curve_primitives(curves: &CurveSet, color: [f32; 3]) -> Vec<Primitive> {
    curves
        .iter()
        .filter(|curve| curve.is_renderable())
        .map(|curve| Primitive {
            kind: PrimitiveKind::Line,
            positions: curve.points.iter().map(|p| [p.x, p.y, p.z]).collect(),
            normals: Vec::new(),
            indices: Vec::new(),
            color: [color[0], color[1], color[2], 1.0],
        })
        .collect()
}

/// Low-poly UV sphere centered at `center`
fn marker_primitive(center: &Point3f, color: [f32; 3]) -> Primitive {
    let mut positions = Vec::new();
    let mut normals = Vec::new();
    for ring in 0..=MARKER_RINGS {
        let phi = std::f32::consts::PI * ring as f32 / MARKER_RINGS as f32;
        for seg in 0..=MARKER_SEGMENTS {
            let theta = std::f32::consts::TAU * seg as f32 / MARKER_SEGMENTS as f32;
            let normal = [
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            ];
            positions.push([
                center.x + MARKER_RADIUS * normal[0],
                center.y + MARKER_RADIUS * normal[1],
                center.z + MARKER_RADIUS * normal[2],
            ]);
            normals.push(normal);
        }
    }
    let stride = MARKER_SEGMENTS + 1;
    let mut indices = Vec::new();
    for ring in 0..MARKER_RINGS {
        for seg in 0..MARKER_SEGMENTS {
            let a = ring * stride + seg;
            let b = a + stride;
            indices.extend([a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    Primitive {
        kind: PrimitiveKind::Marker,
        positions,
        normals,
        indices,
        color: [color[0], color[1], color[2], 1.0],
    }
}

fn point_primitives(points: &PointSet, color: [f32; 3]) -> Vec<Primitive> {
    points.iter().map(|p| marker_primitive(p, color)).collect()
}

/// Expand one classified record into its renderable primitives
pub fn interpret_record(record: &GeometryRecord, index: usize) -> Vec<Primitive> {
    let color = palette_color(index);
    match record {
        GeometryRecord::Mesh(mesh) => {
            vec![surface_primitive(mesh, color), wireframe_primitive(mesh)]
        }
        GeometryRecord::Curves(curves) => curve_primitives(curves, color),
        GeometryRecord::Points(points) => point_primitives(points, color),
    }
}

/// Interpret a batch of classified records in order
pub fn interpret_batch(records: &[GeometryRecord]) -> Vec<Primitive> {
    records
        .iter()
        .enumerate()
        .flat_map(|(index, record)| interpret_record(record, index))
        .collect()
}

/// Classify and interpret a batch of raw records.
///
/// Records that fail classification (malformed indices, unrecognized shape)
/// are logged with their batch position and skipped.
pub fn interpret_raw_batch(records: &[RawRecord]) -> Vec<Primitive> {
    let mut primitives = Vec::new();
    for (index, raw) in records.iter().enumerate() {
        match raw.classify() {
            Ok(record) => primitives.extend(interpret_record(&record, index)),
            Err(e) => {
                log::warn!("skipping record {}: {} ({:?})", index, e, raw);
            }
        }
    }
    primitives
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use parascope_core::Polyline;

    fn triangle_mesh() -> GeometryRecord {
        GeometryRecord::Mesh(TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        ))
    }

    #[test]
    fn mesh_yields_surface_plus_wireframe() {
        let primitives = interpret_record(&triangle_mesh(), 0);
        assert_eq!(primitives.len(), 2);
        assert_eq!(primitives[0].kind, PrimitiveKind::Surface);
        assert_eq!(primitives[1].kind, PrimitiveKind::Wireframe);

        let aabb = primitives[0].bounding_box();
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn wireframe_deduplicates_shared_edges() {
        // Two triangles sharing one edge: 5 unique edges, not 6.
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        );
        let wire = wireframe_primitive(&mesh);
        assert_eq!(wire.indices.len(), 5 * 2);
    }

    #[test]
    fn two_point_curve_yields_one_line() {
        let record = GeometryRecord::Curves(CurveSet::from_curves(vec![Polyline::from_points(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)],
        )]));
        let primitives = interpret_record(&record, 0);
        assert_eq!(primitives.len(), 1);
        assert_eq!(primitives[0].kind, PrimitiveKind::Line);
        assert_eq!(primitives[0].positions.len(), 2);
    }

    #[test]
    fn degenerate_curves_are_skipped() {
        let record = GeometryRecord::Curves(CurveSet::from_curves(vec![
            Polyline::from_points(vec![Point3::new(0.0, 0.0, 0.0)]),
            Polyline::from_points(vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
            ]),
        ]));
        assert_eq!(interpret_record(&record, 0).len(), 1);
    }

    #[test]
    fn point_set_yields_one_marker_per_vertex() {
        let record = GeometryRecord::Points(PointSet::from_points(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(100.0, 0.0, 0.0),
        ]));
        let primitives = interpret_record(&record, 0);
        assert_eq!(primitives.len(), 2);
        assert!(primitives
            .iter()
            .all(|p| p.kind == PrimitiveKind::Marker));

        // Marker sits on its vertex.
        let center = primitives[1].bounding_box().center();
        assert!((center.x - 100.0).abs() < 1e-3);
    }

    #[test]
    fn malformed_record_is_skipped_without_panic() {
        let records = vec![RawRecord {
            vertices: Some(vec![[0.0, 0.0, 0.0]]),
            faces: Some(vec![[0, 5, 9]]),
            curves: None,
        }];
        assert!(interpret_raw_batch(&records).is_empty());
    }

    #[test]
    fn bad_record_does_not_abort_batch() {
        let records = vec![
            RawRecord {
                vertices: Some(vec![[0.0, 0.0, 0.0]]),
                faces: Some(vec![[0, 5, 9]]),
                curves: None,
            },
            RawRecord {
                vertices: Some(vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]),
                faces: Some(vec![[0, 1, 2]]),
                curves: None,
            },
        ];
        let primitives = interpret_raw_batch(&records);
        assert_eq!(primitives.len(), 2);
    }

    #[test]
    fn palette_cycles() {
        assert_eq!(palette_color(0), palette_color(10));
        assert_ne!(palette_color(0), palette_color(1));
    }

    #[test]
    fn batch_colors_follow_record_order() {
        let records = vec![triangle_mesh(), triangle_mesh()];
        let primitives = interpret_batch(&records);
        assert_eq!(primitives.len(), 4);
        assert_eq!(primitives[0].color[..3], palette_color(0));
        assert_eq!(primitives[2].color[..3], palette_color(1));
    }
}
