//! Scene assembly: lighting rig, helpers, and the geometry group

use crate::group::{RenderableGroup, RenderedPrimitive};
use crate::interpreter::{interpret_batch, interpret_raw_batch, Primitive, PrimitiveKind};
use parascope_core::{Aabb, GeometryRecord, RawRecord};

/// Ground grid span and line count
const GRID_SPAN: f32 = 20_000.0;
const GRID_DIVISIONS: u32 = 20;
const GRID_CENTER_COLOR: [f32; 4] = [0.533, 0.533, 0.533, 1.0];
const GRID_LINE_COLOR: [f32; 4] = [0.8, 0.8, 0.8, 1.0];

/// Axis indicator length
const AXIS_LENGTH: f32 = 5_000.0;

/// A directional light at a fixed position, aimed at the origin
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: [f32; 3],
    pub intensity: f32,
    pub cast_shadows: bool,
}

/// Fixed lighting rig: one ambient term and two directional lights
#[derive(Debug, Clone, Copy)]
pub struct LightRig {
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub key: DirectionalLight,
    pub fill: DirectionalLight,
}

impl Default for LightRig {
    fn default() -> Self {
        Self {
            ambient_color: [0.251, 0.251, 0.251],
            ambient_intensity: 0.6,
            key: DirectionalLight {
                position: [10_000.0, 15_000.0, -5_000.0],
                intensity: 0.8,
                cast_shadows: true,
            },
            fill: DirectionalLight {
                position: [-10_000.0, 8_000.0, 5_000.0],
                intensity: 0.4,
                cast_shadows: false,
            },
        }
    }
}

fn line_primitive(segments: Vec<([f32; 3], [f32; 3])>, color: [f32; 4]) -> Primitive {
    let mut positions = Vec::with_capacity(segments.len() * 2);
    for (a, b) in segments {
        positions.push(a);
        positions.push(b);
    }
    Primitive {
        kind: PrimitiveKind::Wireframe,
        positions,
        normals: Vec::new(),
        indices: Vec::new(),
        color,
    }
}

/// Two-tone ground grid in the XY plane (the compute service's geometry is
/// Z-up); center lines use the darker tone.
fn grid_primitives() -> Vec<Primitive> {
    let half = GRID_SPAN / 2.0;
    let step = GRID_SPAN / GRID_DIVISIONS as f32;

    let mut center = Vec::new();
    let mut rest = Vec::new();
    for i in 0..=GRID_DIVISIONS {
        let offset = -half + i as f32 * step;
        let lines = [
            ([-half, offset, 0.0], [half, offset, 0.0]),
            ([offset, -half, 0.0], [offset, half, 0.0]),
        ];
        if offset == 0.0 {
            center.extend(lines);
        } else {
            rest.extend(lines);
        }
    }

    vec![
        line_primitive(rest, GRID_LINE_COLOR),
        line_primitive(center, GRID_CENTER_COLOR),
    ]
}

/// Colored axis indicator lines from the origin
fn axis_primitives() -> Vec<Primitive> {
    vec![
        line_primitive(
            vec![([0.0; 3], [AXIS_LENGTH, 0.0, 0.0])],
            [1.0, 0.0, 0.0, 1.0],
        ),
        line_primitive(
            vec![([0.0; 3], [0.0, AXIS_LENGTH, 0.0])],
            [0.0, 1.0, 0.0, 1.0],
        ),
        line_primitive(
            vec![([0.0; 3], [0.0, 0.0, AXIS_LENGTH])],
            [0.0, 0.0, 1.0, 1.0],
        ),
    ]
}

/// The viewer's 3D scene: background, lights, helper geometry, and the
/// exclusive group of generated primitives.
#[derive(Debug)]
pub struct Scene {
    pub background: [f64; 4],
    pub lights: LightRig,
    helpers: Vec<RenderedPrimitive>,
    pub group: RenderableGroup,
}

impl Scene {
    pub fn new() -> Self {
        let helpers = grid_primitives()
            .into_iter()
            .chain(axis_primitives())
            .map(RenderedPrimitive::new)
            .collect();
        Self {
            background: [0.961, 0.961, 0.961, 1.0],
            lights: LightRig::default(),
            helpers,
            group: RenderableGroup::new(),
        }
    }

    /// Replace the displayed geometry with a batch of classified records.
    ///
    /// Returns the new batch's bounding box (empty when nothing rendered) so
    /// the caller can decide whether to reframe the camera.
    pub fn set_geometry(&mut self, records: &[GeometryRecord]) -> Aabb {
        self.install(interpret_batch(records))
    }

    /// Replace the displayed geometry with a batch of raw records, skipping
    /// and logging any that fail classification.
    pub fn set_raw_geometry(&mut self, records: &[RawRecord]) -> Aabb {
        self.install(interpret_raw_batch(records))
    }

    fn install(&mut self, primitives: Vec<Primitive>) -> Aabb {
        log::info!("scene geometry replaced: {} primitives", primitives.len());
        self.group.replace(primitives);
        self.group.bounding_box()
    }

    /// Helper geometry (grid and axes), for the renderer
    pub fn helpers_mut(&mut self) -> std::slice::IterMut<RenderedPrimitive> {
        self.helpers.iter_mut()
    }

    pub fn helpers(&self) -> std::slice::Iter<RenderedPrimitive> {
        self.helpers.iter()
    }

    /// Release every GPU resource owned by the scene
    pub fn dispose(&mut self) {
        self.group.clear();
        for helper in &mut self.helpers {
            helper.dispose();
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use parascope_core::TriangleMesh;

    fn triangle_record() -> GeometryRecord {
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
    fn set_geometry_returns_batch_bounds() {
        let mut scene = Scene::new();
        let aabb = scene.set_geometry(&[triangle_record()]);
        assert_eq!(aabb.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Point3::new(1.0, 1.0, 0.0));
        assert_eq!(scene.group.len(), 2);
    }

    #[test]
    fn empty_batch_yields_empty_bounds() {
        let mut scene = Scene::new();
        scene.set_geometry(&[triangle_record()]);
        let aabb = scene.set_geometry(&[]);
        assert!(aabb.is_empty());
        assert!(scene.group.is_empty());
    }

    #[test]
    fn regeneration_replaces_previous_batch() {
        let mut scene = Scene::new();
        for _ in 0..3 {
            scene.set_geometry(&[triangle_record()]);
            assert_eq!(scene.group.len(), 2);
        }
    }

    #[test]
    fn malformed_raw_record_is_skipped() {
        let mut scene = Scene::new();
        let aabb = scene.set_raw_geometry(&[RawRecord {
            vertices: Some(vec![[0.0, 0.0, 0.0]]),
            faces: Some(vec![[0, 5, 9]]),
            curves: None,
        }]);
        assert!(aabb.is_empty());
        assert_eq!(scene.group.len(), 0);
    }

    #[test]
    fn scene_has_grid_and_axes_helpers() {
        let scene = Scene::new();
        // Two grid tones plus three axis lines.
        assert_eq!(scene.helpers().len(), 5);
    }
}
