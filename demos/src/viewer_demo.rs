//! Opens the interactive viewer on a synthetic towers-on-a-grid scene:
//! placeholder box meshes on a grid, connecting polylines, and corner
//! markers. Demonstrates the full interpret/render/camera loop without a
//! compute service.

use parascope_core::{CurveSet, GeometryRecord, Point3f, PointSet, Polyline, TriangleMesh};
use parascope_viewer::Viewer;

// Geometry is Z-up, matching the compute service's convention
fn tower(center_x: f32, center_y: f32, width: f32, depth: f32, height: f32) -> TriangleMesh {
    let (w, d) = (width / 2.0, depth / 2.0);
    let vertices = vec![
        Point3f::new(center_x - w, center_y - d, 0.0),
        Point3f::new(center_x + w, center_y - d, 0.0),
        Point3f::new(center_x + w, center_y + d, 0.0),
        Point3f::new(center_x - w, center_y + d, 0.0),
        Point3f::new(center_x - w, center_y - d, height),
        Point3f::new(center_x + w, center_y - d, height),
        Point3f::new(center_x + w, center_y + d, height),
        Point3f::new(center_x - w, center_y + d, height),
    ];
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2],
        [4, 5, 6],
        [4, 6, 7],
        [0, 1, 5],
        [0, 5, 4],
        [1, 2, 6],
        [1, 6, 5],
        [2, 3, 7],
        [2, 7, 6],
        [3, 0, 4],
        [3, 4, 7],
    ];
    TriangleMesh::from_vertices_and_faces(vertices, faces)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let spacing = 4000.0_f32;
    let mut records = Vec::new();

    // 3x3 grid of towers with varying heights
    for i in 0..3 {
        for j in 0..3 {
            let x = (i as f32 - 1.0) * spacing;
            let y = (j as f32 - 1.0) * spacing;
            let height = 2000.0 + 1500.0 * ((i * 3 + j) as f32);
            records.push(GeometryRecord::Mesh(tower(x, y, 2000.0, 2000.0, height)));
        }
    }

    // Connect the tower tops along one row
    let ridge = Polyline::from_points(vec![
        Point3f::new(-spacing, -spacing, 2000.0),
        Point3f::new(0.0, -spacing, 6500.0),
        Point3f::new(spacing, -spacing, 11000.0),
    ]);
    records.push(GeometryRecord::Curves(CurveSet {
        curves: vec![ridge],
    }));

    // Mark the grid corners
    let corners = PointSet {
        points: vec![
            Point3f::new(-spacing - 1500.0, -spacing - 1500.0, 0.0),
            Point3f::new(spacing + 1500.0, -spacing - 1500.0, 0.0),
            Point3f::new(spacing + 1500.0, spacing + 1500.0, 0.0),
            Point3f::new(-spacing - 1500.0, spacing + 1500.0, 0.0),
        ],
    };
    records.push(GeometryRecord::Points(corners));

    log::info!("displaying {} geometry records", records.len());

    let mut viewer = Viewer::new("parascope viewer demo")?;
    viewer.set_geometry(&records);
    viewer.run()?;

    Ok(())
}
