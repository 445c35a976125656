//! Geometry decoding seam
//!
//! The service encodes geometry in its own native format; decoding it is an
//! external concern supplied through [`GeometryDecoder`]. The shipped
//! [`PlaceholderDecoder`] substitutes a parametrically sized box per item,
//! which is exactly what this tool renders until a real decoder is plugged in.

use crate::params::GenerationParams;
use crate::response::{ComputeResponse, TreeItem};
use parascope_core::{GeometryRecord, Point3f, Result, TriangleMesh};

/// Decodes one opaque tree item into zero or more geometry records
pub trait GeometryDecoder {
    fn decode(&self, item: &TreeItem) -> Result<Vec<GeometryRecord>>;
}

/// Stand-in decoder producing one axis-aligned box per tree item.
#[derive(Debug, Clone)]
pub struct PlaceholderDecoder {
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl PlaceholderDecoder {
    pub fn new(width: f32, depth: f32, height: f32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Size the placeholder from the generation parameters so the stand-in
    /// roughly matches the extent of the real output.
    pub fn from_params(params: &GenerationParams) -> Self {
        Self::new(
            params.x_grid as f32,
            params.y_grid as f32,
            params.z_height as f32,
        )
    }

    fn box_mesh(&self) -> TriangleMesh {
        let (w, d, h) = (self.width / 2.0, self.depth / 2.0, self.height);
        let vertices = vec![
            Point3f::new(-w, -d, 0.0),
            Point3f::new(w, -d, 0.0),
            Point3f::new(w, d, 0.0),
            Point3f::new(-w, d, 0.0),
            Point3f::new(-w, -d, h),
            Point3f::new(w, -d, h),
            Point3f::new(w, d, h),
            Point3f::new(-w, d, h),
        ];
        let faces = vec![
            // bottom
            [0, 2, 1],
            [0, 3, 2],
            // top
            [4, 5, 6],
            [4, 6, 7],
            // sides
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
}

impl Default for PlaceholderDecoder {
    fn default() -> Self {
        Self::from_params(&GenerationParams::default())
    }
}

impl GeometryDecoder for PlaceholderDecoder {
    fn decode(&self, _item: &TreeItem) -> Result<Vec<GeometryRecord>> {
        Ok(vec![GeometryRecord::Mesh(self.box_mesh())])
    }
}

/// Run every tree item of a response through the decoder, collecting the
/// records. A failing item is logged and skipped; it never aborts the batch.
pub fn records_from_response(
    response: &ComputeResponse,
    decoder: &dyn GeometryDecoder,
) -> Vec<GeometryRecord> {
    let mut records = Vec::new();
    for (index, item) in response.items().enumerate() {
        match decoder.decode(item) {
            Ok(decoded) => records.extend(decoded),
            Err(e) => {
                log::warn!(
                    "skipping undecodable item {} (type {}): {}",
                    index,
                    item.type_name,
                    e
                );
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use parascope_core::{Bounded, Error};

    fn item() -> TreeItem {
        TreeItem {
            type_name: "Rhino.Geometry.Brep".to_string(),
            data: serde_json::Value::String("base64...".to_string()),
        }
    }

    #[test]
    fn placeholder_box_is_well_formed() {
        let decoder = PlaceholderDecoder::new(10.0, 20.0, 30.0);
        let records = decoder.decode(&item()).unwrap();
        assert_eq!(records.len(), 1);
        let GeometryRecord::Mesh(mesh) = &records[0] else {
            panic!("expected mesh");
        };
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert!(mesh.validate_indices().is_ok());

        let aabb = mesh.bounding_box();
        assert_eq!(aabb.size().x, 10.0);
        assert_eq!(aabb.size().y, 20.0);
        assert_eq!(aabb.size().z, 30.0);
        assert_eq!(aabb.min.z, 0.0);
    }

    #[test]
    fn failing_items_are_skipped() {
        struct FailingDecoder;
        impl GeometryDecoder for FailingDecoder {
            fn decode(&self, _item: &TreeItem) -> Result<Vec<GeometryRecord>> {
                Err(Error::MalformedRecord("unreadable".to_string()))
            }
        }

        let body = r#"{
            "success": true,
            "data": {"values": [{
                "ParamName": "columns",
                "InnerTree": {"{0}": [{"type": "t", "data": null}]}
            }]}
        }"#;
        let response = ComputeResponse::parse(body).unwrap();
        let records = records_from_response(&response, &FailingDecoder);
        assert!(records.is_empty());
    }

    #[test]
    fn one_record_per_item() {
        let body = r#"{
            "success": true,
            "data": {"values": [{
                "ParamName": "columns",
                "InnerTree": {
                    "{0}": [{"type": "t", "data": null}, {"type": "t", "data": null}]
                }
            }]}
        }"#;
        let response = ComputeResponse::parse(body).unwrap();
        let records = records_from_response(&response, &PlaceholderDecoder::default());
        assert_eq!(records.len(), 2);
    }
}
