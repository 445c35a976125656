//! Headless walkthrough of the compute pipeline: a canned service response
//! goes through parsing, placeholder decoding, and primitive interpretation,
//! with a summary printed at each stage. No window or GPU required.

use parascope_compute::{ComputeClient, ComputeTransport, GenerationParams, PlaceholderDecoder};
use parascope_core::Result;
use parascope_viewer::{interpret_batch, PrimitiveKind};

const CANNED_RESPONSE: &str = r#"{
    "success": true,
    "message": "solved in 412ms",
    "data": {
        "values": [
            {
                "ParamName": "RH_OUT:towers",
                "InnerTree": {
                    "{0;0}": [
                        {"type": "Rhino.Geometry.Mesh", "data": "<opaque>"},
                        {"type": "Rhino.Geometry.Mesh", "data": "<opaque>"},
                        {"type": "Rhino.Geometry.Mesh", "data": "<opaque>"}
                    ],
                    "{0;1}": [
                        {"type": "Rhino.Geometry.Brep", "data": "<opaque>"}
                    ]
                }
            }
        ]
    }
}"#;

struct CannedTransport;

impl ComputeTransport for CannedTransport {
    fn post(&self, _body: &str) -> Result<String> {
        Ok(CANNED_RESPONSE.to_string())
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let params = GenerationParams::default();
    println!("parameters: {:?}", params);

    let client = ComputeClient::new(CannedTransport, PlaceholderDecoder::from_params(&params));
    let records = client.generate(&params)?;
    println!("decoded {} geometry records", records.len());

    let primitives = interpret_batch(&records);
    let surfaces = primitives
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Surface)
        .count();
    let wireframes = primitives
        .iter()
        .filter(|p| p.kind == PrimitiveKind::Wireframe)
        .count();
    println!(
        "interpreted {} primitives ({} surfaces, {} wireframes)",
        primitives.len(),
        surfaces,
        wireframes
    );

    for (i, primitive) in primitives.iter().enumerate() {
        println!(
            "  [{}] {:?}: {} vertices, {} indices, color {:?}",
            i,
            primitive.kind,
            primitive.positions.len(),
            primitive.indices.len(),
            primitive.color
        );
    }

    Ok(())
}
