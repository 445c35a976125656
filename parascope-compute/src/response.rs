//! Compute-service response shape
//!
//! Only the JSON shape this tool consumes is modeled: a success flag, an
//! optional message, and on success a payload whose `values[].InnerTree`
//! holds nested collections of opaque geometry-bearing items.

use parascope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One opaque geometry-bearing item inside an inner tree branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeItem {
    #[serde(rename = "type")]
    pub type_name: String,
    pub data: serde_json::Value,
}

/// One output parameter of the parametric definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamValue {
    #[serde(rename = "ParamName")]
    pub param_name: String,
    /// Branch path (e.g. `"{0;0}"`) to the items on that branch
    #[serde(rename = "InnerTree", default)]
    pub inner_tree: BTreeMap<String, Vec<TreeItem>>,
}

/// The `data` payload present on successful responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeData {
    #[serde(default)]
    pub values: Vec<ParamValue>,
}

/// Top-level response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<ComputeData>,
}

impl ComputeResponse {
    /// Parse a response body, mapping a failure flag to `Error::Compute`.
    pub fn parse(body: &str) -> Result<Self> {
        let response: ComputeResponse = serde_json::from_str(body)?;
        if !response.success {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "generation failed".to_string());
            return Err(Error::Compute(message));
        }
        Ok(response)
    }

    /// Iterate over every tree item across all output parameters and branches
    pub fn items(&self) -> impl Iterator<Item = &TreeItem> {
        self.data
            .iter()
            .flat_map(|data| data.values.iter())
            .flat_map(|value| value.inner_tree.values())
            .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUCCESS_BODY: &str = r#"{
        "success": true,
        "message": "Generation completed successfully",
        "data": {
            "values": [
                {
                    "ParamName": "columns",
                    "InnerTree": {
                        "{0;0}": [
                            {"type": "Rhino.Geometry.Brep", "data": "base64..."},
                            {"type": "Rhino.Geometry.Brep", "data": "base64..."}
                        ],
                        "{0;1}": [
                            {"type": "Rhino.Geometry.Brep", "data": "base64..."}
                        ]
                    }
                }
            ]
        }
    }"#;

    #[test]
    fn parses_success_response() {
        let response = ComputeResponse::parse(SUCCESS_BODY).unwrap();
        assert_eq!(response.items().count(), 3);
        let data = response.data.unwrap();
        assert_eq!(data.values[0].param_name, "columns");
    }

    #[test]
    fn failure_flag_maps_to_compute_error() {
        let body = r#"{"success": false, "message": "Failed to generate geometry"}"#;
        match ComputeResponse::parse(body) {
            Err(Error::Compute(message)) => {
                assert_eq!(message, "Failed to generate geometry")
            }
            other => panic!("expected compute error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_body_maps_to_json_error() {
        assert!(matches!(
            ComputeResponse::parse("not json"),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn missing_data_yields_no_items() {
        let response = ComputeResponse::parse(r#"{"success": true}"#).unwrap();
        assert_eq!(response.items().count(), 0);
    }
}
