//! Generation parameters sent to the compute service

use serde::{Deserialize, Serialize};

/// The flat numeric parameter set driving the parametric definition.
///
/// Counts are integral, distances are world units (millimeters).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    pub x_count: u32,
    pub y_count: u32,
    pub height: f64,
    pub x_grid: f64,
    pub y_grid: f64,
    pub z_height: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            x_count: 11,
            y_count: 14,
            height: 690.0,
            x_grid: 10800.0,
            y_grid: 10800.0,
            z_height: 9000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_as_flat_map() {
        let json = serde_json::to_value(GenerationParams::default()).unwrap();
        assert_eq!(json["x_count"], 11);
        assert_eq!(json["height"], 690.0);
        assert!(json.as_object().unwrap().len() == 6);
    }

    #[test]
    fn round_trips() {
        let params = GenerationParams {
            x_count: 3,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        let back: GenerationParams = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
