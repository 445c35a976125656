//! Compute client orchestration

use crate::decode::{records_from_response, GeometryDecoder};
use crate::params::GenerationParams;
use crate::response::ComputeResponse;
use parascope_core::{GeometryRecord, Result};

/// Transport seam: turns a request body into a response body.
///
/// The wire protocol is the service's concern; callers inject whatever HTTP
/// stack their host application already uses.
pub trait ComputeTransport {
    fn post(&self, body: &str) -> Result<String>;
}

/// Client tying parameters, transport, and decoding together.
///
/// One call to [`generate`](ComputeClient::generate) is fire-and-forget from
/// the viewer's perspective: it returns a fully materialized batch of records
/// or an error, never partial results.
pub struct ComputeClient<T, D> {
    transport: T,
    decoder: D,
}

impl<T: ComputeTransport, D: GeometryDecoder> ComputeClient<T, D> {
    pub fn new(transport: T, decoder: D) -> Self {
        Self { transport, decoder }
    }

    /// Run the parametric definition and return the decoded geometry batch.
    ///
    /// Request-level failures (transport errors, a failure flag in the
    /// response) propagate; per-item decode failures are logged and skipped.
    pub fn generate(&self, params: &GenerationParams) -> Result<Vec<GeometryRecord>> {
        let body = serde_json::to_string(params)?;
        log::info!("requesting generation with {:?}", params);

        let raw = self.transport.post(&body)?;
        let response = ComputeResponse::parse(&raw)?;

        let records = records_from_response(&response, &self.decoder);
        log::info!("generation produced {} geometry records", records.len());
        Ok(records)
    }
}
