//! Compute-service boundary for parascope
//!
//! The remote compute service runs a parametric definition and returns
//! geometry-bearing items in a nested tree structure. This crate owns the
//! consumed side of that contract: the flat numeric parameter set, the
//! response JSON shape, and the seams through which transport and native
//! geometry decoding are supplied:
//! - [`ComputeTransport`]: how a request body becomes a response body
//! - [`GeometryDecoder`]: how one opaque tree item becomes geometry records
//!
//! Neither seam is implemented here beyond the placeholder decoder; the
//! protocol and the native geometry encoding belong to the service.

pub mod client;
pub mod decode;
pub mod params;
pub mod response;

pub use client::*;
pub use decode::*;
pub use params::*;
pub use response::*;
