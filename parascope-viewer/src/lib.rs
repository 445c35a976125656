//! Interactive 3D viewer for parascope geometry
//!
//! Interprets decoded geometry records into renderable primitives, manages a
//! scene with helper geometry and lighting, and renders it through wgpu with
//! an orbit/zoom/pan camera.

pub mod camera;
pub mod controller;
pub mod gpu;
pub mod group;
pub mod interpreter;
pub mod renderer;
pub mod scene;
pub mod viewer;

pub use camera::Camera;
pub use controller::{OrbitController, PointerButton, ViewMode};
pub use gpu::GpuContext;
pub use group::{RenderableGroup, RenderedPrimitive};
pub use interpreter::{interpret_batch, interpret_raw_batch, interpret_record, Primitive, PrimitiveKind};
pub use renderer::ViewerRenderer;
pub use scene::{LightRig, Scene};
pub use viewer::{Viewer, ViewerSession};
