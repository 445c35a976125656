//! The renderable group: exclusive owner of live primitives
//!
//! At most one batch of primitives is live at a time. Replacing the batch
//! releases every previous primitive's GPU buffers before the new batch is
//! installed, so no orphaned buffers accumulate across regenerations.

use crate::interpreter::Primitive;
use crate::renderer::GpuPrimitive;
use parascope_core::Aabb;

/// One primitive plus its optional GPU residency
#[derive(Debug)]
pub struct RenderedPrimitive {
    pub cpu: Primitive,
    pub gpu: Option<GpuPrimitive>,
}

impl RenderedPrimitive {
    pub fn new(cpu: Primitive) -> Self {
        Self { cpu, gpu: None }
    }

    /// Release GPU buffers, if resident
    pub fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.destroy();
        }
    }
}

impl Drop for RenderedPrimitive {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Exclusive owner of the primitives currently displayed
#[derive(Debug, Default)]
pub struct RenderableGroup {
    items: Vec<RenderedPrimitive>,
}

impl RenderableGroup {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Replace the live batch. Previous primitives are disposed first.
    pub fn replace(&mut self, primitives: Vec<Primitive>) {
        self.clear();
        self.items = primitives.into_iter().map(RenderedPrimitive::new).collect();
    }

    /// Dispose and remove every primitive
    pub fn clear(&mut self) {
        for item in &mut self.items {
            item.dispose();
        }
        self.items.clear();
    }

    /// Number of live primitives
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bounding box over every live primitive
    pub fn bounding_box(&self) -> Aabb {
        let mut aabb = Aabb::empty();
        for item in &self.items {
            aabb.merge(&item.cpu.bounding_box());
        }
        aabb
    }

    pub fn iter(&self) -> std::slice::Iter<RenderedPrimitive> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<RenderedPrimitive> {
        self.items.iter_mut()
    }
}
