// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Shared fixtures: a system-memory buffer manager and a simple drawable.

#![allow(dead_code)]

use std::sync::Arc;

use tessera_core::math::{Mat4, Vec3};
use tessera_core::renderer::api::buffer::{
    BufferUsage, HardwareBuffer, HardwareIndexBuffer, HardwareVertexBuffer, IndexBufferHandle,
    IndexType, ShadowedBuffer, SystemMemoryBuffer, VertexBufferHandle,
};
use tessera_core::renderer::{
    BufferError, HardwareBufferManager, MaterialHandle, OperationType, RenderOperation,
    Renderable, VertexData,
};

/// A manager whose "device" buffers are plain system memory.
#[derive(Debug, Default)]
pub struct SystemMemoryManager;

impl SystemMemoryManager {
    fn storage(size: usize, usage: BufferUsage, shadowed: bool) -> Box<dyn HardwareBuffer> {
        if shadowed {
            Box::new(ShadowedBuffer::new(SystemMemoryBuffer::new(
                size,
                usage.for_shadowed_buffer(),
            )))
        } else {
            Box::new(SystemMemoryBuffer::new(size, usage))
        }
    }
}

impl HardwareBufferManager for SystemMemoryManager {
    fn create_vertex_buffer(
        &self,
        vertex_size: usize,
        num_vertices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<VertexBufferHandle, BufferError> {
        let storage = Self::storage(vertex_size * num_vertices, usage, use_shadow_buffer);
        HardwareVertexBuffer::new(vertex_size, num_vertices, storage).map(Into::into)
    }

    fn create_index_buffer(
        &self,
        index_type: IndexType,
        num_indices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<IndexBufferHandle, BufferError> {
        let storage = Self::storage(
            index_type.size_in_bytes() * num_indices,
            usage,
            use_shadow_buffer,
        );
        HardwareIndexBuffer::new(index_type, num_indices, storage).map(Into::into)
    }
}

/// A drawable placed at a point in space.
#[derive(Debug)]
pub struct PointDrawable {
    pub material: Option<MaterialHandle>,
    pub transforms: Vec<Mat4>,
    pub vertex_data: VertexData,
}

impl PointDrawable {
    pub fn at(material: &MaterialHandle, position: Vec3) -> Arc<dyn Renderable> {
        Arc::new(Self {
            material: Some(Arc::clone(material)),
            transforms: vec![Mat4::from_translation(position)],
            vertex_data: VertexData::default(),
        })
    }
}

impl Renderable for PointDrawable {
    fn material(&self) -> Option<&MaterialHandle> {
        self.material.as_ref()
    }

    fn render_operation(&self) -> RenderOperation<'_> {
        RenderOperation::new(OperationType::TriangleList, &self.vertex_data)
    }

    fn world_transforms(&self) -> &[Mat4] {
        &self.transforms
    }
}
