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

//! Per-drawable geometry: the vertex and index sources of one render operation.

use crate::renderer::api::buffer::{
    HardwareBuffer, IndexBufferHandle, VertexBufferHandle,
};
use crate::renderer::api::vertex::{VertexBufferBinding, VertexDeclaration};
use crate::renderer::error::{BufferError, RenderError};
use crate::renderer::traits::HardwareBufferManager;

/// How buffers are treated when geometry is cloned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BufferCopy {
    /// The clone refers to the same buffers.
    #[default]
    Share,
    /// The clone gets new buffers holding a copy of the data.
    Deep,
}

/// Source data for blending vertices on the CPU.
///
/// Positions and normals are kept unblended here; the blended result is
/// written into the bound vertex buffers each frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SoftwareBlendInfo {
    /// Unblended positions, three floats per vertex.
    pub src_positions: Vec<f32>,
    /// Unblended normals, three floats per vertex, if the mesh has normals.
    pub src_normals: Option<Vec<f32>>,
    /// Blend weights, `weights_per_vertex` per vertex.
    pub blend_weights: Vec<f32>,
    /// Indices into the world matrix palette, `weights_per_vertex` per vertex.
    pub blend_indices: Vec<u16>,
    /// The number of weights influencing each vertex.
    pub weights_per_vertex: usize,
    /// When set, the render system blends automatically before drawing.
    pub automatic: bool,
}

/// The vertex side of a piece of geometry.
///
/// Cloning with `Clone` shares the underlying buffers; use
/// [`clone_with`](Self::clone_with) to copy them.
#[derive(Debug, Clone, Default)]
pub struct VertexData {
    /// The layout of one vertex.
    pub declaration: VertexDeclaration,
    /// The buffers feeding each stream.
    pub binding: VertexBufferBinding,
    /// The first vertex to use.
    pub vertex_start: usize,
    /// The number of vertices to use.
    pub vertex_count: usize,
    /// Present when this geometry is blended in software.
    pub software_blend: Option<SoftwareBlendInfo>,
}

impl VertexData {
    /// Creates empty vertex data with a declaration and a binding from `manager`.
    pub fn new(manager: &dyn HardwareBufferManager) -> Self {
        Self::from_parts(
            manager.create_vertex_declaration(),
            manager.create_vertex_buffer_binding(),
        )
    }

    /// Creates vertex data around an existing declaration and binding.
    pub fn from_parts(declaration: VertexDeclaration, binding: VertexBufferBinding) -> Self {
        Self {
            declaration,
            binding,
            vertex_start: 0,
            vertex_count: 0,
            software_blend: None,
        }
    }

    /// Clones this vertex data, optionally duplicating every bound buffer.
    ///
    /// Deep copies get buffers with the same layout, usage and shadowing as
    /// the originals.
    pub fn clone_with(
        &self,
        manager: &dyn HardwareBufferManager,
        copy: BufferCopy,
    ) -> Result<Self, BufferError> {
        let mut cloned = self.clone();
        if copy == BufferCopy::Deep {
            let mut binding = manager.create_vertex_buffer_binding();
            for (index, source) in self.binding.bindings() {
                binding.set_binding(index, duplicate_vertex_buffer(manager, source)?);
            }
            cloned.binding = binding;
        }
        Ok(cloned)
    }

    /// Checks the declaration against the binding.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.declaration.validate_binding(&self.binding)
    }
}

fn duplicate_vertex_buffer(
    manager: &dyn HardwareBufferManager,
    source: &VertexBufferHandle,
) -> Result<VertexBufferHandle, BufferError> {
    let (vertex_size, num_vertices, usage, shadowed) = source.with(|b| {
        (
            b.vertex_size(),
            b.num_vertices(),
            b.usage(),
            b.has_shadow_buffer(),
        )
    })?;
    let copy = manager.create_vertex_buffer(vertex_size, num_vertices, usage, shadowed)?;
    copy.copy_all_from(source)?;
    Ok(copy)
}

/// The index side of a piece of geometry.
#[derive(Debug, Clone)]
pub struct IndexData {
    /// The buffer holding the indices.
    pub buffer: IndexBufferHandle,
    /// The first index to use.
    pub index_start: usize,
    /// The number of indices to use.
    pub index_count: usize,
}

impl IndexData {
    /// Creates index data over a range of `buffer`.
    pub fn new(buffer: IndexBufferHandle, index_start: usize, index_count: usize) -> Self {
        Self {
            buffer,
            index_start,
            index_count,
        }
    }

    /// Clones this index data, optionally duplicating the buffer.
    pub fn clone_with(
        &self,
        manager: &dyn HardwareBufferManager,
        copy: BufferCopy,
    ) -> Result<Self, BufferError> {
        let buffer = match copy {
            BufferCopy::Share => self.buffer.clone(),
            BufferCopy::Deep => {
                let (index_type, num_indices, usage, shadowed) = self.buffer.with(|b| {
                    (
                        b.index_type(),
                        b.num_indices(),
                        b.usage(),
                        b.has_shadow_buffer(),
                    )
                })?;
                let buffer =
                    manager.create_index_buffer(index_type, num_indices, usage, shadowed)?;
                buffer.copy_all_from(&self.buffer)?;
                buffer
            }
        };
        Ok(Self {
            buffer,
            index_start: self.index_start,
            index_count: self.index_count,
        })
    }
}
