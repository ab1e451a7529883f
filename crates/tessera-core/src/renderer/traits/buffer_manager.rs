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

use crate::renderer::api::buffer::{BufferUsage, IndexBufferHandle, IndexType, VertexBufferHandle};
use crate::renderer::api::vertex::{VertexBufferBinding, VertexDeclaration};
use crate::renderer::error::BufferError;

/// The factory for every buffer and layout object a backend can consume.
///
/// There is no global instance: construct one manager per render system and
/// hand it to whatever builds geometry.
pub trait HardwareBufferManager: std::fmt::Debug + Send + Sync {
    /// Creates a vertex buffer of `num_vertices` vertices, `vertex_size` bytes each.
    ///
    /// With `use_shadow_buffer`, reads are served from a system-memory copy and
    /// plain `STATIC`/`DYNAMIC` usage is upgraded to its write-only form.
    fn create_vertex_buffer(
        &self,
        vertex_size: usize,
        num_vertices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<VertexBufferHandle, BufferError>;

    /// Creates an index buffer of `num_indices` indices of `index_type`.
    fn create_index_buffer(
        &self,
        index_type: IndexType,
        num_indices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<IndexBufferHandle, BufferError>;

    /// Creates an empty vertex declaration.
    fn create_vertex_declaration(&self) -> VertexDeclaration {
        VertexDeclaration::new()
    }

    /// Creates an empty vertex buffer binding.
    fn create_vertex_buffer_binding(&self) -> VertexBufferBinding {
        VertexBufferBinding::new()
    }
}
