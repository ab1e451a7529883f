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

//! Maps stream indices to the vertex buffers that feed them.

use std::collections::BTreeMap;

use crate::renderer::api::buffer::VertexBufferHandle;
use crate::renderer::error::LayoutError;

/// The set of vertex buffers bound to numbered streams for one draw.
///
/// A [`VertexDeclaration`](super::VertexDeclaration) says which stream each
/// element is read from; the binding says which buffer each stream is.
#[derive(Debug, Clone, Default)]
pub struct VertexBufferBinding {
    bindings: BTreeMap<u16, VertexBufferHandle>,
    next_index: u16,
}

impl VertexBufferBinding {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `buffer` to stream `index`, replacing any previous buffer.
    pub fn set_binding(&mut self, index: u16, buffer: VertexBufferHandle) {
        self.bindings.insert(index, buffer);
        self.next_index = self.next_index.max(index.saturating_add(1));
    }

    /// Removes the buffer bound to stream `index`.
    ///
    /// The next free index is not lowered, so a stream number is never handed
    /// out twice by [`next_index`](Self::next_index).
    pub fn unset_binding(&mut self, index: u16) -> Result<VertexBufferHandle, LayoutError> {
        self.bindings
            .remove(&index)
            .ok_or(LayoutError::UnboundSource { stream: index })
    }

    /// Removes every binding and resets the next free index.
    pub fn unset_all(&mut self) {
        self.bindings.clear();
        self.next_index = 0;
    }

    /// Returns the buffer bound to stream `index`.
    pub fn buffer(&self, index: u16) -> Result<&VertexBufferHandle, LayoutError> {
        self.bindings
            .get(&index)
            .ok_or(LayoutError::UnboundSource { stream: index })
    }

    /// Returns `true` if a buffer is bound to stream `index`.
    pub fn is_buffer_bound(&self, index: u16) -> bool {
        self.bindings.contains_key(&index)
    }

    /// Iterates over `(index, buffer)` pairs in ascending index order.
    pub fn bindings(&self) -> impl Iterator<Item = (u16, &VertexBufferHandle)> {
        self.bindings.iter().map(|(index, buffer)| (*index, buffer))
    }

    /// The number of bound streams.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// One past the highest stream index ever bound since the last [`unset_all`](Self::unset_all).
    pub fn next_index(&self) -> u16 {
        self.next_index
    }
}
