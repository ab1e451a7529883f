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

//! Vertex and index buffers, and the shared handles geometry holds them by.

use std::sync::{Arc, Mutex};

use super::{buffer_size, BufferId, BufferUsage, HardwareBuffer, LockMode};
use crate::renderer::error::BufferError;

/// The width of each index in an index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexType {
    /// 16-bit unsigned indices.
    Size16,
    /// 32-bit unsigned indices.
    Size32,
}

impl IndexType {
    /// The size of one index in bytes.
    pub const fn size_in_bytes(self) -> usize {
        match self {
            IndexType::Size16 => 2,
            IndexType::Size32 => 4,
        }
    }
}

/// A buffer of vertices with a fixed stride.
#[derive(Debug)]
pub struct HardwareVertexBuffer {
    id: BufferId,
    vertex_size: usize,
    num_vertices: usize,
    buffer: Box<dyn HardwareBuffer>,
}

impl HardwareVertexBuffer {
    /// Wraps `buffer` as storage for `num_vertices` vertices of `vertex_size` bytes.
    ///
    /// The storage must be exactly `vertex_size * num_vertices` bytes long.
    pub fn new(
        vertex_size: usize,
        num_vertices: usize,
        buffer: Box<dyn HardwareBuffer>,
    ) -> Result<Self, BufferError> {
        let expected = buffer_size(vertex_size, num_vertices)?;
        if buffer.size_in_bytes() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: buffer.size_in_bytes(),
            });
        }
        Ok(Self {
            id: BufferId::next(),
            vertex_size,
            num_vertices,
            buffer,
        })
    }

    /// The process-unique id of this buffer.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// The size of one vertex in bytes.
    pub fn vertex_size(&self) -> usize {
        self.vertex_size
    }

    /// The number of vertices the buffer holds.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }
}

/// A buffer of vertex indices.
#[derive(Debug)]
pub struct HardwareIndexBuffer {
    id: BufferId,
    index_type: IndexType,
    num_indices: usize,
    buffer: Box<dyn HardwareBuffer>,
}

impl HardwareIndexBuffer {
    /// Wraps `buffer` as storage for `num_indices` indices of `index_type`.
    pub fn new(
        index_type: IndexType,
        num_indices: usize,
        buffer: Box<dyn HardwareBuffer>,
    ) -> Result<Self, BufferError> {
        let expected = buffer_size(index_type.size_in_bytes(), num_indices)?;
        if buffer.size_in_bytes() != expected {
            return Err(BufferError::SizeMismatch {
                expected,
                actual: buffer.size_in_bytes(),
            });
        }
        Ok(Self {
            id: BufferId::next(),
            index_type,
            num_indices,
            buffer,
        })
    }

    /// The process-unique id of this buffer.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// The width of each index.
    pub fn index_type(&self) -> IndexType {
        self.index_type
    }

    /// The number of indices the buffer holds.
    pub fn num_indices(&self) -> usize {
        self.num_indices
    }

    /// The size of one index in bytes.
    pub fn index_size(&self) -> usize {
        self.index_type.size_in_bytes()
    }
}

macro_rules! delegate_hardware_buffer {
    ($ty:ty) => {
        impl HardwareBuffer for $ty {
            fn size_in_bytes(&self) -> usize {
                self.buffer.size_in_bytes()
            }

            fn usage(&self) -> BufferUsage {
                self.buffer.usage()
            }

            fn is_system_memory(&self) -> bool {
                self.buffer.is_system_memory()
            }

            fn has_shadow_buffer(&self) -> bool {
                self.buffer.has_shadow_buffer()
            }

            fn is_locked(&self) -> bool {
                self.buffer.is_locked()
            }

            fn lock(
                &mut self,
                offset: usize,
                length: usize,
                mode: LockMode,
            ) -> Result<&mut [u8], BufferError> {
                self.buffer.lock(offset, length, mode)
            }

            fn unlock(&mut self) -> Result<(), BufferError> {
                self.buffer.unlock()
            }
        }
    };
}

delegate_hardware_buffer!(HardwareVertexBuffer);
delegate_hardware_buffer!(HardwareIndexBuffer);

/// A shared, cloneable handle to a buffer.
///
/// Geometry, bindings and buffer-copy pools all refer to the same buffer
/// through clones of one handle. Access goes through [`with`](Self::with),
/// which holds the buffer exclusively for the duration of the closure.
#[derive(Debug)]
pub struct BufferHandle<T> {
    id: BufferId,
    inner: Arc<Mutex<T>>,
}

/// A shared handle to a [`HardwareVertexBuffer`].
pub type VertexBufferHandle = BufferHandle<HardwareVertexBuffer>;
/// A shared handle to a [`HardwareIndexBuffer`].
pub type IndexBufferHandle = BufferHandle<HardwareIndexBuffer>;

impl<T> Clone for BufferHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BufferHandle<T> {
    /// The id of the buffer behind this handle.
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Returns `true` if both handles refer to the same buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs `f` with exclusive access to the buffer.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R, BufferError> {
        let mut guard = self.inner.lock().map_err(|_| BufferError::Poisoned)?;
        Ok(f(&mut *guard))
    }

    /// Like [`with`](Self::with), for closures that can fail themselves.
    pub fn try_with<R>(
        &self,
        f: impl FnOnce(&mut T) -> Result<R, BufferError>,
    ) -> Result<R, BufferError> {
        self.with(f)?
    }
}

impl VertexBufferHandle {
    /// Copies as much of `src` as fits into this buffer.
    pub fn copy_all_from(&self, src: &VertexBufferHandle) -> Result<(), BufferError> {
        if self.ptr_eq(src) {
            return Ok(());
        }
        self.try_with(|dest| src.try_with(|src| dest.copy_all_from(src)))
    }
}

impl IndexBufferHandle {
    /// Copies as much of `src` as fits into this buffer.
    pub fn copy_all_from(&self, src: &IndexBufferHandle) -> Result<(), BufferError> {
        if self.ptr_eq(src) {
            return Ok(());
        }
        self.try_with(|dest| src.try_with(|src| dest.copy_all_from(src)))
    }
}

impl From<HardwareVertexBuffer> for VertexBufferHandle {
    fn from(buffer: HardwareVertexBuffer) -> Self {
        Self {
            id: buffer.id(),
            inner: Arc::new(Mutex::new(buffer)),
        }
    }
}

impl From<HardwareIndexBuffer> for IndexBufferHandle {
    fn from(buffer: HardwareIndexBuffer) -> Self {
        Self {
            id: buffer.id(),
            inner: Arc::new(Mutex::new(buffer)),
        }
    }
}
