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

//! A [`HardwareBufferManager`] handing out buffers in emulated device memory.

use std::sync::Arc;

use tessera_core::renderer::api::buffer::{
    buffer_size, BufferUsage, HardwareBuffer, HardwareIndexBuffer, HardwareVertexBuffer,
    IndexBufferHandle, IndexType, ShadowedBuffer, VertexBufferHandle,
};
use tessera_core::renderer::{BufferError, HardwareBufferManager};

use crate::device_buffer::{DeviceBuffer, DeviceMemory};

/// Creates vertex and index buffers backed by [`DeviceBuffer`]s.
///
/// Shadowed buffers wrap the device buffer in a [`ShadowedBuffer`] and give it
/// the write-only form of the requested usage. Every allocation is reported
/// to a shared [`DeviceMemory`].
#[derive(Debug, Default)]
pub struct SoftwareBufferManager {
    memory: Arc<DeviceMemory>,
}

impl SoftwareBufferManager {
    /// Creates a manager with no allocations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The allocation counters of this manager.
    pub fn memory(&self) -> &Arc<DeviceMemory> {
        &self.memory
    }

    /// Bytes currently held by buffers from this manager.
    pub fn allocated_bytes(&self) -> usize {
        self.memory.allocated_bytes()
    }

    /// The number of buffers from this manager still alive.
    pub fn live_buffers(&self) -> usize {
        self.memory.live_buffers()
    }

    fn allocate(
        &self,
        size: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Box<dyn HardwareBuffer> {
        let memory = Arc::clone(&self.memory);
        if use_shadow_buffer {
            Box::new(ShadowedBuffer::new(DeviceBuffer::tracked(
                size,
                usage.for_shadowed_buffer(),
                memory,
            )))
        } else {
            Box::new(DeviceBuffer::tracked(size, usage, memory))
        }
    }
}

impl HardwareBufferManager for SoftwareBufferManager {
    fn create_vertex_buffer(
        &self,
        vertex_size: usize,
        num_vertices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<VertexBufferHandle, BufferError> {
        let size = buffer_size(vertex_size, num_vertices)?;
        let storage = self.allocate(size, usage, use_shadow_buffer);
        let buffer = HardwareVertexBuffer::new(vertex_size, num_vertices, storage)?;
        log::info!(
            "SoftwareBufferManager: Created vertex buffer {} ({} x {} bytes, {:?}, shadowed: {}).",
            buffer.id(),
            num_vertices,
            vertex_size,
            usage,
            use_shadow_buffer
        );
        Ok(buffer.into())
    }

    fn create_index_buffer(
        &self,
        index_type: IndexType,
        num_indices: usize,
        usage: BufferUsage,
        use_shadow_buffer: bool,
    ) -> Result<IndexBufferHandle, BufferError> {
        let size = buffer_size(index_type.size_in_bytes(), num_indices)?;
        let storage = self.allocate(size, usage, use_shadow_buffer);
        let buffer = HardwareIndexBuffer::new(index_type, num_indices, storage)?;
        log::info!(
            "SoftwareBufferManager: Created index buffer {} ({} x {:?}, {:?}, shadowed: {}).",
            buffer.id(),
            num_indices,
            index_type,
            usage,
            use_shadow_buffer
        );
        Ok(buffer.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::renderer::api::buffer::WriteHint;

    #[test]
    fn test_shadowed_buffer_gets_write_only_usage() {
        let manager = SoftwareBufferManager::new();
        let vb = manager
            .create_vertex_buffer(12, 4, BufferUsage::STATIC, true)
            .unwrap();
        vb.with(|b| {
            assert!(b.has_shadow_buffer());
            assert!(!b.is_system_memory());
            assert_eq!(b.usage(), BufferUsage::STATIC_WRITE_ONLY);
            assert_eq!(b.size_in_bytes(), 48);
        })
        .unwrap();
    }

    #[test]
    fn test_unshadowed_write_only_cannot_be_read() {
        let manager = SoftwareBufferManager::new();
        let ib = manager
            .create_index_buffer(IndexType::Size16, 3, BufferUsage::STATIC_WRITE_ONLY, false)
            .unwrap();
        let result = ib.try_with(|b| {
            b.write_data(0, &[0, 0, 1, 0, 2, 0], WriteHint::Normal)?;
            let mut out = [0u8; 6];
            b.read_data(0, &mut out)
        });
        assert_eq!(result, Err(BufferError::ReadFromWriteOnly));
    }

    #[test]
    fn test_tracks_allocations_until_last_handle_drops() {
        let manager = SoftwareBufferManager::new();
        let vb = manager
            .create_vertex_buffer(16, 10, BufferUsage::DYNAMIC, true)
            .unwrap();
        let ib = manager
            .create_index_buffer(IndexType::Size32, 6, BufferUsage::STATIC, false)
            .unwrap();
        assert_eq!(manager.allocated_bytes(), 160 + 24);
        assert_eq!(manager.live_buffers(), 2);

        let shared = vb.clone();
        drop(vb);
        assert_eq!(manager.live_buffers(), 2);
        drop(shared);
        drop(ib);
        assert_eq!(manager.live_buffers(), 0);
        assert_eq!(manager.allocated_bytes(), 0);
        assert_eq!(manager.memory().peak_bytes(), 184);
    }

    #[test]
    fn test_overflowing_sizes_allocate_nothing() {
        let manager = SoftwareBufferManager::new();
        assert!(matches!(
            manager.create_vertex_buffer(usize::MAX, 2, BufferUsage::STATIC, true),
            Err(BufferError::SizeOverflow { count: 2, .. })
        ));
        assert!(matches!(
            manager.create_index_buffer(IndexType::Size16, usize::MAX, BufferUsage::STATIC, false),
            Err(BufferError::SizeOverflow { element_size: 2, .. })
        ));
        assert_eq!(manager.live_buffers(), 0);
        assert_eq!(manager.allocated_bytes(), 0);
    }
}
