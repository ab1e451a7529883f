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

//! Temporary vertex buffer copies handed out under licence.
//!
//! Software skinning and morphing write their results into scratch copies of
//! the source buffers. The pool keeps those copies around between frames so
//! they are not reallocated every time.

use ahash::AHashMap;

use super::{BufferId, BufferUsage, VertexBufferHandle};
use crate::renderer::error::BufferError;
use crate::renderer::traits::HardwareBufferManager;

/// When a licensed buffer copy returns to the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LicenseRelease {
    /// Returned by the next [`BufferCopyPool::release_buffer_copies`].
    Automatic,
    /// Held until [`BufferCopyPool::release_copy`] is called.
    Manual,
}

#[derive(Debug)]
struct License {
    source: BufferId,
    copy: VertexBufferHandle,
    release: LicenseRelease,
}

/// A pool of reusable vertex buffer copies, keyed by their source buffer.
#[derive(Debug, Default)]
pub struct BufferCopyPool {
    free: AHashMap<BufferId, Vec<VertexBufferHandle>>,
    licenses: Vec<License>,
}

impl BufferCopyPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Licenses a copy of `source` to the caller.
    ///
    /// A free copy is reused when one exists; otherwise a new dynamic,
    /// write-only, shadowed buffer with the same layout is created. When
    /// `copy_data` is set the current content of `source` is copied in.
    ///
    /// If copying fails the copy goes back to the free list and no licence
    /// is recorded.
    pub fn allocate_copy(
        &mut self,
        manager: &dyn HardwareBufferManager,
        source: &VertexBufferHandle,
        release: LicenseRelease,
        copy_data: bool,
    ) -> Result<VertexBufferHandle, BufferError> {
        let reused = self.free.get_mut(&source.id()).and_then(Vec::pop);
        let copy = match reused {
            Some(copy) => copy,
            None => {
                let (vertex_size, num_vertices) =
                    source.with(|b| (b.vertex_size(), b.num_vertices()))?;
                log::debug!(
                    "BufferCopyPool: Creating a new copy of vertex buffer {}.",
                    source.id()
                );
                manager.create_vertex_buffer(
                    vertex_size,
                    num_vertices,
                    BufferUsage::DYNAMIC_WRITE_ONLY,
                    true,
                )?
            }
        };

        if copy_data {
            if let Err(err) = copy.copy_all_from(source) {
                log::warn!(
                    "BufferCopyPool: Failed to copy vertex buffer {}: {}",
                    source.id(),
                    err
                );
                self.free.entry(source.id()).or_default().push(copy);
                return Err(err);
            }
        }

        self.licenses.push(License {
            source: source.id(),
            copy: copy.clone(),
            release,
        });
        Ok(copy)
    }

    /// Returns a manually licensed copy to the free list.
    ///
    /// Returns `false` if `copy` is not currently licensed out.
    pub fn release_copy(&mut self, copy: &VertexBufferHandle) -> bool {
        let Some(position) = self.licenses.iter().position(|l| l.copy.ptr_eq(copy)) else {
            log::warn!(
                "BufferCopyPool: Buffer {} is not a licensed copy.",
                copy.id()
            );
            return false;
        };
        let license = self.licenses.remove(position);
        self.free.entry(license.source).or_default().push(license.copy);
        true
    }

    /// Returns every automatically licensed copy to the free list.
    ///
    /// The owner of the pool calls this once per frame, after the frame's
    /// draws have been issued.
    pub fn release_buffer_copies(&mut self) {
        let (automatic, manual): (Vec<_>, Vec<_>) = std::mem::take(&mut self.licenses)
            .into_iter()
            .partition(|l| l.release == LicenseRelease::Automatic);
        self.licenses = manual;
        for license in automatic {
            self.free.entry(license.source).or_default().push(license.copy);
        }
    }

    /// Drops every copy of `source`, licensed or free.
    ///
    /// Used when the source changed in a way that makes existing copies
    /// stale. Returns the number of licences that were revoked.
    pub fn force_release_copies(&mut self, source: &VertexBufferHandle) -> usize {
        let before = self.licenses.len();
        self.licenses.retain(|l| l.source != source.id());
        self.free.remove(&source.id());
        before - self.licenses.len()
    }

    /// The number of free copies of `source` ready for reuse.
    pub fn free_count(&self, source: &VertexBufferHandle) -> usize {
        self.free.get(&source.id()).map_or(0, Vec::len)
    }

    /// The number of copies currently licensed out.
    pub fn licensed_count(&self) -> usize {
        self.licenses.len()
    }
}
