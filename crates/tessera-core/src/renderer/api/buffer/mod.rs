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

//! Defines hardware buffers and the lock/unlock protocol used to reach their memory.
//!
//! A [`HardwareBuffer`] exposes its bytes only between a `lock` and the matching
//! `unlock`. Buffers living in device memory that the CPU cannot read back
//! efficiently can be wrapped in a [`ShadowedBuffer`], which serves every lock
//! from a system-memory copy and pushes changes to the real buffer on unlock.

mod copy_pool;
mod shadowed;
mod system_memory;
mod typed;

pub use self::copy_pool::{BufferCopyPool, LicenseRelease};
pub use self::shadowed::ShadowedBuffer;
pub use self::system_memory::SystemMemoryBuffer;
pub use self::typed::{
    BufferHandle, HardwareIndexBuffer, HardwareVertexBuffer, IndexBufferHandle, IndexType,
    VertexBufferHandle,
};

use crate::renderer::error::BufferError;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

bitflags! {
    /// Describes how a buffer is going to be used.
    ///
    /// The driver uses these flags to choose where the buffer lives. A
    /// write-only buffer may sit in memory the CPU cannot read back, which is
    /// why reading such a buffer requires a shadow copy.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BufferUsage: u32 {
        /// Rarely modified after creation.
        const STATIC = 1 << 0;
        /// Modified often.
        const DYNAMIC = 1 << 1;
        /// The CPU never reads this buffer back.
        const WRITE_ONLY = 1 << 2;
        /// The whole content may be thrown away on every write.
        const DISCARDABLE = 1 << 3;

        /// `STATIC | WRITE_ONLY`, the most efficient choice for static geometry.
        const STATIC_WRITE_ONLY = Self::STATIC.bits() | Self::WRITE_ONLY.bits();
        /// `DYNAMIC | WRITE_ONLY`.
        const DYNAMIC_WRITE_ONLY = Self::DYNAMIC.bits() | Self::WRITE_ONLY.bits();
        /// `DYNAMIC | WRITE_ONLY | DISCARDABLE`, for data regenerated every frame.
        const DYNAMIC_WRITE_ONLY_DISCARDABLE =
            Self::DYNAMIC.bits() | Self::WRITE_ONLY.bits() | Self::DISCARDABLE.bits();
    }
}

impl BufferUsage {
    /// The usage to give the real buffer when a shadow buffer serves reads.
    ///
    /// With a shadow in place the real buffer is never read back, so plain
    /// `STATIC` and `DYNAMIC` are upgraded to their write-only forms.
    pub fn for_shadowed_buffer(self) -> Self {
        if self == Self::STATIC {
            Self::STATIC_WRITE_ONLY
        } else if self == Self::DYNAMIC {
            Self::DYNAMIC_WRITE_ONLY
        } else {
            self
        }
    }
}

/// How the memory returned by a lock will be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Read and write access; the existing contents are preserved.
    Normal,
    /// The caller will overwrite the whole region, so old contents may be discarded.
    Discard,
    /// The caller only reads.
    ReadOnly,
    /// The caller promises not to touch data the device may still be using.
    NoOverwrite,
}

/// Hint accompanying a write of new data into a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WriteHint {
    /// Preserve whatever the write does not cover.
    #[default]
    Normal,
    /// Everything in the buffer may be thrown away before writing.
    DiscardWholeBuffer,
}

impl WriteHint {
    fn lock_mode(self) -> LockMode {
        match self {
            WriteHint::Normal => LockMode::Normal,
            WriteHint::DiscardWholeBuffer => LockMode::Discard,
        }
    }
}

/// A process-unique handle identifying a hardware buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

static NEXT_BUFFER_ID: AtomicUsize = AtomicUsize::new(0);

impl BufferId {
    /// Hands out the next unused id.
    pub fn next() -> Self {
        Self(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Checks that `[offset, offset + length)` lies inside a buffer of `size` bytes.
pub fn check_region(offset: usize, length: usize, size: usize) -> Result<(), BufferError> {
    match offset.checked_add(length) {
        Some(end) if end <= size => Ok(()),
        _ => Err(BufferError::OutOfBounds {
            offset,
            length,
            size,
        }),
    }
}

/// The byte size of `count` elements of `element_size` bytes each.
pub fn buffer_size(element_size: usize, count: usize) -> Result<usize, BufferError> {
    element_size
        .checked_mul(count)
        .ok_or(BufferError::SizeOverflow {
            element_size,
            count,
        })
}

/// A linear block of memory owned by the rendering API or by system memory.
///
/// At most one lock may be outstanding at a time. Every region handed out by
/// [`lock`](Self::lock) lies inside the buffer.
pub trait HardwareBuffer: fmt::Debug + Send {
    /// Total size of the buffer in bytes.
    fn size_in_bytes(&self) -> usize;

    /// The usage flags the buffer was created with.
    fn usage(&self) -> BufferUsage;

    /// Returns `true` if the buffer lives in system memory.
    fn is_system_memory(&self) -> bool;

    /// Returns `true` if reads are served from a system-memory shadow copy.
    fn has_shadow_buffer(&self) -> bool {
        false
    }

    /// Returns `true` while a lock is outstanding.
    fn is_locked(&self) -> bool;

    /// Locks `length` bytes starting at `offset` and returns them.
    ///
    /// Fails if the buffer is already locked or the region does not fit.
    fn lock(&mut self, offset: usize, length: usize, mode: LockMode)
        -> Result<&mut [u8], BufferError>;

    /// Releases the outstanding lock, committing any writes.
    fn unlock(&mut self) -> Result<(), BufferError>;

    /// Locks the entire buffer.
    fn lock_all(&mut self, mode: LockMode) -> Result<&mut [u8], BufferError> {
        let size = self.size_in_bytes();
        self.lock(0, size, mode)
    }

    /// Copies `dest.len()` bytes starting at `offset` out of the buffer.
    fn read_data(&mut self, offset: usize, dest: &mut [u8]) -> Result<(), BufferError> {
        let data = self.lock(offset, dest.len(), LockMode::ReadOnly)?;
        dest.copy_from_slice(data);
        self.unlock()
    }

    /// Copies `src` into the buffer starting at `offset`.
    fn write_data(&mut self, offset: usize, src: &[u8], hint: WriteHint) -> Result<(), BufferError> {
        let data = self.lock(offset, src.len(), hint.lock_mode())?;
        data.copy_from_slice(src);
        self.unlock()
    }

    /// Copies `length` bytes from another buffer into this one.
    ///
    /// The source is unlocked again even when the write fails.
    fn copy_data(
        &mut self,
        src: &mut dyn HardwareBuffer,
        src_offset: usize,
        dest_offset: usize,
        length: usize,
        hint: WriteHint,
    ) -> Result<(), BufferError> {
        let data = src.lock(src_offset, length, LockMode::ReadOnly)?;
        let written = self.write_data(dest_offset, data, hint);
        let released = src.unlock();
        written.and(released)
    }

    /// Copies as much of `src` as fits, discarding this buffer's contents.
    fn copy_all_from(&mut self, src: &mut dyn HardwareBuffer) -> Result<(), BufferError> {
        let length = src.size_in_bytes().min(self.size_in_bytes());
        self.copy_data(src, 0, 0, length, WriteHint::DiscardWholeBuffer)
    }

    /// Locks a region, hands it to `f`, then unlocks.
    fn with_lock<R>(
        &mut self,
        offset: usize,
        length: usize,
        mode: LockMode,
        f: impl FnOnce(&mut [u8]) -> R,
    ) -> Result<R, BufferError>
    where
        Self: Sized,
    {
        let data = self.lock(offset, length, mode)?;
        let result = f(data);
        self.unlock()?;
        Ok(result)
    }
}

impl HardwareBuffer for Box<dyn HardwareBuffer> {
    fn size_in_bytes(&self) -> usize {
        (**self).size_in_bytes()
    }

    fn usage(&self) -> BufferUsage {
        (**self).usage()
    }

    fn is_system_memory(&self) -> bool {
        (**self).is_system_memory()
    }

    fn has_shadow_buffer(&self) -> bool {
        (**self).has_shadow_buffer()
    }

    fn is_locked(&self) -> bool {
        (**self).is_locked()
    }

    fn lock(
        &mut self,
        offset: usize,
        length: usize,
        mode: LockMode,
    ) -> Result<&mut [u8], BufferError> {
        (**self).lock(offset, length, mode)
    }

    fn unlock(&mut self) -> Result<(), BufferError> {
        (**self).unlock()
    }
}
