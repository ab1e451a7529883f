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

//! Emulated device memory.
//!
//! A [`DeviceBuffer`] behaves like a buffer living on a graphics card: a
//! write-only buffer cannot be locked for reading, and every write lock that
//! is released counts as one upload. Allocations are reported to a shared
//! [`DeviceMemory`] so a manager can track what is live.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tessera_core::renderer::api::buffer::{check_region, BufferUsage, HardwareBuffer, LockMode};
use tessera_core::renderer::BufferError;

/// Allocation counters shared by every buffer of one manager.
#[derive(Debug, Default)]
pub struct DeviceMemory {
    allocated_bytes: AtomicUsize,
    peak_bytes: AtomicUsize,
    live_buffers: AtomicUsize,
}

impl DeviceMemory {
    /// Creates empty counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently held by live buffers.
    pub fn allocated_bytes(&self) -> usize {
        self.allocated_bytes.load(Ordering::Relaxed)
    }

    /// The highest value `allocated_bytes` has reached.
    pub fn peak_bytes(&self) -> usize {
        self.peak_bytes.load(Ordering::Relaxed)
    }

    /// The number of buffers not yet dropped.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers.load(Ordering::Relaxed)
    }

    fn allocate(&self, size: usize) {
        let current = self.allocated_bytes.fetch_add(size, Ordering::Relaxed) + size;
        self.peak_bytes.fetch_max(current, Ordering::Relaxed);
        self.live_buffers.fetch_add(1, Ordering::Relaxed);
    }

    fn release(&self, size: usize) {
        self.allocated_bytes.fetch_sub(size, Ordering::Relaxed);
        self.live_buffers.fetch_sub(1, Ordering::Relaxed);
    }
}

/// A buffer in emulated device memory.
#[derive(Debug)]
pub struct DeviceBuffer {
    data: Vec<u8>,
    usage: BufferUsage,
    lock: Option<LockMode>,
    uploads: usize,
    discards: usize,
    memory: Option<Arc<DeviceMemory>>,
}

impl DeviceBuffer {
    /// Creates an untracked, zero-filled buffer of `size` bytes.
    pub fn new(size: usize, usage: BufferUsage) -> Self {
        Self {
            data: vec![0; size],
            usage,
            lock: None,
            uploads: 0,
            discards: 0,
            memory: None,
        }
    }

    /// Creates a buffer whose lifetime is accounted for in `memory`.
    pub fn tracked(size: usize, usage: BufferUsage, memory: Arc<DeviceMemory>) -> Self {
        memory.allocate(size);
        Self {
            data: vec![0; size],
            usage,
            lock: None,
            uploads: 0,
            discards: 0,
            memory: Some(memory),
        }
    }

    /// The number of released write locks.
    pub fn uploads(&self) -> usize {
        self.uploads
    }

    /// The number of locks taken with [`LockMode::Discard`].
    pub fn discards(&self) -> usize {
        self.discards
    }

    /// Inspects the emulated device memory, ignoring `WRITE_ONLY`.
    ///
    /// Returns `None` while a lock is outstanding.
    pub fn device_contents(&self) -> Option<&[u8]> {
        self.lock.is_none().then_some(self.data.as_slice())
    }
}

impl HardwareBuffer for DeviceBuffer {
    fn size_in_bytes(&self) -> usize {
        self.data.len()
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn is_system_memory(&self) -> bool {
        false
    }

    fn is_locked(&self) -> bool {
        self.lock.is_some()
    }

    fn lock(
        &mut self,
        offset: usize,
        length: usize,
        mode: LockMode,
    ) -> Result<&mut [u8], BufferError> {
        if self.lock.is_some() {
            return Err(BufferError::AlreadyLocked);
        }
        if mode == LockMode::ReadOnly && self.usage.contains(BufferUsage::WRITE_ONLY) {
            return Err(BufferError::ReadFromWriteOnly);
        }
        check_region(offset, length, self.data.len())?;

        if mode == LockMode::Discard {
            self.discards += 1;
        }
        self.lock = Some(mode);
        Ok(&mut self.data[offset..offset + length])
    }

    fn unlock(&mut self) -> Result<(), BufferError> {
        match self.lock.take() {
            None => Err(BufferError::NotLocked),
            Some(LockMode::ReadOnly) => Ok(()),
            Some(_) => {
                self.uploads += 1;
                Ok(())
            }
        }
    }
}

impl Drop for DeviceBuffer {
    fn drop(&mut self) {
        if let Some(memory) = &self.memory {
            memory.release(self.data.len());
            log::debug!("DeviceBuffer: Released {} bytes.", self.data.len());
        }
    }
}
