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

//! A hardware buffer backed by a plain byte vector.

use super::{check_region, BufferUsage, HardwareBuffer, LockMode};
use crate::renderer::error::BufferError;

/// A buffer held entirely in system memory.
///
/// Serves as the shadow copy of device buffers and as the storage of
/// software backends. Locking is free, and any lock mode may read.
#[derive(Debug, Clone)]
pub struct SystemMemoryBuffer {
    data: Vec<u8>,
    usage: BufferUsage,
    locked: bool,
}

impl SystemMemoryBuffer {
    /// Creates a zero-filled buffer of `size` bytes.
    pub fn new(size: usize, usage: BufferUsage) -> Self {
        Self {
            data: vec![0; size],
            usage,
            locked: false,
        }
    }

    /// Borrows the whole content without locking.
    ///
    /// Intended for inspection; returns `None` while a lock is outstanding.
    pub fn contents(&self) -> Option<&[u8]> {
        (!self.locked).then_some(self.data.as_slice())
    }
}

impl HardwareBuffer for SystemMemoryBuffer {
    fn size_in_bytes(&self) -> usize {
        self.data.len()
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }

    fn is_system_memory(&self) -> bool {
        true
    }

    fn is_locked(&self) -> bool {
        self.locked
    }

    fn lock(
        &mut self,
        offset: usize,
        length: usize,
        _mode: LockMode,
    ) -> Result<&mut [u8], BufferError> {
        if self.locked {
            return Err(BufferError::AlreadyLocked);
        }
        check_region(offset, length, self.data.len())?;
        self.locked = true;
        Ok(&mut self.data[offset..offset + length])
    }

    fn unlock(&mut self) -> Result<(), BufferError> {
        if !self.locked {
            return Err(BufferError::NotLocked);
        }
        self.locked = false;
        Ok(())
    }
}
