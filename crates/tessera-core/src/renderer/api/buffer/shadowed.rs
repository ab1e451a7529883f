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

//! Composition of a real buffer with a system-memory shadow copy.

use std::ops::Range;

use super::{check_region, BufferUsage, HardwareBuffer, LockMode, SystemMemoryBuffer};
use crate::renderer::error::BufferError;

/// A hardware buffer whose locks are served by a system-memory shadow.
///
/// Reads never touch the real buffer. Writes land in the shadow and are
/// copied to the real buffer when the lock is released, unless hardware
/// updates are suppressed. While suppressed, written regions accumulate and
/// are pushed in one go once suppression is lifted.
#[derive(Debug)]
pub struct ShadowedBuffer<B> {
    real: B,
    shadow: SystemMemoryBuffer,
    locked: bool,
    lock_start: usize,
    lock_size: usize,
    dirty: Option<Range<usize>>,
    suppress_hardware_update: bool,
}

impl<B: HardwareBuffer> ShadowedBuffer<B> {
    /// Wraps `real` with a freshly allocated shadow of the same size.
    ///
    /// The real buffer should have been created with
    /// [`BufferUsage::for_shadowed_buffer`] applied to the requested usage.
    pub fn new(real: B) -> Self {
        let shadow = SystemMemoryBuffer::new(real.size_in_bytes(), BufferUsage::DYNAMIC);
        Self {
            real,
            shadow,
            locked: false,
            lock_start: 0,
            lock_size: 0,
            dirty: None,
            suppress_hardware_update: false,
        }
    }

    /// The buffer that receives synchronised data.
    pub fn real(&self) -> &B {
        &self.real
    }

    /// Start of the most recent lock.
    pub fn lock_start(&self) -> usize {
        self.lock_start
    }

    /// Length of the most recent lock.
    pub fn lock_size(&self) -> usize {
        self.lock_size
    }

    /// Returns `true` if the shadow holds writes the real buffer has not seen.
    pub fn shadow_updated(&self) -> bool {
        self.dirty.is_some()
    }

    /// Returns `true` while unlocks skip the shadow-to-hardware copy.
    pub fn is_hardware_update_suppressed(&self) -> bool {
        self.suppress_hardware_update
    }

    /// Stops (or resumes) copying the shadow to the real buffer on unlock.
    ///
    /// Resuming immediately pushes any pending writes.
    pub fn suppress_hardware_update(&mut self, suppress: bool) -> Result<(), BufferError> {
        self.suppress_hardware_update = suppress;
        if !suppress && !self.locked {
            self.update_from_shadow()?;
        }
        Ok(())
    }

    fn update_from_shadow(&mut self) -> Result<(), BufferError> {
        let Some(region) = self.dirty.clone() else {
            return Ok(());
        };
        if self.suppress_hardware_update {
            return Ok(());
        }

        let size = self.real.size_in_bytes();
        let length = region.end - region.start;
        let mode = if region.start == 0 && length == size {
            LockMode::Discard
        } else {
            LockMode::Normal
        };

        let src = self.shadow.lock(region.start, length, LockMode::ReadOnly)?;
        let dest = match self.real.lock(region.start, length, mode) {
            Ok(dest) => dest,
            Err(err) => {
                self.shadow.unlock()?;
                return Err(err);
            }
        };
        dest.copy_from_slice(src);

        let real_released = self.real.unlock();
        let shadow_released = self.shadow.unlock();
        real_released.and(shadow_released)?;

        self.dirty = None;
        log::trace!(
            "ShadowedBuffer: Synchronised {} bytes at offset {} ({:?}).",
            length,
            region.start,
            mode
        );
        Ok(())
    }
}

impl<B: HardwareBuffer> HardwareBuffer for ShadowedBuffer<B> {
    fn size_in_bytes(&self) -> usize {
        self.real.size_in_bytes()
    }

    fn usage(&self) -> BufferUsage {
        self.real.usage()
    }

    fn is_system_memory(&self) -> bool {
        self.real.is_system_memory()
    }

    fn has_shadow_buffer(&self) -> bool {
        true
    }

    fn is_locked(&self) -> bool {
        self.locked || self.shadow.is_locked() || self.real.is_locked()
    }

    fn lock(
        &mut self,
        offset: usize,
        length: usize,
        mode: LockMode,
    ) -> Result<&mut [u8], BufferError> {
        if self.is_locked() {
            return Err(BufferError::AlreadyLocked);
        }
        check_region(offset, length, self.real.size_in_bytes())?;

        let data = self.shadow.lock(offset, length, mode)?;
        if mode != LockMode::ReadOnly {
            let end = offset + length;
            self.dirty = Some(match self.dirty.take() {
                Some(prev) => prev.start.min(offset)..prev.end.max(end),
                None => offset..end,
            });
        }
        self.locked = true;
        self.lock_start = offset;
        self.lock_size = length;
        Ok(data)
    }

    fn unlock(&mut self) -> Result<(), BufferError> {
        if !self.locked {
            return Err(BufferError::NotLocked);
        }
        self.shadow.unlock()?;
        self.locked = false;
        self.update_from_shadow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::buffer::WriteHint;

    /// Records every lock taken on the real buffer.
    #[derive(Debug)]
    struct RecordingBuffer {
        inner: SystemMemoryBuffer,
        locks: Vec<(usize, usize, LockMode)>,
    }

    impl RecordingBuffer {
        fn new(size: usize) -> Self {
            Self {
                inner: SystemMemoryBuffer::new(size, BufferUsage::STATIC_WRITE_ONLY),
                locks: Vec::new(),
            }
        }
    }

    impl HardwareBuffer for RecordingBuffer {
        fn size_in_bytes(&self) -> usize {
            self.inner.size_in_bytes()
        }
        fn usage(&self) -> BufferUsage {
            self.inner.usage()
        }
        fn is_system_memory(&self) -> bool {
            false
        }
        fn is_locked(&self) -> bool {
            self.inner.is_locked()
        }
        fn lock(
            &mut self,
            offset: usize,
            length: usize,
            mode: LockMode,
        ) -> Result<&mut [u8], BufferError> {
            self.locks.push((offset, length, mode));
            self.inner.lock(offset, length, mode)
        }
        fn unlock(&mut self) -> Result<(), BufferError> {
            self.inner.unlock()
        }
    }

    #[test]
    fn test_whole_buffer_write_syncs_with_discard() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(16));
        buf.write_data(0, &[7; 16], WriteHint::DiscardWholeBuffer)
            .unwrap();

        assert!(!buf.shadow_updated());
        assert_eq!(buf.real().locks, vec![(0, 16, LockMode::Discard)]);
        assert_eq!(buf.real().inner.contents(), Some(&[7u8; 16][..]));
    }

    #[test]
    fn test_partial_write_syncs_only_the_region() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(16));
        buf.write_data(4, &[1, 2, 3, 4], WriteHint::Normal).unwrap();

        assert_eq!(buf.real().locks, vec![(4, 4, LockMode::Normal)]);
        assert_eq!(buf.lock_start(), 4);
        assert_eq!(buf.lock_size(), 4);
    }

    #[test]
    fn test_read_only_lock_never_touches_real_buffer() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(8));
        let mut out = [0u8; 8];
        buf.read_data(0, &mut out).unwrap();
        assert!(buf.real().locks.is_empty());
        assert!(!buf.shadow_updated());
    }

    #[test]
    fn test_double_lock_is_rejected() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(8));
        buf.lock(0, 4, LockMode::Normal).unwrap();
        assert!(buf.is_locked());
        assert_eq!(
            buf.lock(4, 4, LockMode::Normal).unwrap_err(),
            BufferError::AlreadyLocked
        );
        buf.unlock().unwrap();
        assert_eq!(buf.unlock().unwrap_err(), BufferError::NotLocked);
    }

    #[test]
    fn test_suppressed_updates_are_flushed_on_resume() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(16));
        buf.suppress_hardware_update(true).unwrap();
        buf.write_data(0, &[1, 1], WriteHint::Normal).unwrap();
        buf.write_data(10, &[2, 2], WriteHint::Normal).unwrap();
        assert!(buf.real().locks.is_empty());
        assert!(buf.shadow_updated());

        buf.suppress_hardware_update(false).unwrap();
        assert_eq!(buf.real().locks, vec![(0, 12, LockMode::Normal)]);
        assert!(!buf.shadow_updated());

        let real = buf.real().inner.contents().unwrap();
        assert_eq!(&real[0..2], &[1, 1]);
        assert_eq!(&real[10..12], &[2, 2]);
    }

    #[test]
    fn test_out_of_range_lock_is_rejected() {
        let mut buf = ShadowedBuffer::new(RecordingBuffer::new(8));
        assert!(matches!(
            buf.lock(4, 8, LockMode::Normal),
            Err(BufferError::OutOfBounds { .. })
        ));
        assert!(!buf.is_locked());
    }
}
