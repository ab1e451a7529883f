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

mod common;

use anyhow::Result;
use common::SystemMemoryManager;
use tessera_core::renderer::api::buffer::{ShadowedBuffer, SystemMemoryBuffer};
use tessera_core::renderer::{
    BufferError, BufferUsage, HardwareBuffer, HardwareBufferManager, IndexType, LockMode,
    WriteHint,
};

#[test]
fn lock_then_unlock_restores_unlocked_state() -> Result<()> {
    let manager = SystemMemoryManager;
    for shadowed in [false, true] {
        let vb = manager.create_vertex_buffer(12, 4, BufferUsage::STATIC, shadowed)?;
        vb.try_with(|b| {
            assert!(!b.is_locked());
            b.lock(0, 24, LockMode::Normal)?;
            assert!(b.is_locked());
            b.unlock()?;
            assert!(!b.is_locked());
            Ok(())
        })?;

        // A second unlock is a contract violation.
        assert_eq!(vb.try_with(|b| b.unlock()), Err(BufferError::NotLocked));
    }
    Ok(())
}

#[test]
fn shadow_round_trip_reads_back_written_bytes() -> Result<()> {
    // ARRANGE
    let mut buffer = ShadowedBuffer::new(SystemMemoryBuffer::new(
        32,
        BufferUsage::STATIC.for_shadowed_buffer(),
    ));
    let payload: Vec<u8> = (0..16).collect();

    // ACT
    buffer.write_data(8, &payload, WriteHint::Normal)?;
    let mut out = vec![0u8; 16];
    buffer.read_data(8, &mut out)?;

    // ASSERT
    assert_eq!(out, payload);
    assert!(!buffer.shadow_updated());
    assert_eq!(buffer.real().contents().map(|c| &c[8..24]), Some(&payload[..]));
    assert_eq!(buffer.usage(), BufferUsage::STATIC_WRITE_ONLY);
    Ok(())
}

#[test]
fn out_of_bounds_access_is_rejected() -> Result<()> {
    let manager = SystemMemoryManager;
    let vb = manager.create_vertex_buffer(4, 3, BufferUsage::DYNAMIC, true)?;
    let err = vb.try_with(|b| b.write_data(8, &[0; 16], WriteHint::Normal));
    assert_eq!(
        err,
        Err(BufferError::OutOfBounds {
            offset: 8,
            length: 16,
            size: 12
        })
    );
    assert!(!vb.with(|b| b.is_locked())?);
    Ok(())
}

#[test]
fn end_to_end_write_then_read_of_three_float3_vertices() -> Result<()> {
    // ARRANGE
    let manager = SystemMemoryManager;
    let vb = manager.create_vertex_buffer(12, 3, BufferUsage::STATIC_WRITE_ONLY, true)?;
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let bytes: &[u8] = bytemuck::cast_slice(&positions);
    assert_eq!(bytes.len(), 36);

    // ACT
    vb.try_with(|b| b.write_data(0, bytes, WriteHint::DiscardWholeBuffer))?;
    let mut out = vec![0u8; 36];
    vb.try_with(|b| b.read_data(0, &mut out))?;

    // ASSERT
    assert_eq!(out, bytes);
    assert!(!vb.with(|b| b.is_locked())?);
    Ok(())
}

#[test]
fn index_buffers_follow_the_same_protocol() -> Result<()> {
    let manager = SystemMemoryManager;
    let ib = manager.create_index_buffer(IndexType::Size16, 6, BufferUsage::STATIC, false)?;
    let indices: [u16; 6] = [0, 1, 2, 2, 1, 3];
    ib.try_with(|b| b.write_data(0, bytemuck::cast_slice(&indices), WriteHint::Normal))?;

    let mut out = [0u8; 12];
    ib.try_with(|b| b.read_data(0, &mut out))?;
    assert_eq!(&out[..], bytemuck::cast_slice::<u16, u8>(&indices));
    assert_eq!(ib.with(|b| b.num_indices())?, 6);
    Ok(())
}
