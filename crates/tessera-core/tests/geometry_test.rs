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
use tessera_core::renderer::{
    BufferCopy, BufferUsage, HardwareBuffer, HardwareBufferManager, IndexData, IndexType,
    LayoutError, RenderError, VertexData, VertexElementSemantic, VertexElementType, WriteHint,
};

fn position_uv_data(manager: &SystemMemoryManager) -> Result<VertexData> {
    let mut data = VertexData::new(manager);
    data.declaration.add_element(
        0,
        0,
        VertexElementType::Float3,
        VertexElementSemantic::Position,
        0,
    )?;
    data.declaration.add_element(
        0,
        12,
        VertexElementType::Float2,
        VertexElementSemantic::TexCoords,
        0,
    )?;
    let stride = data.declaration.vertex_size(0);
    let vb = manager.create_vertex_buffer(stride, 4, BufferUsage::STATIC, true)?;
    vb.try_with(|b| b.write_data(0, &[1u8; 80], WriteHint::DiscardWholeBuffer))?;
    data.binding.set_binding(0, vb);
    data.vertex_count = 4;
    Ok(data)
}

#[test]
fn stride_of_position_and_texcoords_is_twenty_bytes() -> Result<()> {
    let data = position_uv_data(&SystemMemoryManager)?;
    assert_eq!(data.declaration.vertex_size(0), 20);
    data.validate()?;
    Ok(())
}

#[test]
fn semantic_lookup_finds_the_matching_element() -> Result<()> {
    let data = position_uv_data(&SystemMemoryManager)?;
    let uv = data
        .declaration
        .find_element_by_semantic(VertexElementSemantic::TexCoords, 0)
        .expect("texcoords present");
    assert_eq!(uv.offset(), 12);
    assert_eq!(uv.element_type(), VertexElementType::Float2);
    assert!(data
        .declaration
        .find_element_by_semantic(VertexElementSemantic::Normal, 0)
        .is_none());
    Ok(())
}

#[test]
fn second_texcoord_set_is_found_by_its_index() -> Result<()> {
    // --- ARRANGE ---
    let mut data = position_uv_data(&SystemMemoryManager)?;
    data.declaration.add_element(
        0,
        20,
        VertexElementType::Float2,
        VertexElementSemantic::TexCoords,
        1,
    )?;

    // --- ACT ---
    let first = data
        .declaration
        .find_element_by_semantic(VertexElementSemantic::TexCoords, 0);
    let second = data
        .declaration
        .find_element_by_semantic(VertexElementSemantic::TexCoords, 1);

    // --- ASSERT ---
    assert_eq!(first.map(|e| e.offset()), Some(12));
    let second = second.expect("second texcoord set present");
    assert_eq!(second.offset(), 20);
    assert_eq!(second.index(), 1);
    assert_eq!(second.element_type(), VertexElementType::Float2);
    assert!(data
        .declaration
        .find_element_by_semantic(VertexElementSemantic::TexCoords, 2)
        .is_none());
    assert_eq!(data.declaration.vertex_size(0), 28);
    Ok(())
}

#[test]
fn narrow_buffer_fails_binding_validation() -> Result<()> {
    let manager = SystemMemoryManager;
    let mut data = position_uv_data(&manager)?;
    let narrow = manager.create_vertex_buffer(12, 4, BufferUsage::STATIC, false)?;
    data.binding.set_binding(0, narrow);

    match data.validate() {
        Err(RenderError::Layout(LayoutError::StrideMismatch {
            stream,
            declared,
            buffer,
        })) => {
            assert_eq!((stream, declared, buffer), (0, 20, 12));
        }
        other => panic!("expected a stride mismatch, got {other:?}"),
    }
    Ok(())
}

#[test]
fn shared_clone_reuses_buffers_and_deep_clone_copies_them() -> Result<()> {
    // ARRANGE
    let manager = SystemMemoryManager;
    let data = position_uv_data(&manager)?;
    let original = data.binding.buffer(0)?.clone();

    // ACT
    let shared = data.clone_with(&manager, BufferCopy::Share)?;
    let deep = data.clone_with(&manager, BufferCopy::Deep)?;

    // ASSERT
    assert!(shared.binding.buffer(0)?.ptr_eq(&original));
    let copy = deep.binding.buffer(0)?;
    assert!(!copy.ptr_eq(&original));
    assert_eq!(deep.declaration, data.declaration);
    assert_eq!(
        copy.with(|b| (b.vertex_size(), b.num_vertices(), b.has_shadow_buffer()))?,
        (20, 4, true)
    );

    let mut bytes = [0u8; 80];
    copy.try_with(|b| b.read_data(0, &mut bytes))?;
    assert!(bytes.iter().all(|b| *b == 1));

    // Writes to the copy do not reach the original.
    copy.try_with(|b| b.write_data(0, &[9; 4], WriteHint::Normal))?;
    let mut head = [0u8; 4];
    original.try_with(|b| b.read_data(0, &mut head))?;
    assert_eq!(head, [1; 4]);
    Ok(())
}

#[test]
fn deep_clone_of_index_data_copies_indices() -> Result<()> {
    let manager = SystemMemoryManager;
    let ib = manager.create_index_buffer(IndexType::Size32, 3, BufferUsage::STATIC, false)?;
    let indices: [u32; 3] = [2, 1, 0];
    ib.try_with(|b| b.write_data(0, bytemuck::cast_slice(&indices), WriteHint::Normal))?;
    let data = IndexData::new(ib, 0, 3);

    let deep = data.clone_with(&manager, BufferCopy::Deep)?;
    assert!(!deep.buffer.ptr_eq(&data.buffer));
    let mut out = [0u8; 12];
    deep.buffer.try_with(|b| b.read_data(0, &mut out))?;
    assert_eq!(&out[..], bytemuck::cast_slice::<u32, u8>(&indices));
    assert_eq!(deep.index_count, 3);
    Ok(())
}
