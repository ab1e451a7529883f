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

//! CPU vertex blending for render systems that cannot blend on the device.

use crate::math::{Mat4, Vec3};
use crate::renderer::api::buffer::{HardwareBuffer, LockMode};
use crate::renderer::api::geometry::{SoftwareBlendInfo, VertexData};
use crate::renderer::api::vertex::{VertexElement, VertexElementSemantic, VertexElementType};
use crate::renderer::error::{BufferError, LayoutError, RenderError};

/// Blends the source positions (and normals) of `vertex_data` with `matrices`
/// and writes the result into its bound vertex buffers.
///
/// Does nothing when the vertex data carries no [`SoftwareBlendInfo`]. The
/// position and normal elements must be `Float3`.
pub fn software_vertex_blend(vertex_data: &VertexData, matrices: &[Mat4]) -> Result<(), RenderError> {
    let Some(info) = vertex_data.software_blend.as_ref() else {
        return Ok(());
    };
    let count = vertex_data.vertex_count;
    check_blend_source(info, count)?;

    let position = float3_element(vertex_data, VertexElementSemantic::Position)?
        .ok_or(LayoutError::MissingPosition)?;
    let normal = match info.src_normals {
        Some(_) => float3_element(vertex_data, VertexElementSemantic::Normal)?,
        None => None,
    };

    let mut positions = Vec::with_capacity(count);
    let mut normals = Vec::with_capacity(if normal.is_some() { count } else { 0 });

    for v in 0..count {
        let src_pos = read_vec3(&info.src_positions, v);
        let src_norm = info.src_normals.as_deref().map(|n| read_vec3(n, v));
        let mut pos = Vec3::ZERO;
        let mut norm = Vec3::ZERO;

        for j in 0..info.weights_per_vertex {
            let k = v * info.weights_per_vertex + j;
            let weight = info.blend_weights[k];
            let index = info.blend_indices[k] as usize;
            let matrix = matrices.get(index).ok_or_else(|| {
                RenderError::InvalidOperation(format!(
                    "blend index {index} exceeds the {} world matrices supplied",
                    matrices.len()
                ))
            })?;
            pos += matrix.transform_point(src_pos) * weight;
            if let Some(n) = src_norm {
                norm += matrix.transform_vector(n) * weight;
            }
        }

        positions.push(pos);
        if normal.is_some() {
            normals.push(norm.normalize());
        }
    }

    write_vec3_attribute(vertex_data, &position, &positions)?;
    if let Some(normal) = normal {
        write_vec3_attribute(vertex_data, &normal, &normals)?;
    }
    log::trace!(
        "Software-blended {} vertices with {} weights each.",
        count,
        info.weights_per_vertex
    );
    Ok(())
}

fn check_blend_source(info: &SoftwareBlendInfo, count: usize) -> Result<(), RenderError> {
    let weights = count * info.weights_per_vertex;
    let too_short = info.weights_per_vertex == 0
        || info.src_positions.len() < count * 3
        || info.blend_weights.len() < weights
        || info.blend_indices.len() < weights
        || info
            .src_normals
            .as_ref()
            .is_some_and(|n| n.len() < count * 3);
    if too_short {
        return Err(RenderError::InvalidOperation(format!(
            "software blend data does not cover {count} vertices"
        )));
    }
    Ok(())
}

fn float3_element(
    vertex_data: &VertexData,
    semantic: VertexElementSemantic,
) -> Result<Option<VertexElement>, RenderError> {
    match vertex_data.declaration.find_element_by_semantic(semantic, 0) {
        Some(e) if e.element_type() == VertexElementType::Float3 => Ok(Some(*e)),
        Some(e) => Err(RenderError::InvalidOperation(format!(
            "{semantic:?} must be Float3 for software blending, found {:?}",
            e.element_type()
        ))),
        None => Ok(None),
    }
}

fn read_vec3(values: &[f32], vertex: usize) -> Vec3 {
    let at = vertex * 3;
    Vec3::new(values[at], values[at + 1], values[at + 2])
}

fn write_vec3_attribute(
    vertex_data: &VertexData,
    element: &VertexElement,
    values: &[Vec3],
) -> Result<(), RenderError> {
    let buffer = vertex_data.binding.buffer(element.source())?;
    buffer.try_with(|b| {
        let stride = b.vertex_size();
        if element.offset() + element.size() > stride {
            return Err(BufferError::OutOfBounds {
                offset: element.offset(),
                length: element.size(),
                size: stride,
            });
        }
        let data = b.lock(
            vertex_data.vertex_start * stride,
            values.len() * stride,
            LockMode::Normal,
        )?;
        for (i, value) in values.iter().enumerate() {
            let at = i * stride + element.offset();
            data[at..at + element.size()].copy_from_slice(bytemuck::bytes_of(value));
        }
        b.unlock()
    })?;
    Ok(())
}
