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

use std::sync::Arc;

use anyhow::Result;
use tessera_core::math::{Mat4, Vec3};
use tessera_core::renderer::{
    BufferUsage, Camera, HardwareBuffer, HardwareBufferManager, IndexData, IndexType, Material,
    MeshRenderable, QueueRenderer, RenderQueue, RenderQueueGroupId, VertexData,
    VertexElementSemantic, VertexElementType, WriteHint,
};
use tessera_core::EngineSettings;
use tessera_infra::{HeadlessRenderSystem, SoftwareBufferManager};

/// A unit quad: position and texture coordinates, two triangles.
const QUAD_VERTICES: [f32; 20] = [
    -0.5, -0.5, 0.0, 0.0, 1.0, //
    0.5, -0.5, 0.0, 1.0, 1.0, //
    0.5, 0.5, 0.0, 1.0, 0.0, //
    -0.5, 0.5, 0.0, 0.0, 0.0,
];
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

fn build_quad(
    manager: &SoftwareBufferManager,
    settings: &EngineSettings,
) -> Result<(VertexData, IndexData)> {
    let shadowed = settings.buffers.use_shadow_buffers;

    let mut vertex_data = VertexData::new(manager);
    vertex_data.declaration.add_element(
        0,
        0,
        VertexElementType::Float3,
        VertexElementSemantic::Position,
        0,
    )?;
    vertex_data.declaration.add_element(
        0,
        12,
        VertexElementType::Float2,
        VertexElementSemantic::TexCoords,
        0,
    )?;
    let stride = vertex_data.declaration.vertex_size(0);
    let vb = manager.create_vertex_buffer(stride, 4, BufferUsage::STATIC_WRITE_ONLY, shadowed)?;
    vb.try_with(|b| {
        b.write_data(
            0,
            bytemuck::cast_slice(&QUAD_VERTICES),
            WriteHint::DiscardWholeBuffer,
        )
    })?;
    vertex_data.binding.set_binding(0, vb);
    vertex_data.vertex_count = 4;

    let ib = manager.create_index_buffer(
        IndexType::Size16,
        QUAD_INDICES.len(),
        BufferUsage::STATIC_WRITE_ONLY,
        shadowed,
    )?;
    ib.try_with(|b| {
        b.write_data(
            0,
            bytemuck::cast_slice(&QUAD_INDICES),
            WriteHint::DiscardWholeBuffer,
        )
    })?;
    let index_data = IndexData::new(ib, 0, QUAD_INDICES.len());

    Ok((vertex_data, index_data))
}

fn fill_queue(
    queue: &mut RenderQueue,
    vertex_data: &VertexData,
    index_data: &IndexData,
) -> Result<()> {
    let brick = Arc::new(Material::opaque("brick"));
    let grass = Arc::new(Material::opaque("grass"));
    let water = Arc::new(Material::transparent("water"));
    let overlay = Arc::new(Material::transparent("overlay"));

    for i in 0..8 {
        let material = if i % 2 == 0 { &brick } else { &grass };
        let position = Vec3::new(i as f32 - 4.0, 0.0, -5.0);
        let mesh = MeshRenderable::new(
            Arc::clone(material),
            vertex_data.clone(),
            Some(index_data.clone()),
        )
        .with_transform(Mat4::from_translation(position));
        queue.add_renderable(Arc::new(mesh))?;
    }

    for z in [-3.0, -9.0, -6.0] {
        let mesh = MeshRenderable::new(
            Arc::clone(&water),
            vertex_data.clone(),
            Some(index_data.clone()),
        )
        .with_transform(Mat4::from_translation(Vec3::new(0.0, -1.0, z)));
        queue.add_renderable(Arc::new(mesh))?;
    }

    let hud = MeshRenderable::new(overlay, vertex_data.clone(), Some(index_data.clone()));
    queue.add_renderable_with(Arc::new(hud), 0, RenderQueueGroupId::Overlay)?;
    Ok(())
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = match std::env::args().nth(1) {
        Some(path) => EngineSettings::load(path)?,
        None => EngineSettings::default(),
    };

    let manager = SoftwareBufferManager::new();
    let (vertex_data, index_data) = build_quad(&manager, &settings)?;

    let mut queue = RenderQueue::with_settings(&settings.queue);
    fill_queue(&mut queue, &vertex_data, &index_data)?;

    let mut camera = Camera::new("main", Vec3::new(0.0, 2.0, 5.0));
    let renderer = QueueRenderer::with_settings(&settings);
    let mut system = HeadlessRenderSystem::with_settings(&settings.render);

    for frame in 0..settings.render.frames {
        camera.set_position(Vec3::new(frame as f32, 2.0, 5.0));
        camera.look_at(Vec3::new(0.0, 0.0, -5.0));
        let stats = renderer.render_frame(&mut queue, &camera, &mut system)?;
        log::info!(
            "Frame {}: {} draw calls, {} faces, {} material changes.",
            stats.frame_number,
            stats.draw_calls,
            stats.faces_rendered,
            stats.material_changes
        );
    }

    log::info!(
        "Done. {} buffers alive holding {} bytes.",
        manager.live_buffers(),
        manager.allocated_bytes()
    );
    Ok(())
}
