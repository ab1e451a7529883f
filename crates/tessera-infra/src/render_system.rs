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

//! A [`RenderSystem`] that records draws instead of rasterising them.

use tessera_core::math::Mat4;
use tessera_core::renderer::{
    software_vertex_blend, Material, MaterialId, OperationType, RenderError, RenderOperation,
    RenderStats, RenderSystem, RenderSystemCapabilities,
};
use tessera_core::settings::RenderSettings;

/// One render call as seen by the [`HeadlessRenderSystem`].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    /// The primitive topology.
    pub operation_type: OperationType,
    /// The material bound when the draw was issued.
    pub material: Option<MaterialId>,
    /// Indices consumed when indexed, vertices otherwise.
    pub element_count: usize,
    /// Triangles produced.
    pub primitive_count: usize,
    /// Whether the draw went through an index buffer.
    pub indexed: bool,
    /// The number of world matrices set for the draw.
    pub world_matrices: usize,
    /// The view matrix was replaced by identity.
    pub identity_view: bool,
    /// The projection matrix was replaced by identity.
    pub identity_projection: bool,
    /// Vertices were blended on the CPU before the draw.
    pub software_blended: bool,
    /// The draw belonged to a queue group with shadows enabled.
    pub casts_shadows: bool,
}

/// A render system without a device.
///
/// Tracks the state a real backend would set, blends vertices in software
/// when the capabilities lack vertex blending, and keeps a [`DrawRecord`] of
/// every draw in the current frame.
#[derive(Debug)]
pub struct HeadlessRenderSystem {
    capabilities: RenderSystemCapabilities,
    world_matrices: Vec<Mat4>,
    identity_view: bool,
    identity_projection: bool,
    casts_shadows: bool,
    bound_material: Option<MaterialId>,
    in_frame: bool,
    frame: RenderStats,
    last_frame_stats: RenderStats,
    draws: Vec<DrawRecord>,
}

impl Default for HeadlessRenderSystem {
    fn default() -> Self {
        Self::with_capabilities(RenderSystemCapabilities::default())
    }
}

impl HeadlessRenderSystem {
    /// Creates a render system with default capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a render system advertising `capabilities`.
    pub fn with_capabilities(capabilities: RenderSystemCapabilities) -> Self {
        Self {
            capabilities,
            world_matrices: vec![Mat4::IDENTITY],
            identity_view: false,
            identity_projection: false,
            casts_shadows: true,
            bound_material: None,
            in_frame: false,
            frame: RenderStats::default(),
            last_frame_stats: RenderStats::default(),
            draws: Vec::new(),
        }
    }

    /// Creates a render system configured from `settings`.
    pub fn with_settings(settings: &RenderSettings) -> Self {
        Self::with_capabilities(RenderSystemCapabilities {
            vertex_blending: settings.hardware_vertex_blending,
            ..RenderSystemCapabilities::default()
        })
    }

    /// The draws of the current (or last finished) frame.
    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    /// The world matrices set by the last `set_world_matrices` call.
    pub fn world_matrices(&self) -> &[Mat4] {
        &self.world_matrices
    }
}

impl RenderSystem for HeadlessRenderSystem {
    fn capabilities(&self) -> &RenderSystemCapabilities {
        &self.capabilities
    }

    fn begin_frame(&mut self) {
        self.frame.reset_counters();
        self.frame.frame_number += 1;
        self.draws.clear();
        self.bound_material = None;
        self.casts_shadows = true;
        self.in_frame = true;
    }

    fn end_frame(&mut self) -> RenderStats {
        self.in_frame = false;
        self.last_frame_stats = self.frame.clone();
        log::trace!(
            "HeadlessRenderSystem: Frame {} recorded {} draws.",
            self.frame.frame_number,
            self.draws.len()
        );
        self.last_frame_stats.clone()
    }

    fn set_world_matrices(&mut self, matrices: &[Mat4]) -> Result<(), RenderError> {
        if matrices.len() > self.capabilities.max_world_matrices {
            return Err(RenderError::InvalidOperation(format!(
                "{} world matrices exceed the limit of {}",
                matrices.len(),
                self.capabilities.max_world_matrices
            )));
        }
        self.world_matrices.clear();
        self.world_matrices.extend_from_slice(matrices);
        Ok(())
    }

    fn set_identity_view(&mut self, enabled: bool) {
        self.identity_view = enabled;
    }

    fn set_identity_projection(&mut self, enabled: bool) {
        self.identity_projection = enabled;
    }

    fn set_shadow_casting(&mut self, enabled: bool) {
        self.casts_shadows = enabled;
    }

    fn bind_material(&mut self, material: &Material) -> Result<(), RenderError> {
        if self.bound_material != Some(material.id()) {
            self.bound_material = Some(material.id());
            self.frame.material_changes += 1;
            log::trace!("HeadlessRenderSystem: Bound material '{}'.", material.name());
        }
        Ok(())
    }

    fn render(&mut self, op: &RenderOperation<'_>) -> Result<(), RenderError> {
        if !self.in_frame {
            return Err(RenderError::InvalidOperation(
                "render called outside of a frame".to_string(),
            ));
        }

        let software_blended = !self.capabilities.vertex_blending
            && op
                .vertex_data
                .software_blend
                .as_ref()
                .is_some_and(|info| info.automatic);
        if software_blended {
            software_vertex_blend(op.vertex_data, &self.world_matrices)?;
        }

        self.frame.record_operation(op);
        self.draws.push(DrawRecord {
            operation_type: op.operation_type,
            material: self.bound_material,
            element_count: op.element_count(),
            primitive_count: op.primitive_count(),
            indexed: op.use_indices,
            world_matrices: self.world_matrices.len(),
            identity_view: self.identity_view,
            identity_projection: self.identity_projection,
            software_blended,
            casts_shadows: self.casts_shadows,
        });
        Ok(())
    }

    fn last_frame_stats(&self) -> &RenderStats {
        &self.last_frame_stats
    }
}
