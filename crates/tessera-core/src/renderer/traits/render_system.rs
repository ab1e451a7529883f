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

use crate::math::Mat4;
use crate::renderer::api::operation::RenderOperation;
use crate::renderer::api::scene::Material;
use crate::renderer::api::stats::RenderStats;
use crate::renderer::error::RenderError;

/// What a render system can do on the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSystemCapabilities {
    /// Vertices can be blended by the device; otherwise blending happens on the CPU.
    pub vertex_blending: bool,
    /// The largest world matrix palette accepted by `set_world_matrices`.
    pub max_world_matrices: usize,
}

impl Default for RenderSystemCapabilities {
    fn default() -> Self {
        Self {
            vertex_blending: false,
            max_world_matrices: 256,
        }
    }
}

/// Trait representing a render system.
///
/// The render path drives it once per frame: `begin_frame`, then for every
/// drawable the state setters followed by `render`, then `end_frame`.
pub trait RenderSystem: std::fmt::Debug + Send + Sync {
    /// The device capabilities.
    fn capabilities(&self) -> &RenderSystemCapabilities;

    /// Starts a new frame, resetting per-frame counters.
    fn begin_frame(&mut self);

    /// Finishes the frame and returns its statistics.
    fn end_frame(&mut self) -> RenderStats;

    /// Sets the world matrices used by the next render call.
    fn set_world_matrices(&mut self, matrices: &[Mat4]) -> Result<(), RenderError>;

    /// Ignore the view matrix for the next render call.
    fn set_identity_view(&mut self, enabled: bool);

    /// Ignore the projection matrix for the next render call.
    fn set_identity_projection(&mut self, enabled: bool);

    /// Whether the draws that follow may cast shadows.
    ///
    /// Set once per queue group. Backends without shadows ignore it.
    fn set_shadow_casting(&mut self, _enabled: bool) {}

    /// Binds the state of `material` for subsequent render calls.
    fn bind_material(&mut self, material: &Material) -> Result<(), RenderError>;

    /// Issues one render operation.
    fn render(&mut self, op: &RenderOperation<'_>) -> Result<(), RenderError>;

    /// The statistics of the last finished frame.
    fn last_frame_stats(&self) -> &RenderStats;
}
