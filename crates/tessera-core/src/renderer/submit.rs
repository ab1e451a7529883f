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

//! Walks a render queue and feeds its drawables to a render system.

use crate::renderer::api::scene::{Camera, MaterialId, Renderable};
use crate::renderer::api::stats::RenderStats;
use crate::renderer::error::RenderError;
use crate::renderer::queue::{RenderPriorityGroup, RenderQueue};
use crate::renderer::traits::RenderSystem;
use crate::settings::EngineSettings;

/// Issues the contents of a [`RenderQueue`] in queue order.
///
/// Groups and priorities are visited in ascending order. Within a priority,
/// opaque buckets go first with one material bind each, followed by the
/// transparent drawables back to front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRenderer {
    validate_bindings: bool,
    sort_transparents: bool,
}

impl Default for QueueRenderer {
    fn default() -> Self {
        Self {
            validate_bindings: true,
            sort_transparents: true,
        }
    }
}

impl QueueRenderer {
    /// Creates a renderer that validates bindings and sorts transparents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a renderer configured from `settings`.
    pub fn with_settings(settings: &EngineSettings) -> Self {
        Self {
            validate_bindings: settings.buffers.validate_bindings,
            sort_transparents: settings.queue.sort_transparents,
        }
    }

    /// Renders one full frame: `begin_frame`, the queue, `end_frame`.
    ///
    /// The frame is closed even when the queue fails to render; the error is
    /// returned after `end_frame`.
    pub fn render_frame(
        &self,
        queue: &mut RenderQueue,
        camera: &Camera,
        system: &mut dyn RenderSystem,
    ) -> Result<RenderStats, RenderError> {
        system.begin_frame();
        let rendered = self.render_queue(queue, camera, system);
        let stats = system.end_frame();
        if let Err(err) = rendered {
            log::warn!(
                "QueueRenderer: Frame {} for camera '{}' aborted: {}",
                stats.frame_number,
                camera.name(),
                err
            );
            return Err(err);
        }
        log::debug!(
            "Frame {} for camera '{}': {} draw calls, {} faces, {} material changes.",
            stats.frame_number,
            camera.name(),
            stats.draw_calls,
            stats.faces_rendered,
            stats.material_changes
        );
        Ok(stats)
    }

    /// Issues every queued drawable to `system`.
    pub fn render_queue(
        &self,
        queue: &mut RenderQueue,
        camera: &Camera,
        system: &mut dyn RenderSystem,
    ) -> Result<(), RenderError> {
        if self.sort_transparents {
            queue.sort_transparent_objects(camera);
        }
        for (_, group) in queue.groups() {
            system.set_shadow_casting(group.shadows_enabled());
            for (_, priority_group) in group.priority_groups() {
                self.render_priority_group(priority_group, system)?;
            }
        }
        Ok(())
    }

    fn render_priority_group(
        &self,
        group: &RenderPriorityGroup,
        system: &mut dyn RenderSystem,
    ) -> Result<(), RenderError> {
        for bucket in group.material_groups() {
            if bucket.is_empty() {
                continue;
            }
            system.bind_material(bucket.material())?;
            for item in bucket.renderables() {
                self.render_single(item.as_ref(), system)?;
            }
        }

        let mut bound: Option<MaterialId> = None;
        for item in group.transparent_objects() {
            if let Some(material) = item.material() {
                if bound != Some(material.id()) {
                    system.bind_material(material)?;
                    bound = Some(material.id());
                }
            }
            self.render_single(item.as_ref(), system)?;
        }
        Ok(())
    }

    fn render_single(
        &self,
        item: &dyn Renderable,
        system: &mut dyn RenderSystem,
    ) -> Result<(), RenderError> {
        let op = item.render_operation();
        op.validate()?;
        if self.validate_bindings {
            op.vertex_data.validate()?;
        }
        system.set_world_matrices(item.world_transforms())?;
        system.set_identity_view(item.use_identity_view());
        system.set_identity_projection(item.use_identity_projection());
        system.render(&op)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{Mat4, Vec3};
    use crate::renderer::api::geometry::VertexData;
    use crate::renderer::api::operation::{OperationType, RenderOperation};
    use crate::renderer::api::scene::{Material, MaterialHandle};
    use crate::renderer::queue::RenderQueueGroupId;
    use crate::renderer::traits::RenderSystemCapabilities;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Bind(String),
        Draw(usize),
    }

    #[derive(Debug, Default)]
    struct RecordingSystem {
        caps: RenderSystemCapabilities,
        events: Vec<Event>,
        stats: RenderStats,
        last: RenderStats,
        frames_ended: u32,
        shadow_casting: Vec<bool>,
    }

    impl RenderSystem for RecordingSystem {
        fn capabilities(&self) -> &RenderSystemCapabilities {
            &self.caps
        }
        fn begin_frame(&mut self) {
            self.stats.frame_number += 1;
            self.stats.reset_counters();
        }
        fn end_frame(&mut self) -> RenderStats {
            self.frames_ended += 1;
            self.last = self.stats.clone();
            self.last.clone()
        }
        fn set_world_matrices(&mut self, _matrices: &[Mat4]) -> Result<(), RenderError> {
            Ok(())
        }
        fn set_identity_view(&mut self, _enabled: bool) {}
        fn set_identity_projection(&mut self, _enabled: bool) {}
        fn set_shadow_casting(&mut self, enabled: bool) {
            self.shadow_casting.push(enabled);
        }
        fn bind_material(&mut self, material: &Material) -> Result<(), RenderError> {
            self.stats.material_changes += 1;
            self.events.push(Event::Bind(material.name().to_string()));
            Ok(())
        }
        fn render(&mut self, op: &RenderOperation<'_>) -> Result<(), RenderError> {
            self.stats.record_operation(op);
            self.events.push(Event::Draw(op.vertex_data.vertex_count));
            Ok(())
        }
        fn last_frame_stats(&self) -> &RenderStats {
            &self.last
        }
    }

    /// Tags itself through its vertex count so draws can be told apart.
    #[derive(Debug)]
    struct Tagged {
        material: MaterialHandle,
        transforms: Vec<Mat4>,
        vertex_data: VertexData,
    }

    fn tagged(material: &MaterialHandle, tag: usize, z: f32) -> Arc<dyn Renderable> {
        Arc::new(Tagged {
            material: Arc::clone(material),
            transforms: vec![Mat4::from_translation(Vec3::new(0.0, 0.0, z))],
            vertex_data: VertexData {
                vertex_count: tag,
                ..VertexData::default()
            },
        })
    }

    impl Renderable for Tagged {
        fn material(&self) -> Option<&MaterialHandle> {
            Some(&self.material)
        }
        fn render_operation(&self) -> RenderOperation<'_> {
            RenderOperation::new(OperationType::TriangleList, &self.vertex_data)
        }
        fn world_transforms(&self) -> &[Mat4] {
            &self.transforms
        }
    }

    #[test]
    fn test_render_order_groups_priorities_buckets_then_transparents() {
        let stone = Arc::new(Material::opaque("stone"));
        let glass = Arc::new(Material::transparent("glass"));
        let mut queue = RenderQueue::new();

        queue
            .add_renderable_with(tagged(&stone, 9, 0.0), 100, RenderQueueGroupId::Overlay)
            .unwrap();
        queue.add_renderable(tagged(&glass, 1, -1.0)).unwrap();
        queue.add_renderable(tagged(&stone, 3, 0.0)).unwrap();
        queue.add_renderable(tagged(&glass, 2, -2.0)).unwrap();
        queue
            .add_renderable_with(tagged(&stone, 6, 0.0), 0, RenderQueueGroupId::Main)
            .unwrap();

        let mut system = RecordingSystem::default();
        let camera = Camera::new("cam", Vec3::ZERO);
        let stats = QueueRenderer::new()
            .render_frame(&mut queue, &camera, &mut system)
            .unwrap();

        assert_eq!(
            system.events,
            vec![
                Event::Bind("stone".into()),
                Event::Draw(6),
                Event::Bind("stone".into()),
                Event::Draw(3),
                Event::Bind("glass".into()),
                Event::Draw(2),
                Event::Draw(1),
                Event::Bind("stone".into()),
                Event::Draw(9),
            ]
        );
        assert_eq!(stats.draw_calls, 5);
        assert_eq!(stats.material_changes, 4);
        assert_eq!(stats.frame_number, 1);
    }

    #[test]
    fn test_empty_buckets_after_clear_are_skipped() {
        let stone = Arc::new(Material::opaque("stone"));
        let mut queue = RenderQueue::new();
        queue.add_renderable(tagged(&stone, 3, 0.0)).unwrap();
        queue.clear();

        let mut system = RecordingSystem::default();
        let camera = Camera::new("cam", Vec3::ZERO);
        QueueRenderer::new()
            .render_queue(&mut queue, &camera, &mut system)
            .unwrap();
        assert!(system.events.is_empty());
    }

    #[test]
    fn test_unbound_stream_fails_validation() {
        use crate::renderer::api::vertex::{VertexElementSemantic, VertexElementType};
        use crate::renderer::error::LayoutError;

        let stone = Arc::new(Material::opaque("stone"));
        let mut vertex_data = VertexData::default();
        vertex_data
            .declaration
            .add_element(
                0,
                0,
                VertexElementType::Float3,
                VertexElementSemantic::Position,
                0,
            )
            .unwrap();
        let item: Arc<dyn Renderable> = Arc::new(Tagged {
            material: stone,
            transforms: vec![Mat4::IDENTITY],
            vertex_data,
        });
        let mut queue = RenderQueue::new();
        queue.add_renderable(item).unwrap();

        let mut system = RecordingSystem::default();
        let camera = Camera::new("cam", Vec3::ZERO);
        let err = QueueRenderer::new()
            .render_queue(&mut queue, &camera, &mut system)
            .unwrap_err();
        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::UnboundSource { stream: 0 })
        ));
    }

    fn unbound_position_item(material: MaterialHandle) -> Arc<dyn Renderable> {
        use crate::renderer::api::vertex::{VertexElementSemantic, VertexElementType};

        let mut vertex_data = VertexData::default();
        vertex_data
            .declaration
            .add_element(
                0,
                0,
                VertexElementType::Float3,
                VertexElementSemantic::Position,
                0,
            )
            .unwrap();
        Arc::new(Tagged {
            material,
            transforms: vec![Mat4::IDENTITY],
            vertex_data,
        })
    }

    #[test]
    fn test_failed_frame_is_still_ended() {
        use crate::renderer::error::LayoutError;

        let stone = Arc::new(Material::opaque("stone"));
        let mut queue = RenderQueue::new();
        queue.add_renderable(tagged(&stone, 3, 0.0)).unwrap();
        queue
            .add_renderable(unbound_position_item(Arc::clone(&stone)))
            .unwrap();

        let mut system = RecordingSystem::default();
        let camera = Camera::new("cam", Vec3::ZERO);
        let err = QueueRenderer::new()
            .render_frame(&mut queue, &camera, &mut system)
            .unwrap_err();

        assert!(matches!(
            err,
            RenderError::Layout(LayoutError::UnboundSource { stream: 0 })
        ));
        assert_eq!(system.frames_ended, 1);
        assert_eq!(system.last.frame_number, 1);
        assert_eq!(system.last.draw_calls, 1);
    }

    #[test]
    fn test_shadow_casting_follows_each_group() {
        let stone = Arc::new(Material::opaque("stone"));
        let mut queue = RenderQueue::new();
        queue.add_renderable(tagged(&stone, 3, 0.0)).unwrap();
        queue
            .add_renderable_with(tagged(&stone, 9, 0.0), 0, RenderQueueGroupId::Overlay)
            .unwrap();
        queue
            .queue_group(RenderQueueGroupId::Overlay)
            .set_shadows_enabled(false);

        let mut system = RecordingSystem::default();
        let camera = Camera::new("cam", Vec3::ZERO);
        QueueRenderer::new()
            .render_frame(&mut queue, &camera, &mut system)
            .unwrap();

        assert_eq!(system.shadow_casting, vec![true, false]);
    }
}
