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

//! The innermost level of the render queue: drawables of one priority.

use std::sync::Arc;

use ahash::AHashMap;

use crate::renderer::api::scene::{Camera, MaterialHandle, MaterialId, Renderable};
use crate::renderer::error::QueueError;

/// The opaque drawables sharing one material.
#[derive(Debug, Clone)]
pub struct MaterialBucket {
    material: MaterialHandle,
    renderables: Vec<Arc<dyn Renderable>>,
}

impl MaterialBucket {
    /// The material every drawable in the bucket uses.
    pub fn material(&self) -> &MaterialHandle {
        &self.material
    }

    /// The drawables, in submission order.
    pub fn renderables(&self) -> &[Arc<dyn Renderable>] {
        &self.renderables
    }

    /// The number of drawables.
    pub fn len(&self) -> usize {
        self.renderables.len()
    }

    /// Returns `true` if the bucket holds no drawables.
    pub fn is_empty(&self) -> bool {
        self.renderables.is_empty()
    }
}

/// Drawables of one priority, split into per-material buckets for opaque
/// drawables and a single list for transparent ones.
///
/// Buckets are visited in the order their material was first seen, and they
/// survive [`clear`](Self::clear) so that order is stable across frames.
#[derive(Debug, Clone, Default)]
pub struct RenderPriorityGroup {
    bucket_index: AHashMap<MaterialId, usize>,
    buckets: Vec<MaterialBucket>,
    transparents: Vec<Arc<dyn Renderable>>,
}

impl RenderPriorityGroup {
    /// Creates an empty priority group.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `item` under its material, or in the transparent list.
    pub fn add_renderable(&mut self, item: Arc<dyn Renderable>) -> Result<(), QueueError> {
        let material = item.material().ok_or(QueueError::MissingMaterial)?;
        if material.is_transparent() {
            self.transparents.push(item);
            return Ok(());
        }

        let position = match self.bucket_index.get(&material.id()) {
            Some(&position) => position,
            None => {
                let position = self.buckets.len();
                self.bucket_index.insert(material.id(), position);
                self.buckets.push(MaterialBucket {
                    material: Arc::clone(material),
                    renderables: Vec::new(),
                });
                position
            }
        };
        self.buckets[position].renderables.push(item);
        Ok(())
    }

    /// The per-material buckets of opaque drawables, including empty ones.
    pub fn material_groups(&self) -> &[MaterialBucket] {
        &self.buckets
    }

    /// The number of material buckets.
    pub fn num_material_groups(&self) -> usize {
        self.buckets.len()
    }

    /// The transparent drawables, in their current order.
    pub fn transparent_objects(&self) -> &[Arc<dyn Renderable>] {
        &self.transparents
    }

    /// Orders transparent drawables back to front as seen from `camera`.
    ///
    /// Equal depths keep their submission order.
    pub fn sort_transparent_objects(&mut self, camera: &Camera) {
        if self.transparents.len() < 2 {
            return;
        }
        let mut keyed: Vec<(f32, Arc<dyn Renderable>)> = self
            .transparents
            .drain(..)
            .map(|item| (item.squared_view_depth(camera), item))
            .collect();
        keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
        self.transparents
            .extend(keyed.into_iter().map(|(_, item)| item));
    }

    /// Empties every bucket and the transparent list, keeping the buckets.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.renderables.clear();
        }
        self.transparents.clear();
    }

    /// The number of drawables held, opaque and transparent.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(MaterialBucket::len).sum::<usize>() + self.transparents.len()
    }

    /// Returns `true` if no drawables are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
