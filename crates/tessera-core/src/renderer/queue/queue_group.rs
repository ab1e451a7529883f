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

//! The middle level of the render queue: one coarse group split by priority.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::priority_group::RenderPriorityGroup;
use crate::renderer::api::scene::{Camera, Renderable};
use crate::renderer::error::QueueError;

/// A coarse render group, such as the background or the overlay, holding
/// one [`RenderPriorityGroup`] per priority value.
#[derive(Debug, Clone)]
pub struct RenderQueueGroup {
    priority_groups: BTreeMap<u16, RenderPriorityGroup>,
    shadows_enabled: bool,
}

impl Default for RenderQueueGroup {
    fn default() -> Self {
        Self {
            priority_groups: BTreeMap::new(),
            shadows_enabled: true,
        }
    }
}

impl RenderQueueGroup {
    /// Creates an empty group with shadows enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `item` under `priority`, creating the priority group on first use.
    pub fn add_renderable(
        &mut self,
        item: Arc<dyn Renderable>,
        priority: u16,
    ) -> Result<(), QueueError> {
        self.priority_group_mut(priority).add_renderable(item)
    }

    /// Returns the priority group for `priority`, if it exists.
    pub fn priority_group(&self, priority: u16) -> Option<&RenderPriorityGroup> {
        self.priority_groups.get(&priority)
    }

    /// Returns the priority group for `priority`, creating it if needed.
    pub fn priority_group_mut(&mut self, priority: u16) -> &mut RenderPriorityGroup {
        self.priority_groups.entry(priority).or_insert_with(|| {
            log::debug!("RenderQueueGroup: Created priority group {priority}.");
            RenderPriorityGroup::new()
        })
    }

    /// Iterates over `(priority, group)` pairs in ascending priority order.
    pub fn priority_groups(&self) -> impl Iterator<Item = (u16, &RenderPriorityGroup)> {
        self.priority_groups.iter().map(|(p, g)| (*p, g))
    }

    /// The number of priority groups.
    pub fn num_priority_groups(&self) -> usize {
        self.priority_groups.len()
    }

    /// Whether drawables in this group cast shadows.
    pub fn shadows_enabled(&self) -> bool {
        self.shadows_enabled
    }

    /// Enables or disables shadow casting for this group.
    pub fn set_shadows_enabled(&mut self, enabled: bool) {
        self.shadows_enabled = enabled;
    }

    /// Sorts the transparent drawables of every priority group.
    pub fn sort_transparent_objects(&mut self, camera: &Camera) {
        for group in self.priority_groups.values_mut() {
            group.sort_transparent_objects(camera);
        }
    }

    /// Empties every priority group, keeping them.
    pub fn clear(&mut self) {
        for group in self.priority_groups.values_mut() {
            group.clear();
        }
    }

    /// The number of drawables held across all priorities.
    pub fn len(&self) -> usize {
        self.priority_groups.values().map(RenderPriorityGroup::len).sum()
    }

    /// Returns `true` if no drawables are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
