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

//! The render queue: drawables batched by group, priority and material.
//!
//! Drawables are filed into a [`RenderQueueGroup`] chosen by
//! [`RenderQueueGroupId`], then into a [`RenderPriorityGroup`] chosen by a
//! numeric priority, then into a per-material bucket (or the transparent
//! list). The render path walks groups and priorities in ascending order.
//! The whole structure is reused frame after frame; [`RenderQueue::clear`]
//! only empties the leaves.

mod priority_group;
mod queue_group;

pub use self::priority_group::{MaterialBucket, RenderPriorityGroup};
pub use self::queue_group::RenderQueueGroup;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::renderer::api::scene::{Camera, Renderable};
use crate::renderer::error::QueueError;
use crate::settings::QueueSettings;

/// The priority drawables are filed under when none is given.
pub const DEFAULT_PRIORITY: u16 = 100;

/// Identifies a coarse render group. Groups render in ascending order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum RenderQueueGroupId {
    /// Drawn first, behind everything.
    Background = 0,
    /// Sky geometry drawn before the world.
    SkiesEarly = 5,
    /// User group 1.
    One = 10,
    /// User group 2.
    Two = 20,
    /// The first batch of world geometry.
    WorldGeometryOne = 25,
    /// User group 3.
    Three = 30,
    /// User group 4.
    Four = 40,
    /// The default group for scene objects.
    #[default]
    Main = 50,
    /// User group 6.
    Six = 60,
    /// User group 7.
    Seven = 70,
    /// The second batch of world geometry.
    WorldGeometryTwo = 75,
    /// User group 8.
    Eight = 80,
    /// User group 9.
    Nine = 90,
    /// Sky geometry drawn after the world.
    SkiesLate = 95,
    /// Drawn last, on top of everything.
    Overlay = 100,
}

/// The top level of the render queue.
#[derive(Debug, Clone)]
pub struct RenderQueue {
    groups: BTreeMap<RenderQueueGroupId, RenderQueueGroup>,
    default_group: RenderQueueGroupId,
    default_priority: u16,
}

impl Default for RenderQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderQueue {
    /// Creates a queue holding only the `Main` group.
    pub fn new() -> Self {
        let mut groups = BTreeMap::new();
        groups.insert(RenderQueueGroupId::Main, RenderQueueGroup::new());
        Self {
            groups,
            default_group: RenderQueueGroupId::Main,
            default_priority: DEFAULT_PRIORITY,
        }
    }

    /// Creates a queue using the configured default group and priority.
    pub fn with_settings(settings: &QueueSettings) -> Self {
        let mut queue = Self::new();
        queue.default_group = settings.default_group;
        queue.default_priority = settings.default_priority;
        queue
    }

    /// Files `item` in the default group at the default priority.
    pub fn add_renderable(&mut self, item: Arc<dyn Renderable>) -> Result<(), QueueError> {
        self.add_renderable_with(item, self.default_priority, self.default_group)
    }

    /// Files `item` in `group` at `priority`.
    pub fn add_renderable_with(
        &mut self,
        item: Arc<dyn Renderable>,
        priority: u16,
        group: RenderQueueGroupId,
    ) -> Result<(), QueueError> {
        self.queue_group(group).add_renderable(item, priority)
    }

    /// Returns the group for `id`, creating it if needed.
    pub fn queue_group(&mut self, id: RenderQueueGroupId) -> &mut RenderQueueGroup {
        self.groups.entry(id).or_insert_with(|| {
            log::debug!("RenderQueue: Created queue group {id:?}.");
            RenderQueueGroup::new()
        })
    }

    /// Returns the group for `id`, if it exists.
    pub fn group(&self, id: RenderQueueGroupId) -> Option<&RenderQueueGroup> {
        self.groups.get(&id)
    }

    /// Iterates over `(id, group)` pairs in render order.
    pub fn groups(&self) -> impl Iterator<Item = (RenderQueueGroupId, &RenderQueueGroup)> {
        self.groups.iter().map(|(id, group)| (*id, group))
    }

    /// The number of groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// The group drawables go to when none is given.
    pub fn default_group(&self) -> RenderQueueGroupId {
        self.default_group
    }

    /// Changes the default group.
    pub fn set_default_group(&mut self, id: RenderQueueGroupId) {
        self.default_group = id;
    }

    /// The priority drawables get when none is given.
    pub fn default_priority(&self) -> u16 {
        self.default_priority
    }

    /// Sorts transparent drawables in every group for `camera`.
    ///
    /// Depth is camera-relative, so this runs every frame and for every camera.
    pub fn sort_transparent_objects(&mut self, camera: &Camera) {
        for group in self.groups.values_mut() {
            group.sort_transparent_objects(camera);
        }
    }

    /// Removes every drawable, keeping groups, priorities and material buckets.
    pub fn clear(&mut self) {
        for group in self.groups.values_mut() {
            group.clear();
        }
    }

    /// The number of drawables queued.
    pub fn len(&self) -> usize {
        self.groups.values().map(RenderQueueGroup::len).sum()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
