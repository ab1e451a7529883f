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

//! The viewpoint transparent drawables are sorted against.

use crate::math::Vec3;

/// A named viewpoint in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    name: String,
    position: Vec3,
    direction: Vec3,
}

impl Camera {
    /// Creates a camera at `position` looking down negative Z.
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            direction: -Vec3::Z,
        }
    }

    /// The debug name of this camera.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The world-space position.
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// The normalized view direction.
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Moves the camera.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Points the camera at `target`.
    ///
    /// Looking at the camera's own position leaves the direction unchanged.
    pub fn look_at(&mut self, target: Vec3) {
        let direction = (target - self.position).normalize();
        if direction != Vec3::ZERO {
            self.direction = direction;
        }
    }
}
