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

//! Provides the public, backend-agnostic submission contracts.
//!
//! This module defines the data handed to a graphics backend (buffers, vertex
//! layouts, render operations), the queue that orders it, and the traits
//! ([`HardwareBufferManager`], [`RenderSystem`]) a concrete backend in the
//! `tessera-infra` crate implements.

pub mod api;
pub mod blend;
pub mod error;
pub mod queue;
pub mod submit;
pub mod traits;

// Re-export the most important traits and types for easier use.
pub use self::api::*;
pub use self::blend::software_vertex_blend;
pub use self::error::{BufferError, LayoutError, QueueError, RenderError};
pub use self::queue::{
    RenderPriorityGroup, RenderQueue, RenderQueueGroup, RenderQueueGroupId, DEFAULT_PRIORITY,
};
pub use self::submit::QueueRenderer;
pub use self::traits::{HardwareBufferManager, RenderSystem, RenderSystemCapabilities};
