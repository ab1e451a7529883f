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

//! # Tessera Infra
//!
//! Concrete implementations of the contracts declared in `tessera-core`.
//!
//! Nothing here talks to a GPU: [`DeviceBuffer`] emulates device memory the
//! CPU may not read back, [`SoftwareBufferManager`] hands out buffers built on
//! it, and [`HeadlessRenderSystem`] records every draw instead of rasterising.

#![warn(missing_docs)]

pub mod buffer_manager;
pub mod device_buffer;
pub mod render_system;

pub use buffer_manager::SoftwareBufferManager;
pub use device_buffer::{DeviceBuffer, DeviceMemory};
pub use render_system::{DrawRecord, HeadlessRenderSystem};
