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

//! Backend-agnostic data structures of the submission core.
//!
//! - **[`buffer`]**: hardware buffers, shadowing, typed handles, copy pools.
//! - **[`vertex`]**: vertex elements, declarations and stream bindings.
//! - **[`geometry`]**: per-drawable vertex and index data.
//! - **[`operation`]**: the render operation handed to a render system.
//! - **[`scene`]**: drawables, materials and cameras.
//! - **[`stats`]**: per-frame counters.

pub mod buffer;
pub mod geometry;
pub mod operation;
pub mod scene;
pub mod stats;
pub mod vertex;

pub use self::buffer::{
    BufferHandle, BufferId, BufferUsage, HardwareBuffer, HardwareIndexBuffer,
    HardwareVertexBuffer, IndexBufferHandle, IndexType, LockMode, VertexBufferHandle, WriteHint,
};
pub use self::geometry::{BufferCopy, IndexData, SoftwareBlendInfo, VertexData};
pub use self::operation::{OperationType, RenderOperation};
pub use self::scene::{
    AlphaMode, Camera, Material, MaterialHandle, MaterialId, MeshRenderable, Renderable,
    SceneDetail,
};
pub use self::stats::RenderStats;
pub use self::vertex::{
    VertexBufferBinding, VertexDeclaration, VertexElement, VertexElementSemantic,
    VertexElementType,
};
