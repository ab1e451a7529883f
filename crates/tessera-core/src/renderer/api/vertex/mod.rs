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

//! Vertex layout description, decoupled from the buffers holding the data.
//!
//! - [`VertexElement`]: one attribute (type, meaning, stream, offset).
//! - [`VertexDeclaration`]: the ordered list of elements forming a vertex.
//! - [`VertexBufferBinding`]: which buffer feeds each stream.

mod binding;
mod declaration;
mod element;

pub use self::binding::VertexBufferBinding;
pub use self::declaration::VertexDeclaration;
pub use self::element::{VertexElement, VertexElementSemantic, VertexElementType};
