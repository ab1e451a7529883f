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

//! The unit of work handed to a render system: one draw call's worth of geometry.

use super::geometry::{IndexData, VertexData};
use crate::renderer::error::RenderError;

/// The primitive topology of a render operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationType {
    /// A list of points, one vertex each.
    PointList,
    /// A list of lines, two vertices each.
    LineList,
    /// A strip of connected lines.
    LineStrip,
    /// A list of triangles, three vertices each.
    #[default]
    TriangleList,
    /// A strip of triangles sharing edges.
    TriangleStrip,
    /// A fan of triangles sharing the first vertex.
    TriangleFan,
}

/// Everything a render system needs to issue one draw.
///
/// Borrows its geometry from the drawable that built it, so it lives no
/// longer than one submission.
#[derive(Debug, Clone, Copy)]
pub struct RenderOperation<'a> {
    /// The primitive topology.
    pub operation_type: OperationType,
    /// The vertex source.
    pub vertex_data: &'a VertexData,
    /// The index source, if any.
    pub index_data: Option<&'a IndexData>,
    /// Whether to draw through `index_data`.
    pub use_indices: bool,
}

impl<'a> RenderOperation<'a> {
    /// A non-indexed operation.
    pub fn new(operation_type: OperationType, vertex_data: &'a VertexData) -> Self {
        Self {
            operation_type,
            vertex_data,
            index_data: None,
            use_indices: false,
        }
    }

    /// An indexed operation.
    pub fn indexed(
        operation_type: OperationType,
        vertex_data: &'a VertexData,
        index_data: &'a IndexData,
    ) -> Self {
        Self {
            operation_type,
            vertex_data,
            index_data: Some(index_data),
            use_indices: true,
        }
    }

    /// The number of vertices the draw consumes: indices when indexed, vertices otherwise.
    pub fn element_count(&self) -> usize {
        match (self.use_indices, self.index_data) {
            (true, Some(index_data)) => index_data.index_count,
            _ => self.vertex_data.vertex_count,
        }
    }

    /// The number of triangles this operation produces.
    ///
    /// Points and lines produce none.
    pub fn primitive_count(&self) -> usize {
        let n = self.element_count();
        match self.operation_type {
            OperationType::TriangleList => n / 3,
            OperationType::TriangleStrip | OperationType::TriangleFan => n.saturating_sub(2),
            OperationType::PointList | OperationType::LineList | OperationType::LineStrip => 0,
        }
    }

    /// Checks that the operation is internally consistent.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.use_indices && self.index_data.is_none() {
            return Err(RenderError::InvalidOperation(
                "indexed draw requested without index data".to_string(),
            ));
        }
        Ok(())
    }
}
