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

//! Per-frame counters accumulated by a render system.

use super::operation::RenderOperation;

/// A collection of statistics for a single rendered frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// A sequential counter for rendered frames.
    pub frame_number: u64,
    /// The number of render operations issued.
    pub draw_calls: u32,
    /// The number of triangles produced by those operations.
    pub faces_rendered: u64,
    /// The number of vertices referenced by those operations.
    pub vertices_rendered: u64,
    /// The number of times a different material was bound.
    pub material_changes: u32,
}

impl RenderStats {
    /// Accounts for one issued render operation.
    pub fn record_operation(&mut self, op: &RenderOperation<'_>) {
        self.draw_calls += 1;
        self.faces_rendered += op.primitive_count() as u64;
        self.vertices_rendered += op.vertex_data.vertex_count as u64;
    }

    /// Clears the per-frame counters, keeping the frame number.
    pub fn reset_counters(&mut self) {
        *self = Self {
            frame_number: self.frame_number,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::api::geometry::VertexData;
    use crate::renderer::api::operation::OperationType;

    #[test]
    fn test_record_operation_counts_faces_and_vertices() {
        let data = VertexData {
            vertex_count: 6,
            ..VertexData::default()
        };
        let mut stats = RenderStats::default();
        stats.record_operation(&RenderOperation::new(OperationType::TriangleList, &data));
        stats.record_operation(&RenderOperation::new(OperationType::TriangleStrip, &data));
        stats.record_operation(&RenderOperation::new(OperationType::LineList, &data));

        assert_eq!(stats.draw_calls, 3);
        assert_eq!(stats.faces_rendered, 2 + 4);
        assert_eq!(stats.vertices_rendered, 18);
    }

    #[test]
    fn test_reset_keeps_frame_number() {
        let mut stats = RenderStats {
            frame_number: 7,
            draw_calls: 3,
            material_changes: 2,
            ..RenderStats::default()
        };
        stats.reset_counters();
        assert_eq!(stats.frame_number, 7);
        assert_eq!(stats.draw_calls, 0);
        assert_eq!(stats.material_changes, 0);
    }
}
