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

//! The contract every drawable submitted to a render queue fulfils.

use std::fmt::Debug;

use super::camera::Camera;
use super::material::MaterialHandle;
use crate::math::Mat4;
use crate::renderer::api::geometry::{IndexData, VertexData};
use crate::renderer::api::operation::{OperationType, RenderOperation};

/// The level of detail used to rasterise a drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SceneDetail {
    /// Only vertices are drawn.
    Points,
    /// Only edges are drawn.
    Wireframe,
    /// Filled polygons.
    #[default]
    Solid,
}

/// Something that can be placed in a render queue and drawn.
pub trait Renderable: Debug + Send + Sync {
    /// The material to draw with. Drawables without one cannot be queued.
    fn material(&self) -> Option<&MaterialHandle>;

    /// Builds the render operation for this drawable.
    fn render_operation(&self) -> RenderOperation<'_>;

    /// World transforms; more than one when the drawable is skinned.
    fn world_transforms(&self) -> &[Mat4];

    /// The number of world transforms.
    fn num_world_transforms(&self) -> usize {
        self.world_transforms().len()
    }

    /// Draw in screen space, ignoring the projection matrix.
    fn use_identity_projection(&self) -> bool {
        false
    }

    /// Draw relative to the camera, ignoring the view matrix.
    fn use_identity_view(&self) -> bool {
        false
    }

    /// How to rasterise this drawable.
    fn render_detail(&self) -> SceneDetail {
        SceneDetail::Solid
    }

    /// Squared distance from `camera` to this drawable, used for sorting.
    ///
    /// Defaults to the distance to the translation of the first world transform.
    fn squared_view_depth(&self, camera: &Camera) -> f32 {
        self.world_transforms()
            .first()
            .map_or(0.0, |m| m.translation().distance_squared(camera.position()))
    }
}

/// A drawable made of one piece of geometry and one material.
#[derive(Debug, Clone)]
pub struct MeshRenderable {
    /// The material to draw with.
    pub material: Option<MaterialHandle>,
    /// The primitive topology.
    pub operation_type: OperationType,
    /// The vertex source.
    pub vertex_data: VertexData,
    /// The index source, if the mesh is indexed.
    pub index_data: Option<IndexData>,
    /// World transforms.
    pub transforms: Vec<Mat4>,
    /// How to rasterise the mesh.
    pub detail: SceneDetail,
}

impl MeshRenderable {
    /// Creates a triangle-list mesh at the identity transform.
    pub fn new(
        material: MaterialHandle,
        vertex_data: VertexData,
        index_data: Option<IndexData>,
    ) -> Self {
        Self {
            material: Some(material),
            operation_type: OperationType::TriangleList,
            vertex_data,
            index_data,
            transforms: vec![Mat4::IDENTITY],
            detail: SceneDetail::Solid,
        }
    }

    /// Replaces the world transforms with a single one.
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transforms = vec![transform];
        self
    }
}

impl Renderable for MeshRenderable {
    fn material(&self) -> Option<&MaterialHandle> {
        self.material.as_ref()
    }

    fn render_operation(&self) -> RenderOperation<'_> {
        match &self.index_data {
            Some(index_data) => {
                RenderOperation::indexed(self.operation_type, &self.vertex_data, index_data)
            }
            None => RenderOperation::new(self.operation_type, &self.vertex_data),
        }
    }

    fn world_transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    fn render_detail(&self) -> SceneDetail {
        self.detail
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::renderer::api::scene::Material;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_default_view_depth_uses_first_transform() {
        let mesh = MeshRenderable::new(
            Arc::new(Material::opaque("m")),
            VertexData::default(),
            None,
        )
        .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0)));
        let camera = Camera::new("cam", Vec3::new(0.0, 4.0, 0.0));
        assert_relative_eq!(mesh.squared_view_depth(&camera), 25.0);
        assert_eq!(mesh.num_world_transforms(), 1);
    }

    #[test]
    fn test_no_transforms_means_zero_depth() {
        let mut mesh = MeshRenderable::new(
            Arc::new(Material::opaque("m")),
            VertexData::default(),
            None,
        );
        mesh.transforms.clear();
        let camera = Camera::new("cam", Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(mesh.squared_view_depth(&camera), 0.0);
    }

    #[test]
    fn test_operation_is_indexed_only_with_index_data() {
        let mesh = MeshRenderable::new(
            Arc::new(Material::opaque("m")),
            VertexData::default(),
            None,
        );
        assert!(!mesh.render_operation().use_indices);
    }
}
