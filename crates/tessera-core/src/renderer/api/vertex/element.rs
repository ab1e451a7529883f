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

//! The smallest unit of vertex layout: one attribute in one stream.

use crate::renderer::error::LayoutError;

/// The storage format of a single vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexElementType {
    /// One 32-bit float.
    Float1,
    /// Two 32-bit floats.
    Float2,
    /// Three 32-bit floats.
    Float3,
    /// Four 32-bit floats.
    Float4,
    /// A packed 32-bit RGBA colour.
    Color,
    /// One 16-bit signed integer.
    Short1,
    /// Two 16-bit signed integers.
    Short2,
    /// Three 16-bit signed integers.
    Short3,
    /// Four 16-bit signed integers.
    Short4,
}

impl VertexElementType {
    /// Returns the size of one attribute of this type, in bytes.
    pub const fn type_size(self) -> usize {
        match self {
            VertexElementType::Float1 => 4,
            VertexElementType::Float2 => 8,
            VertexElementType::Float3 => 12,
            VertexElementType::Float4 => 16,
            VertexElementType::Color => 4,
            VertexElementType::Short1 => 2,
            VertexElementType::Short2 => 4,
            VertexElementType::Short3 => 6,
            VertexElementType::Short4 => 8,
        }
    }

    /// Returns the number of components in this type.
    ///
    /// A packed colour counts as a single component.
    pub const fn type_count(self) -> usize {
        match self {
            VertexElementType::Float1
            | VertexElementType::Color
            | VertexElementType::Short1 => 1,
            VertexElementType::Float2 | VertexElementType::Short2 => 2,
            VertexElementType::Float3 | VertexElementType::Short3 => 3,
            VertexElementType::Float4 | VertexElementType::Short4 => 4,
        }
    }

    /// Widens a single-component base type to `count` components.
    ///
    /// Only `Float1` and `Short1` can be multiplied, and `count` must be in `1..=4`.
    pub fn multiply_type_count(base: Self, count: usize) -> Result<Self, LayoutError> {
        if !(1..=4).contains(&count) {
            return Err(LayoutError::InvalidComponentCount(count));
        }
        let widened = match base {
            VertexElementType::Float1 => [
                VertexElementType::Float1,
                VertexElementType::Float2,
                VertexElementType::Float3,
                VertexElementType::Float4,
            ],
            VertexElementType::Short1 => [
                VertexElementType::Short1,
                VertexElementType::Short2,
                VertexElementType::Short3,
                VertexElementType::Short4,
            ],
            _ => return Err(LayoutError::UnsupportedTypeMultiply { base }),
        };
        Ok(widened[count - 1])
    }
}

/// The meaning of a vertex attribute.
///
/// The declaration order is the sort order used by
/// [`VertexDeclaration::sort`](super::VertexDeclaration::sort).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VertexElementSemantic {
    /// Object-space position.
    Position = 1,
    /// Skinning weights.
    BlendWeights = 2,
    /// Skinning matrix indices.
    BlendIndices = 3,
    /// Surface normal.
    Normal = 4,
    /// Diffuse colour.
    Diffuse = 5,
    /// Specular colour.
    Specular = 6,
    /// Texture coordinates.
    TexCoords = 7,
    /// Binormal (bitangent) vector.
    Binormal = 8,
    /// Tangent vector.
    Tangent = 9,
}

/// One attribute of a vertex: where it lives and what it means.
///
/// Elements are immutable once created. A declaration replaces an element
/// wholesale through [`VertexDeclaration::modify_element`](super::VertexDeclaration::modify_element).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexElement {
    source: u16,
    offset: usize,
    element_type: VertexElementType,
    semantic: VertexElementSemantic,
    index: u16,
}

impl VertexElement {
    /// Creates a new element.
    pub const fn new(
        source: u16,
        offset: usize,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Self {
        Self {
            source,
            offset,
            element_type,
            semantic,
            index,
        }
    }

    /// The stream this element is read from.
    pub const fn source(&self) -> u16 {
        self.source
    }

    /// Byte offset of this element from the start of a vertex in its stream.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// The storage format of this element.
    pub const fn element_type(&self) -> VertexElementType {
        self.element_type
    }

    /// The meaning of this element.
    pub const fn semantic(&self) -> VertexElementSemantic {
        self.semantic
    }

    /// The semantic index, e.g. the texture coordinate set.
    pub const fn index(&self) -> u16 {
        self.index
    }

    /// Size of this element in bytes, derived from its type.
    pub const fn size(&self) -> usize {
        self.element_type.type_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sizes() {
        assert_eq!(VertexElementType::Float3.type_size(), 12);
        assert_eq!(VertexElementType::Color.type_size(), 4);
        assert_eq!(VertexElementType::Short3.type_size(), 6);
        assert_eq!(VertexElementType::Color.type_count(), 1);
        assert_eq!(VertexElementType::Short4.type_count(), 4);
    }

    #[test]
    fn test_multiply_type_count() {
        assert_eq!(
            VertexElementType::multiply_type_count(VertexElementType::Float1, 3),
            Ok(VertexElementType::Float3)
        );
        assert_eq!(
            VertexElementType::multiply_type_count(VertexElementType::Short1, 2),
            Ok(VertexElementType::Short2)
        );
        assert_eq!(
            VertexElementType::multiply_type_count(VertexElementType::Float2, 2),
            Err(LayoutError::UnsupportedTypeMultiply {
                base: VertexElementType::Float2
            })
        );
        assert_eq!(
            VertexElementType::multiply_type_count(VertexElementType::Float1, 5),
            Err(LayoutError::InvalidComponentCount(5))
        );
        assert_eq!(
            VertexElementType::multiply_type_count(VertexElementType::Float1, 0),
            Err(LayoutError::InvalidComponentCount(0))
        );
    }

    #[test]
    fn test_element_size_follows_type() {
        let e = VertexElement::new(
            1,
            12,
            VertexElementType::Float2,
            VertexElementSemantic::TexCoords,
            0,
        );
        assert_eq!(e.size(), 8);
        assert_eq!(e.source(), 1);
        assert_eq!(e.offset(), 12);
    }

    #[test]
    fn test_semantic_ordering() {
        assert!(VertexElementSemantic::Position < VertexElementSemantic::BlendWeights);
        assert!(VertexElementSemantic::BlendIndices < VertexElementSemantic::Normal);
        assert!(VertexElementSemantic::TexCoords < VertexElementSemantic::Tangent);
    }
}
