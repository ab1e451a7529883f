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

//! Describes the full layout of a vertex across one or more streams.

use std::collections::BTreeSet;

use super::{VertexBufferBinding, VertexElement, VertexElementSemantic, VertexElementType};
use crate::renderer::error::{LayoutError, RenderError};

/// An ordered list of [`VertexElement`]s describing one vertex format.
///
/// Element order is significant: two declarations with the same elements in a
/// different order are not equal. No two elements may share a semantic and a
/// semantic index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexDeclaration {
    elements: Vec<VertexElement>,
}

impl VertexDeclaration {
    /// Creates an empty declaration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new element and returns a reference to it.
    pub fn add_element(
        &mut self,
        source: u16,
        offset: usize,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Result<&VertexElement, LayoutError> {
        self.ensure_unique(semantic, index, None)?;
        self.elements.push(VertexElement::new(
            source,
            offset,
            element_type,
            semantic,
            index,
        ));
        let last = self.elements.len() - 1;
        Ok(&self.elements[last])
    }

    /// Inserts a new element at `position`.
    ///
    /// A position at or past the end appends the element.
    pub fn insert_element(
        &mut self,
        position: usize,
        source: u16,
        offset: usize,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Result<&VertexElement, LayoutError> {
        if position >= self.elements.len() {
            return self.add_element(source, offset, element_type, semantic, index);
        }
        self.ensure_unique(semantic, index, None)?;
        self.elements.insert(
            position,
            VertexElement::new(source, offset, element_type, semantic, index),
        );
        Ok(&self.elements[position])
    }

    /// Removes and returns the element at `position`.
    pub fn remove_element(&mut self, position: usize) -> Result<VertexElement, LayoutError> {
        self.check_position(position)?;
        Ok(self.elements.remove(position))
    }

    /// Removes the element with the given semantic and index, if present.
    pub fn remove_semantic(
        &mut self,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Option<VertexElement> {
        let position = self
            .elements
            .iter()
            .position(|e| e.semantic() == semantic && e.index() == index)?;
        Some(self.elements.remove(position))
    }

    /// Removes every element.
    pub fn remove_all_elements(&mut self) {
        self.elements.clear();
    }

    /// Replaces the element at `position` with a new one.
    pub fn modify_element(
        &mut self,
        position: usize,
        source: u16,
        offset: usize,
        element_type: VertexElementType,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Result<(), LayoutError> {
        self.check_position(position)?;
        self.ensure_unique(semantic, index, Some(position))?;
        self.elements[position] = VertexElement::new(source, offset, element_type, semantic, index);
        Ok(())
    }

    /// Finds the element with the given semantic and semantic index.
    pub fn find_element_by_semantic(
        &self,
        semantic: VertexElementSemantic,
        index: u16,
    ) -> Option<&VertexElement> {
        self.elements
            .iter()
            .find(|e| e.semantic() == semantic && e.index() == index)
    }

    /// Iterates over the elements read from `source`, in declaration order.
    pub fn find_elements_by_source(&self, source: u16) -> impl Iterator<Item = &VertexElement> {
        self.elements.iter().filter(move |e| e.source() == source)
    }

    /// The stride of stream `source`: the summed size of its elements.
    pub fn vertex_size(&self, source: u16) -> usize {
        self.find_elements_by_source(source)
            .map(VertexElement::size)
            .sum()
    }

    /// The summed size of every element across all streams.
    pub fn total_vertex_size(&self) -> usize {
        self.elements.iter().map(VertexElement::size).sum()
    }

    /// Returns the element at `position`.
    pub fn element(&self, position: usize) -> Option<&VertexElement> {
        self.elements.get(position)
    }

    /// All elements, in declaration order.
    pub fn elements(&self) -> &[VertexElement] {
        &self.elements
    }

    /// The number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the declaration has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The distinct stream indices referenced, in ascending order.
    pub fn sources(&self) -> Vec<u16> {
        self.elements
            .iter()
            .map(VertexElement::source)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Sorts elements by source, then semantic, then semantic index.
    pub fn sort(&mut self) {
        self.elements
            .sort_by_key(|e| (e.source(), e.semantic(), e.index()));
    }

    /// Builds a copy of this declaration laid out the way most hardware prefers.
    ///
    /// Elements are sorted and packed into as few streams as possible. Blend
    /// weights and indices always get a stream of their own. Animated meshes
    /// split after the normal, and morph-animated meshes keep positions in a
    /// stream of their own.
    pub fn auto_organized(&self, skeletal_animation: bool, vertex_animation: bool) -> Self {
        let mut organized = self.clone();
        for element in &mut organized.elements {
            *element = VertexElement::new(
                0,
                0,
                element.element_type(),
                element.semantic(),
                element.index(),
            );
        }
        organized.sort();

        let mut offset = 0;
        let mut buffer: u16 = 0;
        let mut prev_semantic = VertexElementSemantic::Position;

        for element in &mut organized.elements {
            let (split_with_prev, split_with_next) = match element.semantic() {
                VertexElementSemantic::Position => (vertex_animation, vertex_animation),
                VertexElementSemantic::Normal => (
                    matches!(
                        prev_semantic,
                        VertexElementSemantic::BlendWeights | VertexElementSemantic::BlendIndices
                    ),
                    skeletal_animation || vertex_animation,
                ),
                VertexElementSemantic::BlendWeights => (true, false),
                VertexElementSemantic::BlendIndices => (false, true),
                _ => (false, false),
            };

            if split_with_prev && offset > 0 {
                buffer += 1;
                offset = 0;
            }
            prev_semantic = element.semantic();

            *element = VertexElement::new(
                buffer,
                offset,
                element.element_type(),
                element.semantic(),
                element.index(),
            );

            if split_with_next {
                buffer += 1;
                offset = 0;
            } else {
                offset += element.size();
            }
        }

        organized
    }

    /// Extracts the elements of one stream into a new declaration on stream 0.
    pub fn clone_source(&self, source: u16) -> Self {
        Self {
            elements: self
                .find_elements_by_source(source)
                .map(|e| VertexElement::new(0, e.offset(), e.element_type(), e.semantic(), e.index()))
                .collect(),
        }
    }

    /// Checks that every referenced stream is bound to a buffer wide enough
    /// for the declared stride.
    pub fn validate_binding(&self, binding: &VertexBufferBinding) -> Result<(), RenderError> {
        for source in self.sources() {
            let buffer = binding.buffer(source)?;
            let declared = self.vertex_size(source);
            let actual = buffer.with(|b| b.vertex_size())?;
            if declared > actual {
                return Err(LayoutError::StrideMismatch {
                    stream: source,
                    declared,
                    buffer: actual,
                }
                .into());
            }
        }
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<(), LayoutError> {
        if position < self.elements.len() {
            Ok(())
        } else {
            Err(LayoutError::ElementIndexOutOfRange {
                index: position,
                len: self.elements.len(),
            })
        }
    }

    fn ensure_unique(
        &self,
        semantic: VertexElementSemantic,
        index: u16,
        ignore: Option<usize>,
    ) -> Result<(), LayoutError> {
        let clash = self
            .elements
            .iter()
            .enumerate()
            .any(|(i, e)| Some(i) != ignore && e.semantic() == semantic && e.index() == index);
        if clash {
            Err(LayoutError::DuplicateElement { semantic, index })
        } else {
            Ok(())
        }
    }
}
