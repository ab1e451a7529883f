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

//! Defines the hierarchy of error types for the submission core.
//!
//! Every variant here is a broken precondition: the caller did something the
//! buffer, layout or queue contract forbids. None of them are meant to be
//! retried; they surface at the call site so the bug can be fixed.

use crate::renderer::api::vertex::{VertexElementSemantic, VertexElementType};
use thiserror::Error;

/// An error raised by the lock/unlock protocol or by buffer I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// The buffer (or its shadow) already has an outstanding lock.
    #[error("Cannot lock this buffer because it is already locked.")]
    AlreadyLocked,
    /// `unlock` was called on a buffer that holds no lock.
    #[error("Cannot unlock this buffer, it is not locked.")]
    NotLocked,
    /// The requested region does not fit inside the buffer.
    #[error("Region [{offset}, {offset} + {length}) exceeds the buffer size of {size} bytes.")]
    OutOfBounds {
        /// Start of the requested region in bytes.
        offset: usize,
        /// Length of the requested region in bytes.
        length: usize,
        /// Total size of the buffer in bytes.
        size: usize,
    },
    /// A source and a destination slice disagree on their length.
    #[error("Size mismatch: expected {expected} bytes, got {actual}.")]
    SizeMismatch {
        /// The number of bytes the operation required.
        expected: usize,
        /// The number of bytes that were supplied.
        actual: usize,
    },
    /// A read-only lock was requested on write-only device memory.
    #[error("Cannot read back a write-only buffer without a shadow buffer.")]
    ReadFromWriteOnly,
    /// A shared buffer handle was poisoned by a panic while it was held.
    #[error("The buffer handle was poisoned by a panic in another user.")]
    Poisoned,
    /// `count` elements of `element_size` bytes do not fit in `usize`.
    #[error("A buffer of {count} elements of {element_size} bytes overflows the address space.")]
    SizeOverflow {
        /// The size of one element in bytes.
        element_size: usize,
        /// The number of elements requested.
        count: usize,
    },
}

/// An error related to vertex layout construction or stream bindings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Two elements in one declaration share a semantic and a semantic index.
    #[error("Declaration already contains an element for {semantic:?} index {index}.")]
    DuplicateElement {
        /// The repeated semantic.
        semantic: VertexElementSemantic,
        /// The repeated semantic index.
        index: u16,
    },
    /// `multiply_type_count` was given a base type with more than one component.
    #[error("Cannot multiply {base:?}; only Float1 and Short1 can be multiplied.")]
    UnsupportedTypeMultiply {
        /// The rejected base type.
        base: VertexElementType,
    },
    /// A component count outside `1..=4` was requested.
    #[error("Invalid component count {0}; expected 1 to 4.")]
    InvalidComponentCount(usize),
    /// An element position is past the end of the declaration.
    #[error("Element index {index} is out of range for a declaration of {len} elements.")]
    ElementIndexOutOfRange {
        /// The requested position.
        index: usize,
        /// The number of elements in the declaration.
        len: usize,
    },
    /// A declaration refers to a stream that has no buffer bound.
    #[error("No vertex buffer is bound to source {stream}.")]
    UnboundSource {
        /// The unbound stream index.
        stream: u16,
    },
    /// The declared stride of a stream exceeds the vertex size of its buffer.
    #[error("Source {stream} declares {declared}-byte vertices but its buffer holds {buffer}-byte vertices.")]
    StrideMismatch {
        /// The stream index.
        stream: u16,
        /// The stride computed from the declaration.
        declared: usize,
        /// The vertex size of the bound buffer.
        buffer: usize,
    },
    /// The operation needs a position element and the declaration has none.
    #[error("The vertex declaration has no position element.")]
    MissingPosition,
}

/// An error raised while submitting drawables to a render queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    /// A renderable without a material cannot be bucketed.
    #[error("Renderable submitted without a material.")]
    MissingMaterial,
}

/// A high-level error that can occur while issuing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A buffer operation failed.
    #[error("Buffer operation failed: {0}")]
    Buffer(#[from] BufferError),
    /// The geometry layout is invalid for the requested draw.
    #[error("Vertex layout is invalid: {0}")]
    Layout(#[from] LayoutError),
    /// Queue submission failed.
    #[error("Render queue submission failed: {0}")]
    Queue(#[from] QueueError),
    /// A render operation is internally inconsistent.
    #[error("Invalid render operation: {0}")]
    InvalidOperation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn buffer_error_display() {
        let err = BufferError::OutOfBounds {
            offset: 8,
            length: 16,
            size: 12,
        };
        assert_eq!(
            format!("{err}"),
            "Region [8, 8 + 16) exceeds the buffer size of 12 bytes."
        );
    }

    #[test]
    fn render_error_wraps_buffer_error() {
        let render_err: RenderError = BufferError::NotLocked.into();
        assert_eq!(
            format!("{render_err}"),
            "Buffer operation failed: Cannot unlock this buffer, it is not locked."
        );
        assert!(render_err.source().is_some());
    }

    #[test]
    fn layout_error_display() {
        let err = LayoutError::DuplicateElement {
            semantic: VertexElementSemantic::TexCoords,
            index: 1,
        };
        assert_eq!(
            format!("{err}"),
            "Declaration already contains an element for TexCoords index 1."
        );
    }
}
