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

//! Materials, as far as the render queue is concerned: identity and transparency.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Specifies how a material handles transparency.
///
/// - `Opaque`: no transparency calculations.
/// - `Mask`: alpha-tested, needs no sorting.
/// - `Blend`: alpha-blended, must be drawn back to front after everything else.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AlphaMode {
    /// The material is fully opaque.
    #[default]
    Opaque,
    /// Fragments with alpha below the cutoff are discarded.
    Mask(f32),
    /// Full alpha blending.
    Blend,
}

/// A stable identity for a material, used to bucket drawables sharing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u64);

static NEXT_MATERIAL_ID: AtomicU64 = AtomicU64::new(0);

impl MaterialId {
    fn next() -> Self {
        Self(NEXT_MATERIAL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The surface description bound before drawing a group of drawables.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    id: MaterialId,
    name: String,
    alpha_mode: AlphaMode,
}

/// A shared reference to a [`Material`].
pub type MaterialHandle = Arc<Material>;

impl Material {
    /// Creates a material with a fresh id.
    pub fn new(name: impl Into<String>, alpha_mode: AlphaMode) -> Self {
        Self {
            id: MaterialId::next(),
            name: name.into(),
            alpha_mode,
        }
    }

    /// Creates an opaque material.
    pub fn opaque(name: impl Into<String>) -> Self {
        Self::new(name, AlphaMode::Opaque)
    }

    /// Creates an alpha-blended material.
    pub fn transparent(name: impl Into<String>) -> Self {
        Self::new(name, AlphaMode::Blend)
    }

    /// The identity of this material.
    pub fn id(&self) -> MaterialId {
        self.id
    }

    /// The debug name of this material.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How this material handles transparency.
    pub fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    /// Returns `true` if drawables using this material need depth sorting.
    pub fn is_transparent(&self) -> bool {
        self.alpha_mode == AlphaMode::Blend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_mode_default() {
        assert_eq!(AlphaMode::default(), AlphaMode::Opaque);
    }

    #[test]
    fn test_only_blend_is_transparent() {
        assert!(!Material::opaque("stone").is_transparent());
        assert!(!Material::new("leaves", AlphaMode::Mask(0.5)).is_transparent());
        assert!(Material::transparent("glass").is_transparent());
    }

    #[test]
    fn test_materials_get_distinct_ids() {
        let a = Material::opaque("a");
        let b = Material::opaque("a");
        assert_ne!(a.id(), b.id());
        assert_eq!(a.clone().id(), a.id());
    }
}
