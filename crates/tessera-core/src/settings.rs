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

//! Engine-wide configuration, loadable from JSON.
//!
//! Every field has a default, so a settings file only needs to name what it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::queue::{RenderQueueGroupId, DEFAULT_PRIORITY};

/// An error raised while loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings file could not be read.
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON for [`EngineSettings`].
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Buffer creation and validation options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BufferSettings {
    /// Create geometry buffers with a system-memory shadow copy.
    pub use_shadow_buffers: bool,
    /// Check every vertex declaration against its binding before drawing.
    pub validate_bindings: bool,
}

impl Default for BufferSettings {
    fn default() -> Self {
        Self {
            use_shadow_buffers: true,
            validate_bindings: true,
        }
    }
}

/// Render queue options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    /// The group drawables go to when none is given.
    pub default_group: RenderQueueGroupId,
    /// The priority drawables get when none is given.
    pub default_priority: u16,
    /// Sort transparent drawables back to front before drawing them.
    pub sort_transparents: bool,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            default_group: RenderQueueGroupId::Main,
            default_priority: DEFAULT_PRIORITY,
            sort_transparents: true,
        }
    }
}

/// Render system options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// The render system blends vertices on the device.
    pub hardware_vertex_blending: bool,
    /// The number of frames the sandbox submits.
    pub frames: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            hardware_vertex_blending: false,
            frames: 3,
        }
    }
}

/// The complete configuration of the submission core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Buffer options.
    pub buffers: BufferSettings,
    /// Render queue options.
    pub queue: QueueSettings,
    /// Render system options.
    pub render: RenderSettings,
}

impl EngineSettings {
    /// Parses settings from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded engine settings from {}.", path.display());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_gives_defaults() {
        let settings = EngineSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, EngineSettings::default());
        assert!(settings.buffers.use_shadow_buffers);
        assert_eq!(settings.queue.default_group, RenderQueueGroupId::Main);
        assert_eq!(settings.queue.default_priority, 100);
    }

    #[test]
    fn test_partial_json_overrides_fields() {
        let settings = EngineSettings::from_json_str(
            r#"{ "queue": { "default_group": "Overlay" }, "render": { "frames": 10 } }"#,
        )
        .unwrap();
        assert_eq!(settings.queue.default_group, RenderQueueGroupId::Overlay);
        assert!(settings.queue.sort_transparents);
        assert_eq!(settings.render.frames, 10);
        assert!(!settings.render.hardware_vertex_blending);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(matches!(
            EngineSettings::from_json_str("{ not json"),
            Err(SettingsError::Parse(_))
        ));
        assert!(matches!(
            EngineSettings::load("/definitely/not/here.json"),
            Err(SettingsError::Io(_))
        ));
    }
}
