use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{ConfigError, ConfigResult};

/// ## Structure
/// Runtime configuration, read from a YAML file.
///
/// ```text
/// StoryflowConfig
///   ├── session: SessionConfig
///   │   └── broadcast_buffer: usize
///   └── flow: FlowConfig
///       ├── unavailable_story_label: String
///       ├── duplicate_offset: f64
///       ├── vertical_gap: f64
///       └── default_block_size: BlockSizeConfig
///           ├── width: f64
///           └── height: f64
/// ```
///
/// Every section and key is optional; missing values fall back to defaults.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct StoryflowConfig {
    pub session: SessionConfig,
    pub flow: FlowConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Events buffered per story group before slow subscribers start lagging.
    pub broadcast_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            broadcast_buffer: 256,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FlowConfig {
    /// Display name for a link-story block whose target story no longer exists.
    pub unavailable_story_label: String,
    pub duplicate_offset: f64,
    pub vertical_gap: f64,
    pub default_block_size: BlockSizeConfig,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            unavailable_story_label: "N/A".to_string(),
            duplicate_offset: 40.0,
            vertical_gap: 80.0,
            default_block_size: BlockSizeConfig::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct BlockSizeConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for BlockSizeConfig {
    fn default() -> Self {
        Self {
            width: 240.0,
            height: 80.0,
        }
    }
}

impl StoryflowConfig {
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: StoryflowConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.session.broadcast_buffer == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.broadcast_buffer",
                reason: "must be greater than zero".to_string(),
            });
        }
        let non_negative = [
            ("flow.duplicate_offset", self.flow.duplicate_offset),
            ("flow.vertical_gap", self.flow.vertical_gap),
            ("flow.default_block_size.width", self.flow.default_block_size.width),
            ("flow.default_block_size.height", self.flow.default_block_size.height),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: format!("must be a non-negative number, got {}", value),
                });
            }
        }
        Ok(())
    }
}
