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

//! Renderer configuration, loadable from JSON.

use crate::math::LinearRgba;
use crate::renderer::Viewport;
use serde::{Deserialize, Serialize};
use std::{fmt, path::Path};

/// Settings consumed by the renderer facade and its render thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Name given to the render thread.
    pub thread_name: String,
    /// How long an idle render thread sleeps before re-checking for work, in milliseconds.
    pub idle_wait_ms: u64,
    /// Panic the render thread when a resource fails to be created.
    /// Enabled by default in debug builds, where it acts as a breakpoint.
    pub trap_on_create_failure: bool,
    /// Emit a trace line for every queued and executed command.
    pub trace_commands: bool,
    /// Clear color applied right after the device is initialized.
    pub clear_color: Option<LinearRgba>,
    /// Viewport applied right after the device is initialized.
    pub viewport: Option<Viewport>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            thread_name: "ember-render".to_string(),
            idle_wait_ms: 16,
            trap_on_create_failure: cfg!(debug_assertions),
            trace_commands: true,
            clear_color: None,
            viewport: None,
        }
    }
}

/// An error raised while loading or saving a [`RendererConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The file could not be read or written.
    Io(std::io::Error),
    /// The contents are not a valid configuration.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "Failed to access renderer config: {err}"),
            ConfigError::Parse(err) => write!(f, "Failed to parse renderer config: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err)
    }
}

impl RendererConfig {
    /// Load the configuration from a JSON string. Missing fields take their default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load the configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        log::debug!("Loaded renderer config from {}", path.as_ref().display());
        Self::from_json(&content)
    }

    /// Save the configuration to a JSON file.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// The idle wait as a [`std::time::Duration`].
    pub fn idle_wait(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.idle_wait_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = RendererConfig::from_json(r#"{ "thread_name": "gl", "idle_wait_ms": 4 }"#)
            .expect("valid config");
        assert_eq!(config.thread_name, "gl");
        assert_eq!(config.idle_wait_ms, 4);
        assert!(config.trace_commands);
        assert!(config.clear_color.is_none());
    }

    #[test]
    fn nested_values_parse() {
        let json = r#"{
            "clear_color": { "r": 0.1, "g": 0.1, "b": 0.1, "a": 1.0 },
            "viewport": { "x": 0, "y": 0, "width": 1280, "height": 720 },
            "trap_on_create_failure": false
        }"#;
        let config = RendererConfig::from_json(json).expect("valid config");
        assert_eq!(config.clear_color, Some(LinearRgba::rgb(0.1, 0.1, 0.1)));
        assert_eq!(config.viewport, Some(Viewport::new(0, 0, 1280, 720)));
        assert!(!config.trap_on_create_failure);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = RendererConfig::from_json("{ thread_name: 3 ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn file_round_trip() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("renderer.json");
        let config = RendererConfig {
            idle_wait_ms: 2,
            ..Default::default()
        };
        config.to_file(&path).expect("write config");
        let loaded = RendererConfig::from_file(&path).expect("read config");
        assert_eq!(loaded, config);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().expect("temp dir");
        let err = RendererConfig::from_file(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn idle_wait_is_never_zero() {
        let config = RendererConfig {
            idle_wait_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.idle_wait(), std::time::Duration::from_millis(1));
    }
}
