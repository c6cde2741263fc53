// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for snapname

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// AI engine configuration
    #[serde(default)]
    pub ai_engine: EngineConfig,

    /// Instruction sent alongside every image
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Naming rules
    #[serde(default)]
    pub rules: RuleConfig,

    /// File discovery and image preparation
    #[serde(default)]
    pub scan: ScanConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EngineConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_vision_model")]
    pub model: String,
    /// Upper bound on a single description, 0 disables the limit
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub retries: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RuleConfig {
    /// Maximum stem length in bytes, 0 means unlimited
    #[serde(default)]
    pub max_length: usize,
    /// Suffixed candidates probed before giving up, 0 means unbounded
    #[serde(default = "default_collision_attempts")]
    pub max_collision_attempts: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScanConfig {
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
    /// Longest side sent to the model, 0 sends the original bytes
    #[serde(default = "default_max_dimension")]
    pub max_image_dimension: u32,
}

// Default value functions
fn default_url() -> String { "http://localhost:11434".to_string() }
fn default_vision_model() -> String { "moondream".to_string() }
fn default_timeout() -> u64 { 120 }
fn default_collision_attempts() -> u32 { 10_000 }
fn default_max_dimension() -> u32 { 1024 }

fn default_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "bmp", "gif"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_prompt() -> String {
    "Analyze the image and generate a concise filename (3-5 words max) \
     that captures its essence. Consider the following aspects:\n\
     1. Primary subject and action\n\
     2. Key visual characteristics (e.g., color, composition)\n\
     3. Setting or context\n\
     4. Unique or distinctive elements\n\
     5. Mood or theme (if prominent)\n\
     Use lowercase words separated by underscores, avoiding generic terms. \
     The filename should enable easy identification within a large collection. \
     Do not use numbers or dates as the sole description."
        .to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            ai_engine: EngineConfig::default(),
            prompt: default_prompt(),
            rules: RuleConfig::default(),
            scan: ScanConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            model: default_vision_model(),
            timeout_secs: default_timeout(),
            retries: 0,
        }
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            max_length: 0,
            max_collision_attempts: default_collision_attempts(),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            max_image_dimension: default_max_dimension(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<Self>(&content)
                .map_err(|e| crate::SnapnameError::Config(format!("Failed to parse config: {}", e)))?
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        // Prompt must never be blank, even when the file sets it to ""
        if config.prompt.trim().is_empty() {
            config.prompt = default_prompt();
        }

        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
