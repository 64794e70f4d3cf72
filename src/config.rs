// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings come from an optional `collage.yaml` in the working directory;
//! every field has a default. The API key is only ever read from the
//! environment.

use crate::io::backend::OpenAiSettings;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional configuration file, relative to the working directory.
pub const CONFIG_FILE: &str = "collage.yaml";

const API_KEY_VAR: &str = "OPENAI_API_KEY";
const API_BASE_VAR: &str = "OPENAI_BASE_URL";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Canvas image loaded at startup
    pub init_image: PathBuf,
    /// Where `out-*.png` / `out-*.txt` records are written
    pub output_dir: PathBuf,
    pub api_base: String,
    pub model: String,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            init_image: PathBuf::from("../init.png"),
            output_dir: PathBuf::from("."),
            api_base: "https://api.openai.com/v1".to_string(),
            model: "gpt-image-1".to_string(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load [`CONFIG_FILE`] if present and apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(CONFIG_FILE), |name| std::env::var(name).ok())
    }

    fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let yaml = if path.exists() {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            log::info!("Loaded configuration from {}", path.display());
            Some(yaml)
        } else {
            None
        };
        Self::from_sources(yaml.as_deref(), env)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    fn from_sources(yaml: Option<&str>, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = match yaml {
            Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
            _ => Self::default(),
        };

        let non_empty = |name: &str| env(name).filter(|value| !value.trim().is_empty());
        if let Some(base) = non_empty(API_BASE_VAR) {
            config.api_base = base;
        }
        config.api_key = non_empty(API_KEY_VAR);
        Ok(config)
    }

    /// Backend settings; fails when no API key is configured.
    pub fn openai_settings(&self) -> Result<OpenAiSettings> {
        let api_key = self
            .api_key
            .clone()
            .with_context(|| format!("{API_KEY_VAR} is not set"))?;

        Ok(OpenAiSettings {
            api_key,
            api_base: self.api_base.clone(),
            model: self.model.clone(),
        })
    }
}
