// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Configuration persistence for gex
//!
//! Stores the garden context and the current selections in a config file.
//! All gex data is stored under ~/.gex/:
//! - ~/.gex/config.json - user configuration and selections
//! - ~/.gex/log/ - log files

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Get the base gex directory (~/.gex/)
pub fn base_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|p| p.join(".gex"))
        .context("Could not determine home directory")
}

/// Resource types that can be selected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selectable {
    Shoot,
    Seed,
    Profile,
    Project,
}

impl std::fmt::Display for Selectable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Selectable::Shoot => "shoot",
            Selectable::Seed => "seed",
            Selectable::Profile => "profile",
            Selectable::Project => "project",
        })
    }
}

/// Currently selected elements, used as defaults when no name is given
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selections {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Qualified as `<project>/<name>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoot: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Kubeconfig context of the garden cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub garden_context: Option<String>,

    #[serde(default)]
    pub selections: Selections,
}

impl Config {
    /// Load config from disk, or return default if not found
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write atomically via temp file + rename
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;

        let content = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        let temp_file = tempfile::NamedTempFile::new_in(parent)
            .context("Failed to create temp file for config")?;
        fs::write(temp_file.path(), content)
            .with_context(|| format!("Failed to write temp file {:?}", temp_file.path()))?;
        temp_file
            .persist(path)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Get the config file path (~/.gex/config.json)
    pub fn config_path() -> Result<PathBuf> {
        Ok(base_dir()?.join("config.json"))
    }

    pub fn selection(&self, kind: Selectable) -> Option<&str> {
        let s = &self.selections;
        match kind {
            Selectable::Shoot => s.shoot.as_deref(),
            Selectable::Seed => s.seed.as_deref(),
            Selectable::Profile => s.profile.as_deref(),
            Selectable::Project => s.project.as_deref(),
        }
    }

    /// Record (or with `None`, forget) a selection
    ///
    /// Selecting a project forgets the selected shoot when it belongs to
    /// another project.
    pub fn set_selection(&mut self, kind: Selectable, value: Option<String>) {
        let s = &mut self.selections;
        match kind {
            Selectable::Shoot => s.shoot = value,
            Selectable::Seed => s.seed = value,
            Selectable::Profile => s.profile = value,
            Selectable::Project => {
                if let (Some(project), Some(shoot)) = (&value, &s.shoot)
                    && !shoot.starts_with(&format!("{}/", project))
                {
                    s.shoot = None;
                }
                s.project = value;
            }
        }
    }
}
