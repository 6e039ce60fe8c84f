//! Project configuration read from `taskgraph.toml`.
//!
//! Every field has a serde default, so a missing file, an empty file and a
//! file with only some sections all resolve to a complete config. Command
//! line flags override whatever is resolved here.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "taskgraph.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_output")]
    pub output: PathBuf,
    /// Source used when a graph file does not name one.
    #[serde(default)]
    pub default_source: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output: default_output(),
            default_source: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_data_dir")]
    pub out_dir: PathBuf,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            out_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_output() -> PathBuf {
    PathBuf::from("results/results.csv")
}

const fn default_seed() -> u64 {
    42
}

/// Load `taskgraph.toml` from `project_root`, or defaults if it is absent.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}
