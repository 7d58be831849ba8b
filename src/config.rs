//! Report configuration
//!
//! Every field has a default, so an empty YAML document is a valid config.
//!
//! ```yaml
//! group_count: 42
//! histogram_bins: 20
//! pagerank:
//!   damping_factor: 0.85
//! louvain:
//!   seed: 7
//! ```

use crate::graph::DEFAULT_GROUP_COUNT;
use mailnet_algorithms::{EigenvectorConfig, LouvainConfig, PageRankConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings for the whole report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Size of the research-group enumeration
    pub group_count: u16,
    /// Bins per histogram
    pub histogram_bins: usize,
    /// Lowest-variance groups kept in the report
    pub top_groups: usize,
    /// Highest-scoring nodes listed per measure
    pub top_nodes: usize,
    pub pagerank: PageRankSettings,
    pub eigenvector: EigenvectorSettings,
    pub louvain: LouvainSettings,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            group_count: DEFAULT_GROUP_COUNT,
            histogram_bins: 20,
            top_groups: 5,
            top_nodes: 10,
            pagerank: PageRankSettings::default(),
            eigenvector: EigenvectorSettings::default(),
            louvain: LouvainSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageRankSettings {
    pub damping_factor: f64,
    pub iterations: usize,
    pub tolerance: f64,
}

impl Default for PageRankSettings {
    fn default() -> Self {
        let defaults = PageRankConfig::default();
        Self {
            damping_factor: defaults.damping_factor,
            iterations: defaults.iterations,
            tolerance: defaults.tolerance,
        }
    }
}

impl From<&PageRankSettings> for PageRankConfig {
    fn from(s: &PageRankSettings) -> Self {
        PageRankConfig {
            damping_factor: s.damping_factor,
            iterations: s.iterations,
            tolerance: s.tolerance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EigenvectorSettings {
    pub max_iterations: usize,
    pub tolerance: f64,
}

impl Default for EigenvectorSettings {
    fn default() -> Self {
        let defaults = EigenvectorConfig::default();
        Self {
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
        }
    }
}

impl From<&EigenvectorSettings> for EigenvectorConfig {
    fn from(s: &EigenvectorSettings) -> Self {
        EigenvectorConfig {
            max_iterations: s.max_iterations,
            tolerance: s.tolerance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LouvainSettings {
    pub resolution: f64,
    pub max_passes: usize,
    pub max_levels: usize,
    pub tolerance: f64,
    /// Shuffle seed for the node visiting order; unset visits in input order
    pub seed: Option<u64>,
}

impl Default for LouvainSettings {
    fn default() -> Self {
        let defaults = LouvainConfig::default();
        Self {
            resolution: defaults.resolution,
            max_passes: defaults.max_passes,
            max_levels: defaults.max_levels,
            tolerance: defaults.tolerance,
            seed: defaults.seed,
        }
    }
}

impl From<&LouvainSettings> for LouvainConfig {
    fn from(s: &LouvainSettings) -> Self {
        LouvainConfig {
            resolution: s.resolution,
            max_passes: s.max_passes,
            max_levels: s.max_levels,
            tolerance: s.tolerance,
            seed: s.seed,
        }
    }
}

impl ReportConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: ReportConfig = if yaml.trim().is_empty() {
            ReportConfig::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.group_count == 0 {
            return Err(invalid("group_count", "must be at least 1"));
        }
        if self.histogram_bins == 0 {
            return Err(invalid("histogram_bins", "must be at least 1"));
        }

        let d = self.pagerank.damping_factor;
        if !(d > 0.0 && d < 1.0) {
            return Err(invalid("pagerank.damping_factor", format!("{} not in (0, 1)", d)));
        }
        if !(self.pagerank.tolerance > 0.0) {
            return Err(invalid("pagerank.tolerance", "must be positive"));
        }
        if !(self.eigenvector.tolerance > 0.0) {
            return Err(invalid("eigenvector.tolerance", "must be positive"));
        }
        if !(self.louvain.resolution > 0.0) {
            return Err(invalid("louvain.resolution", "must be positive"));
        }
        if !(self.louvain.tolerance >= 0.0) {
            return Err(invalid("louvain.tolerance", "must not be negative"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
