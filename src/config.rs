use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{XamlNavError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Markup discovery settings
    pub scan: ScanConfig,

    /// Call target resolution settings
    pub resolution: ResolutionConfig,

    /// Output settings
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Default workspace root when none is given on the command line
    pub root: Option<PathBuf>,

    /// Gitignore-style globs excluded from the walk
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Extension of markup files, without the dot
    pub markup_extension: String,

    /// Suffix appended to a markup path to find its code-behind
    pub companion_suffix: String,

    /// Upper bound on candidates handed to the builder
    pub max_candidates: usize,

    /// Companion files larger than this (in bytes) are not scanned
    pub max_companion_size: u64,

    /// Honour .gitignore files while walking
    pub respect_gitignore: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionConfig {
    pub mode: ResolutionMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default output format
    pub format: ExportFormat,

    /// Include metadata headers
    pub include_metadata: bool,
}

/// How navigation calls are matched against discovered views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionMode {
    /// Resolve each file's calls right after its own node is added.
    /// Calls to views enumerated later are dropped.
    #[default]
    SinglePass,
    /// Collect every node first, then resolve all calls against the full set.
    TwoPass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Dot,
    Markdown,
}

impl FromStr for ExportFormat {
    type Err = XamlNavError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "dot" | "graphviz" => Ok(Self::Dot),
            "markdown" | "md" => Ok(Self::Markdown),
            other => Err(XamlNavError::Config(format!("Unknown output format: {}", other))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Dot => "dot",
            Self::Markdown => "markdown",
        };
        f.write_str(name)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                root: None,
                ignore_patterns: vec![
                    "bin/".to_string(),
                    "obj/".to_string(),
                    ".git/".to_string(),
                    ".vs/".to_string(),
                ],
            },
            scan: ScanConfig {
                markup_extension: "xaml".to_string(),
                companion_suffix: ".cs".to_string(),
                max_candidates: 500,
                max_companion_size: 1024 * 1024, // 1MB
                respect_gitignore: true,
            },
            resolution: ResolutionConfig {
                mode: ResolutionMode::SinglePass,
            },
            output: OutputConfig {
                format: ExportFormat::Json,
                include_metadata: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| XamlNavError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| XamlNavError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Ok(Self::default())
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Xamlnav.toml",
                    "xamlnav.toml",
                    ".xamlnav.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}
