// src/core/project_files.rs
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use tracing::{debug, warn};

use crate::config::{ProjectConfig, ScanConfig};
use crate::error::{XamlNavError, Result};

/// A markup file handed to the graph builder
#[derive(Debug, Clone)]
pub struct MarkupFile {
    /// Canonical path, used as the node id
    pub path: PathBuf,

    /// Raw markup text
    pub text: String,
}

/// Outcome of loading the code-behind for one markup file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanionSource {
    Loaded(String),
    Missing,
    Unreadable,
    TooLarge { size: u64 },
}

impl CompanionSource {
    /// Text to scan; anything but a successful load scans as empty
    pub fn text(&self) -> Option<&str> {
        match self {
            CompanionSource::Loaded(text) => Some(text),
            _ => None,
        }
    }
}

/// Access to a project's markup files and their companions
#[async_trait]
pub trait ProjectFiles: Send + Sync {
    /// Candidate markup files under `root`, in a deterministic order
    async fn enumerate_markup(&self, root: &Path) -> Vec<MarkupFile>;

    /// Load the companion source paired with `markup_path`
    async fn read_companion(&self, markup_path: &Path) -> CompanionSource;
}

/// Code-behind path for a markup file: `Main.xaml` + `.cs` -> `Main.xaml.cs`
pub fn companion_path(markup_path: &Path, suffix: &str) -> PathBuf {
    let mut raw: OsString = markup_path.as_os_str().to_owned();
    raw.push(suffix);
    PathBuf::from(raw)
}

/// [`ProjectFiles`] backed by the local file system
pub struct FsProjectFiles {
    scan: ScanConfig,
    ignore_patterns: Vec<String>,
}

impl FsProjectFiles {
    pub fn new(project: &ProjectConfig, scan: &ScanConfig) -> Result<Self> {
        if scan.markup_extension.trim_start_matches('.').is_empty() {
            return Err(XamlNavError::Config("markup_extension must not be empty".to_string()));
        }

        Ok(Self {
            scan: scan.clone(),
            ignore_patterns: project.ignore_patterns.clone(),
        })
    }

    fn is_markup(&self, path: &Path) -> bool {
        let wanted = self.scan.markup_extension.trim_start_matches('.');
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case(wanted))
    }

    fn walker(&self, root: &Path) -> Result<ignore::Walk> {
        let mut overrides = OverrideBuilder::new(root);
        for pattern in &self.ignore_patterns {
            overrides
                .add(&format!("!{}", pattern))
                .map_err(|e| XamlNavError::Config(format!("Bad ignore pattern {}: {}", pattern, e)))?;
        }
        let overrides = overrides
            .build()
            .map_err(|e| XamlNavError::Config(e.to_string()))?;

        Ok(WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(self.scan.respect_gitignore)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build())
    }

    /// Markup paths under `root`, sorted per directory, at most `max_candidates`
    pub fn candidate_paths(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(XamlNavError::FileSystem(format!(
                "Workspace root {} is not a directory",
                root.display()
            )));
        }

        let mut paths = Vec::new();

        for entry in self.walker(root)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_type().map_or(false, |ft| ft.is_file()) && self.is_markup(path) {
                paths.push(path.to_path_buf());
                if paths.len() >= self.scan.max_candidates {
                    debug!("Reached candidate limit of {}", self.scan.max_candidates);
                    break;
                }
            }
        }

        Ok(paths)
    }
}

#[async_trait]
impl ProjectFiles for FsProjectFiles {
    async fn enumerate_markup(&self, root: &Path) -> Vec<MarkupFile> {
        let paths = match self.candidate_paths(root) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Could not enumerate {}: {}", root.display(), e);
                return Vec::new();
            }
        };

        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            let bytes = match tokio::fs::read(&path).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping unreadable markup {}: {}", path.display(), e);
                    continue;
                }
            };
            let canonical = tokio::fs::canonicalize(&path).await.unwrap_or(path);

            files.push(MarkupFile {
                path: canonical,
                text: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        files
    }

    async fn read_companion(&self, markup_path: &Path) -> CompanionSource {
        let path = companion_path(markup_path, &self.scan.companion_suffix);

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return CompanionSource::Missing,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return CompanionSource::Missing,
            Err(e) => {
                debug!("Cannot stat {}: {}", path.display(), e);
                return CompanionSource::Unreadable;
            }
        };

        if metadata.len() > self.scan.max_companion_size {
            return CompanionSource::TooLarge { size: metadata.len() };
        }

        match tokio::fs::read(&path).await {
            Ok(bytes) => CompanionSource::Loaded(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                debug!("Cannot read {}: {}", path.display(), e);
                CompanionSource::Unreadable
            }
        }
    }
}
