// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use tracing::{info, warn, debug};

use crate::config::{Config, ExportFormat, ResolutionMode};
use super::{
    BuildReport, CallExtractor, CompanionSource, EdgeKind, FileClassifier, FsProjectFiles,
    GraphAssembler, GraphExporter, NavNode, NodeType, ProjectFiles
};

/// Main orchestration engine behind the CLI commands
pub struct Engine {
    config: Config,
    exporter: GraphExporter,
}

impl Engine {
    /// Create a new engine instance
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: Config) -> Self {
        debug!("Loaded configuration: {:?}", config);

        let exporter = GraphExporter::new(Some(config.project.name.clone()), &config.output);
        Self { config, exporter }
    }

    /// Write a default configuration file
    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let dir = path.unwrap_or_else(|| PathBuf::from("."));
        let config_path = dir.join("Xamlnav.toml");

        if config_path.exists() {
            warn!("{} already exists, leaving it untouched", config_path.display());
            return Ok(());
        }

        std::fs::create_dir_all(&dir)?;
        let mut config = Config::default();
        if let Some(name) = dir.canonicalize().ok().and_then(|d| d.file_name().map(|n| n.to_string_lossy().to_string())) {
            config.project.name = name;
        }
        config.save(&config_path)?;

        info!("Wrote {}", config_path.display());
        Ok(())
    }

    /// Build the graph and export it to `output`, or stdout when absent
    pub async fn build(
        &self,
        root: Option<PathBuf>,
        output: Option<PathBuf>,
        format: Option<ExportFormat>,
        two_pass: bool,
    ) -> Result<()> {
        let format = format.unwrap_or(self.config.output.format);
        let root = self.workspace_root(root);
        let report = self.build_report(root.as_deref(), two_pass).await?;
        if report.graph.is_empty() {
            warn!("No markup files found, exporting an empty graph");
        }

        match output {
            Some(path) => {
                self.exporter
                    .export(&report.graph, format, &path)
                    .with_context(|| format!("Failed to export graph to {}", path.display()))?;
                info!("Wrote {} graph to {}", format, path.display());
            }
            None => println!("{}", self.exporter.render(&report.graph, format)?),
        }

        Ok(())
    }

    /// Build the graph and print counters for the run
    pub async fn stats(&self, root: Option<PathBuf>, two_pass: bool) -> Result<()> {
        let root = self.workspace_root(root);
        let report = self.build_report(root.as_deref(), two_pass).await?;
        print!("{}", Self::stats_summary(&report));
        Ok(())
    }

    /// Counter table for one build, as printed by `stats`
    pub fn stats_summary(report: &BuildReport) -> String {
        let stats = &report.stats;
        let graph = &report.graph;
        let mut lines = Vec::new();

        lines.push(format!("Views:                {}", graph.nodes().len()));
        for node_type in [
            NodeType::Window,
            NodeType::Page,
            NodeType::Dialog,
            NodeType::UserControl,
        ] {
            lines.push(format!("  {:<19} {}", format!("{}:", node_type), graph.count_by_type(node_type)));
        }
        lines.push(format!("Edges:                {}", graph.edges().len()));
        for kind in [EdgeKind::Navigate, EdgeKind::ShowDialog, EdgeKind::Show] {
            lines.push(format!("  {:<19} {}", format!("{}:", kind), graph.count_by_kind(kind)));
        }
        lines.push(format!("Entry views:          {}", graph.entry_views().len()));
        lines.push(format!("Isolated views:       {}", graph.isolated_views().len()));
        lines.push(format!("Candidates:           {}", stats.candidates));
        lines.push(format!("  beyond view limit:  {}", stats.capped));
        lines.push(format!("  duplicates:         {}", stats.duplicates));
        lines.push(format!("Companions loaded:    {}", stats.companions_loaded));
        lines.push(format!("  missing:            {}", stats.companions_missing));
        lines.push(format!("  unreadable:         {}", stats.companions_unreadable));
        lines.push(format!("  too large:          {}", stats.companions_too_large));
        lines.push(format!("Calls extracted:      {}", stats.calls_extracted));
        lines.push(format!("  resolved:           {}", stats.calls_resolved));
        lines.push(format!("  unresolved:         {}", stats.calls_unresolved));

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }

    /// Classify one markup file and list the calls in its code-behind
    pub async fn inspect(&self, file: PathBuf) -> Result<()> {
        print!("{}", self.inspect_report(&file).await?);
        Ok(())
    }

    /// Text printed by `inspect` for `file`
    pub async fn inspect_report(&self, file: &Path) -> Result<String> {
        let markup = tokio::fs::read(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let node_type = FileClassifier::classify(&String::from_utf8_lossy(&markup));

        let mut lines = vec![format!("{} [{}]", NavNode::label_for(file), node_type)];

        let files = self.project_files()?;
        match files.read_companion(file).await {
            CompanionSource::Loaded(source) => {
                let calls = CallExtractor::new().extract(&source);
                if calls.is_empty() {
                    lines.push("  no navigation calls".to_string());
                }
                for call in calls {
                    lines.push(format!("  {:<10} {}", call.kind, call.target));
                }
            }
            CompanionSource::Missing => lines.push("  no companion source".to_string()),
            CompanionSource::Unreadable => {
                lines.push("  companion source could not be read".to_string())
            }
            CompanionSource::TooLarge { size } => {
                lines.push(format!("  companion source skipped ({} bytes)", size))
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        Ok(out)
    }

    /// Run one full build against `root`
    pub async fn build_report(&self, root: Option<&Path>, two_pass: bool) -> Result<BuildReport> {
        let mode = if two_pass {
            ResolutionMode::TwoPass
        } else {
            self.config.resolution.mode
        };

        match root {
            Some(root) => info!("Building navigation graph for {} ({:?})", root.display(), mode),
            None => info!("No workspace root available"),
        }

        let assembler = GraphAssembler::new(Box::new(self.project_files()?), mode);
        Ok(assembler.build_with_stats(root).await)
    }

    fn project_files(&self) -> Result<FsProjectFiles> {
        Ok(FsProjectFiles::new(&self.config.project, &self.config.scan)?)
    }

    /// Command-line root, then configured root, then the current directory
    fn workspace_root(&self, root: Option<PathBuf>) -> Option<PathBuf> {
        root.or_else(|| self.config.project.root.clone())
            .or_else(|| std::env::current_dir().ok())
    }
}
