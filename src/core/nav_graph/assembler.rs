// src/core/nav_graph/assembler.rs
use std::collections::HashSet;
use std::path::Path;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ResolutionMode;
use crate::core::project_files::{CompanionSource, ProjectFiles};
use super::call_extractor::{CallExtractor, RawCall};
use super::classifier::FileClassifier;
use super::nav_graph::{NavEdge, NavNode, NavigationGraph};
use super::target_resolver::TargetResolver;

/// Hard upper bound on views per graph, regardless of how many candidates
/// the enumerator supplies
pub const MAX_GRAPH_NODES: usize = 100;

/// Counters collected while building one graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildStats {
    pub candidates: usize,
    pub capped: usize,
    pub duplicates: usize,
    pub companions_loaded: usize,
    pub companions_missing: usize,
    pub companions_unreadable: usize,
    pub companions_too_large: usize,
    pub calls_extracted: usize,
    pub calls_resolved: usize,
    pub calls_unresolved: usize,
}

/// A graph together with the counters from the build that produced it
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub graph: NavigationGraph,
    pub stats: BuildStats,
}

/// Turns a project's markup files into a [`NavigationGraph`].
///
/// Files are processed one at a time in enumeration order. With
/// [`ResolutionMode::SinglePass`] each file's calls are resolved right after
/// its own node is appended, so only views enumerated earlier (or the file
/// itself) can be targets. [`ResolutionMode::TwoPass`] defers resolution until
/// every node is known.
pub struct GraphAssembler {
    files: Box<dyn ProjectFiles>,
    extractor: CallExtractor,
    mode: ResolutionMode,
}

impl GraphAssembler {
    pub fn new(files: Box<dyn ProjectFiles>, mode: ResolutionMode) -> Self {
        Self {
            files,
            extractor: CallExtractor::new(),
            mode,
        }
    }

    /// Build the graph for `root`; no root gives an empty graph
    pub async fn build(&self, root: Option<&Path>) -> NavigationGraph {
        self.build_with_stats(root).await.graph
    }

    pub async fn build_with_stats(&self, root: Option<&Path>) -> BuildReport {
        let Some(root) = root else {
            debug!("No workspace root, returning empty graph");
            return BuildReport {
                graph: NavigationGraph::empty(),
                stats: BuildStats::default(),
            };
        };

        let candidates = self.files.enumerate_markup(root).await;
        let mut stats = BuildStats {
            candidates: candidates.len(),
            ..BuildStats::default()
        };

        let mut nodes: Vec<NavNode> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut edges: Vec<NavEdge> = Vec::new();
        let mut deferred: Vec<(usize, Vec<RawCall>)> = Vec::new();

        for file in candidates {
            if nodes.len() >= MAX_GRAPH_NODES {
                stats.capped += 1;
                continue;
            }

            let id = file.path.to_string_lossy().to_string();
            if !seen.insert(id.clone()) {
                debug!("Skipping duplicate candidate {}", id);
                stats.duplicates += 1;
                continue;
            }

            let node_type = FileClassifier::classify(&file.text);
            let label = NavNode::label_for(&file.path);
            debug!("{} -> {} ({})", id, label, node_type);
            nodes.push(NavNode::new(id, label, node_type));
            let current = nodes.len() - 1;

            let calls = self.load_calls(&file.path, &mut stats).await;

            match self.mode {
                ResolutionMode::SinglePass => {
                    Self::resolve_calls(current, &calls, &nodes, &mut edges, &mut stats);
                }
                ResolutionMode::TwoPass => deferred.push((current, calls)),
            }
        }

        for (from, calls) in deferred {
            Self::resolve_calls(from, &calls, &nodes, &mut edges, &mut stats);
        }

        if stats.capped > 0 {
            warn!(
                "{} markup files beyond the {} view limit were left out",
                stats.capped, MAX_GRAPH_NODES
            );
        }

        info!(
            "Navigation graph: {} views, {} edges ({} calls unresolved)",
            nodes.len(),
            edges.len(),
            stats.calls_unresolved
        );

        BuildReport {
            graph: NavigationGraph::from_parts(nodes, edges),
            stats,
        }
    }

    /// Extract calls from the companion of `markup_path`; any load failure
    /// counts as no calls
    async fn load_calls(&self, markup_path: &Path, stats: &mut BuildStats) -> Vec<RawCall> {
        let companion = self.files.read_companion(markup_path).await;

        match &companion {
            CompanionSource::Loaded(_) => stats.companions_loaded += 1,
            CompanionSource::Missing => stats.companions_missing += 1,
            CompanionSource::Unreadable => {
                warn!("Companion of {} could not be read", markup_path.display());
                stats.companions_unreadable += 1;
            }
            CompanionSource::TooLarge { size } => {
                warn!(
                    "Companion of {} skipped: {} bytes exceeds size limit",
                    markup_path.display(),
                    size
                );
                stats.companions_too_large += 1;
            }
        }

        let calls = companion
            .text()
            .map(|text| self.extractor.extract(text))
            .unwrap_or_default();
        stats.calls_extracted += calls.len();
        calls
    }

    /// Resolve `calls` made by `visible[from]` against `visible`
    fn resolve_calls(
        from: usize,
        calls: &[RawCall],
        visible: &[NavNode],
        edges: &mut Vec<NavEdge>,
        stats: &mut BuildStats,
    ) {
        let source = &visible[from];

        for call in calls {
            match TargetResolver::resolve(call, visible) {
                Some(target) => {
                    edges.push(NavEdge {
                        from: source.id.clone(),
                        to: target.id.clone(),
                        kind: call.kind,
                    });
                    stats.calls_resolved += 1;
                }
                None => {
                    debug!("Unresolved {} target '{}' in {}", call.kind, call.target, source.label);
                    stats.calls_unresolved += 1;
                }
            }
        }
    }
}
