// src/core/nav_graph/mod.rs
//! View navigation graph for XAML projects
//!
//! Each markup file becomes a node typed by its root element. Its
//! code-behind is scanned for `new X().Show()`, `new X().ShowDialog()` and
//! `NavigationService.Navigate(new Uri("..."))`, and each call is matched
//! against views discovered so far to produce edges.

mod classifier;
mod call_extractor;
mod target_resolver;
mod nav_graph;
mod assembler;

pub use classifier::{FileClassifier, NodeType};
pub use call_extractor::{CallExtractor, EdgeKind};
pub use nav_graph::{NavigationGraph, NavNode};
pub use assembler::{GraphAssembler, BuildReport};

#[cfg(test)]
pub use nav_graph::NavEdge;
