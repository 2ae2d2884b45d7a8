// src/core/nav_graph/call_extractor.rs
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a view is opened from code-behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// NavigationService.Navigate(new Uri("..."))
    Navigate,
    /// new X().ShowDialog()
    ShowDialog,
    /// new X().Show()
    Show,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Navigate => "Navigate",
            EdgeKind::ShowDialog => "ShowDialog",
            EdgeKind::Show => "Show",
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A navigation statement found in companion source, before resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawCall {
    /// Type name or URI fragment as written in the source
    pub target: String,
    pub kind: EdgeKind,
}

impl RawCall {
    pub fn new(target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            target: target.into(),
            kind,
        }
    }
}

/// Finds navigation calls in code-behind text with two regexes.
///
/// Holds only compiled patterns; every call to [`CallExtractor::extract`]
/// starts a fresh scan, so one extractor can be shared across files.
pub struct CallExtractor {
    /// `new Foo().Show()` / `new Foo().ShowDialog()`
    construct_and_show_regex: Regex,

    /// `NavigationService.Navigate(new Uri("..."))`; an empty literal names
    /// nothing and is not matched
    navigate_uri_regex: Regex,
}

impl CallExtractor {
    pub fn new() -> Self {
        Self {
            construct_and_show_regex: Regex::new(
                r"\bnew\s+([A-Za-z_]\w*)\s*\(\s*\)\s*\.\s*(ShowDialog|Show)\s*\(",
            )
            .expect("Invalid construct-and-show regex"),
            navigate_uri_regex: Regex::new(
                r#"\bNavigationService\s*\.\s*Navigate\s*\(\s*new\s+Uri\s*\(\s*@?"([^"]+)""#,
            )
            .expect("Invalid navigate regex"),
        }
    }

    /// Scan `source` and return every call, construct-and-show matches first,
    /// then navigate-by-URI matches, each group in source order.
    pub fn extract(&self, source: &str) -> Vec<RawCall> {
        let shown = self
            .construct_and_show_regex
            .captures_iter(source)
            .map(|caps| {
                let kind = if &caps[2] == "ShowDialog" {
                    EdgeKind::ShowDialog
                } else {
                    EdgeKind::Show
                };
                RawCall::new(&caps[1], kind)
            });

        let navigated = self
            .navigate_uri_regex
            .captures_iter(source)
            .map(|caps| RawCall::new(&caps[1], EdgeKind::Navigate));

        shown.chain(navigated).collect()
    }
}

impl Default for CallExtractor {
    fn default() -> Self {
        Self::new()
    }
}
