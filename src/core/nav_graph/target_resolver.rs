// src/core/nav_graph/target_resolver.rs
use super::call_extractor::RawCall;
use super::nav_graph::NavNode;

/// Matches a raw call's target text against known views.
pub struct TargetResolver;

impl TargetResolver {
    /// Return the first node in `visible` whose label equals the target or
    /// whose source path contains it.
    ///
    /// `visible` is whatever the caller has discovered so far; a view that is
    /// not in the slice cannot be resolved and the call yields `None`.
    pub fn resolve<'a>(call: &RawCall, visible: &'a [NavNode]) -> Option<&'a NavNode> {
        visible.iter().find(|node| Self::matches(call, node))
    }

    fn matches(call: &RawCall, node: &NavNode) -> bool {
        node.label == call.target || node.source_path.contains(call.target.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::nav_graph::{EdgeKind, NodeType};

    fn node(path: &str, label: &str) -> NavNode {
        NavNode::new(path.to_string(), label.to_string(), NodeType::Window)
    }

    #[test]
    fn test_resolves_by_label() {
        let nodes = vec![node("/app/Main.xaml", "Main"), node("/app/Login.xaml", "Login")];
        let call = RawCall::new("Login", EdgeKind::Show);

        let hit = TargetResolver::resolve(&call, &nodes).unwrap();
        assert_eq!(hit.id, "/app/Login.xaml");
    }

    #[test]
    fn test_label_match_is_case_sensitive() {
        let nodes = vec![node("/app/Login.xaml", "Login")];
        let call = RawCall::new("login", EdgeKind::Show);

        assert!(TargetResolver::resolve(&call, &nodes).is_none());
    }

    #[test]
    fn test_resolves_by_path_fragment() {
        let nodes = vec![
            node("/app/Views/Page1.xaml", "Page1"),
            node("/app/Views/Page2.xaml", "Page2"),
        ];
        let call = RawCall::new("Views/Page2.xaml", EdgeKind::Navigate);

        let hit = TargetResolver::resolve(&call, &nodes).unwrap();
        assert_eq!(hit.label, "Page2");
    }

    #[test]
    fn test_first_hit_wins() {
        // "Home" is a substring of both paths; the earlier node is returned
        let nodes = vec![node("/app/Home/Start.xaml", "Start"), node("/app/Home.xaml", "Home")];
        let call = RawCall::new("Home", EdgeKind::Navigate);

        let hit = TargetResolver::resolve(&call, &nodes).unwrap();
        assert_eq!(hit.label, "Start");
    }

    #[test]
    fn test_unknown_target_is_none() {
        let nodes = vec![node("/app/Main.xaml", "Main")];
        let call = RawCall::new("MessageBoxWindow", EdgeKind::ShowDialog);

        assert!(TargetResolver::resolve(&call, &nodes).is_none());
        assert!(TargetResolver::resolve(&call, &[]).is_none());
    }
}
