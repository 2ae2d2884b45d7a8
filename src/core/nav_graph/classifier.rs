// src/core/nav_graph/classifier.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of view a markup file declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Window,
    UserControl,
    Page,
    Dialog,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Window => "Window",
            NodeType::UserControl => "UserControl",
            NodeType::Page => "Page",
            NodeType::Dialog => "Dialog",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Assigns a [`NodeType`] to raw markup text.
///
/// Markup under active editing is often malformed, so this never parses:
/// it looks for root element tags and falls back to `UserControl`. The
/// `Dialog` check is a plain substring test and will fire on comments or
/// attribute values that happen to mention the word.
pub struct FileClassifier;

impl FileClassifier {
    pub fn classify(markup: &str) -> NodeType {
        if has_opening_tag(markup, "Window") {
            NodeType::Window
        } else if has_opening_tag(markup, "Page") {
            NodeType::Page
        } else if markup.contains("Dialog") {
            NodeType::Dialog
        } else if has_opening_tag(markup, "UserControl") {
            NodeType::UserControl
        } else {
            NodeType::UserControl
        }
    }
}

/// True when `<name` appears as a whole element name, so `<Window` does not
/// match `<WindowChrome`.
fn has_opening_tag(markup: &str, name: &str) -> bool {
    let needle = format!("<{}", name);

    markup.match_indices(&needle).any(|(start, _)| {
        match markup[start + needle.len()..].chars().next() {
            None => true,
            Some(c) => c.is_whitespace() || c == '>' || c == '/',
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_root() {
        let xaml = r#"<Window x:Class="App.MainWindow" Title="Main"></Window>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::Window);
    }

    #[test]
    fn test_window_wins_over_dialog_substring() {
        let xaml = r#"<Window x:Class="App.SettingsDialog" Title="Settings Dialog">
</Window>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::Window);
    }

    #[test]
    fn test_page_root() {
        let xaml = "<Page\n    x:Class=\"App.Views.Home\">\n</Page>";
        assert_eq!(FileClassifier::classify(xaml), NodeType::Page);
    }

    #[test]
    fn test_page_wins_over_dialog_substring() {
        let xaml = r#"<Page Title="Open Dialog"/>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::Page);
    }

    #[test]
    fn test_dialog_substring_beats_user_control() {
        let xaml = r#"<UserControl x:Class="App.ConfirmDialog"></UserControl>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::Dialog);
    }

    #[test]
    fn test_dialog_substring_in_comment_misfires() {
        let xaml = "<!-- opened from a Dialog -->\n<UserControl></UserControl>";
        assert_eq!(FileClassifier::classify(xaml), NodeType::Dialog);
    }

    #[test]
    fn test_user_control_root() {
        let xaml = r#"<UserControl x:Class="App.Header"></UserControl>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::UserControl);
    }

    #[test]
    fn test_default_is_user_control() {
        assert_eq!(FileClassifier::classify(""), NodeType::UserControl);
        assert_eq!(
            FileClassifier::classify(r#"<ResourceDictionary></ResourceDictionary>"#),
            NodeType::UserControl
        );
    }

    #[test]
    fn test_prefixed_element_names_do_not_count() {
        let xaml = r#"<WindowChrome.WindowChrome></WindowChrome.WindowChrome>"#;
        assert_eq!(FileClassifier::classify(xaml), NodeType::UserControl);
    }

    #[test]
    fn test_malformed_markup_still_classifies() {
        assert_eq!(FileClassifier::classify("<Window"), NodeType::Window);
        assert_eq!(FileClassifier::classify("<Page <<<"), NodeType::Page);
    }
}
