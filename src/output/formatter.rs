use std::io::IsTerminal;
use owo_colors::OwoColorize;

use crate::link::Link;
use crate::revision::RevisionKind;

/// Confirmation line printed after a link was handed to the browser
/// Format: "Opening {url} ({kind} {revision})"
pub fn format_opening(link: &Link, use_colors: bool) -> String {
    let kind = kind_label(link.revision.kind);
    if use_colors {
        format!(
            "Opening {} ({} {})",
            link.url.underline(),
            kind.cyan(),
            link.revision.value.yellow()
        )
    } else {
        format!("Opening {} ({} {})", link.url, kind, link.revision.value)
    }
}

/// Message for a link the browser refused, with the URL on its own line so
/// it can be copied
pub fn format_open_failed(url: &str, use_colors: bool) -> String {
    if use_colors {
        format!("{}\n{}", "Could not open a browser. Open this URL manually:".red(), url)
    } else {
        format!("Could not open a browser. Open this URL manually:\n{}", url)
    }
}

/// Link as a single JSON object
pub fn format_json(link: &Link) -> serde_json::Result<String> {
    serde_json::to_string(link)
}

fn kind_label(kind: RevisionKind) -> &'static str {
    match kind {
        RevisionKind::Branch => "branch",
        RevisionKind::Commit => "commit",
        RevisionKind::DefaultBranch => "default branch",
        RevisionKind::Override => "revision",
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::ResolvedRevision;

    fn sample_link() -> Link {
        Link {
            url: "http://github.com/acme/widgets/tree/v1.0".to_string(),
            revision: ResolvedRevision::from_override("v1.0"),
            remote: "origin".to_string(),
            repository: "http://github.com/acme/widgets".to_string(),
        }
    }

    #[test]
    fn test_format_opening_plain() {
        let output = format_opening(&sample_link(), false);
        assert_eq!(
            output,
            "Opening http://github.com/acme/widgets/tree/v1.0 (revision v1.0)"
        );
    }

    #[test]
    fn test_format_opening_colored_contains_url() {
        let output = format_opening(&sample_link(), true);
        assert!(output.contains("http://github.com/acme/widgets/tree/v1.0"));
        assert!(output.contains("\x1b["));
    }

    #[test]
    fn test_format_open_failed_puts_url_last() {
        let output = format_open_failed("http://example.com/a/b", false);
        assert_eq!(output.lines().last(), Some("http://example.com/a/b"));
    }

    #[test]
    fn test_format_json() {
        let json = format_json(&sample_link()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["url"], "http://github.com/acme/widgets/tree/v1.0");
        assert_eq!(value["remote"], "origin");
        assert_eq!(value["revision"]["kind"], "override");
        assert_eq!(value["revision"]["value"], "v1.0");
    }
}
