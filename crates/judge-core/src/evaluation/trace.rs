//! Parsing of raw execution-trace lines.
//!
//! The evaluation engine emits its linear execution log as plain strings in
//! the form `:icon: message`, where `icon` is an iconographic hint token
//! (e.g. `rocket`, `mag`, `warning`). Severity is carried inline as
//! `[CRITICAL]` or `[WARN]` markers in the message text.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Matches the leading `:icon:` hint token of a trace line.
static ICON_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:([A-Za-z0-9_+-]+):\s*(.*)$").expect("icon prefix pattern"));

/// Severity of a single trace line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    #[default]
    Info,
    Warning,
    Critical,
}

/// One structured line of the evaluation engine's execution log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceLine {
    /// Iconographic hint token, when the line carried one.
    pub icon: Option<String>,
    /// Severity derived from inline markers and the icon hint.
    pub severity: TraceSeverity,
    /// The message text with the icon prefix stripped.
    pub text: String,
}

impl TraceLine {
    /// Parses one raw trace line.
    ///
    /// Lines without an icon prefix are kept verbatim with severity
    /// derived from inline markers alone; parsing never fails.
    pub fn parse(raw: &str) -> Self {
        let (icon, text) = match ICON_PREFIX.captures(raw) {
            Some(caps) => (
                Some(caps[1].to_string()),
                caps[2].to_string(),
            ),
            None => (None, raw.to_string()),
        };

        let severity = if text.contains("[CRITICAL]") {
            TraceSeverity::Critical
        } else if text.contains("[WARN]") || icon.as_deref() == Some("warning") {
            TraceSeverity::Warning
        } else {
            TraceSeverity::Info
        };

        Self {
            icon,
            severity,
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_icon_prefix() {
        let line = TraceLine::parse(":rocket: Initialized analyzer engine");
        assert_eq!(line.icon.as_deref(), Some("rocket"));
        assert_eq!(line.text, "Initialized analyzer engine");
        assert_eq!(line.severity, TraceSeverity::Info);
    }

    #[test]
    fn warning_icon_sets_severity() {
        let line = TraceLine::parse(":warning: Playwright libraries not found");
        assert_eq!(line.severity, TraceSeverity::Warning);
    }

    #[test]
    fn inline_markers_override_info() {
        let critical = TraceLine::parse(":mag: [CRITICAL] Image missing alt text");
        assert_eq!(critical.severity, TraceSeverity::Critical);

        let warn = TraceLine::parse("[WARN] Missing doctype declaration");
        assert_eq!(warn.severity, TraceSeverity::Warning);
        assert_eq!(warn.icon, None);
    }

    #[test]
    fn plain_lines_pass_through() {
        let line = TraceLine::parse("Viewport Verified: 390x844");
        assert_eq!(line.icon, None);
        assert_eq!(line.text, "Viewport Verified: 390x844");
        assert_eq!(line.severity, TraceSeverity::Info);
    }

    #[test]
    fn colon_inside_message_is_not_an_icon() {
        let line = TraceLine::parse("CONSOLE [error]: undefined is not a function");
        assert_eq!(line.icon, None);
    }
}
