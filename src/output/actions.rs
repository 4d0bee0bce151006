use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;

use crate::error::ActionError;
use crate::event::TriggerVerdict;

/// Format step outputs in the runner's `GITHUB_OUTPUT` file syntax.
///
/// Single-line values use `name=value`. Multi-line values use the
/// `name<<DELIMITER` heredoc form with a delimiter absent from the value.
pub fn format_step_outputs(outputs: &[(&str, String)]) -> String {
    let mut out = String::new();
    for (name, value) in outputs {
        if value.contains('\n') || value.contains('\r') {
            let delimiter = heredoc_delimiter(value);
            let _ = writeln!(out, "{name}<<{delimiter}");
            let _ = writeln!(out, "{value}");
            let _ = writeln!(out, "{delimiter}");
        } else {
            let _ = writeln!(out, "{name}={value}");
        }
    }
    out
}

fn heredoc_delimiter(value: &str) -> String {
    let mut delimiter = String::from("KILOCODE_EOF");
    let mut n = 0u32;
    while value.contains(&delimiter) {
        n += 1;
        delimiter = format!("KILOCODE_EOF_{n}");
    }
    delimiter
}

/// Append step outputs to the file at `path` (the value of `GITHUB_OUTPUT`).
pub fn write_step_outputs(path: &Path, outputs: &[(&str, String)]) -> Result<(), ActionError> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(format_step_outputs(outputs).as_bytes())?;
    tracing::debug!(path = %path.display(), count = outputs.len(), "wrote step outputs");
    Ok(())
}

/// Step outputs for a trigger verdict. Absent values become empty strings.
pub fn verdict_outputs(verdict: &TriggerVerdict) -> Vec<(&'static str, String)> {
    vec![
        ("should_trigger", verdict.should_trigger.to_string()),
        (
            "trigger_reason",
            verdict
                .trigger_reason
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ),
        (
            "issue_number",
            verdict
                .issue_number
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
        (
            "issue_type",
            verdict
                .issue_type
                .map(|t| t.as_str().to_string())
                .unwrap_or_default(),
        ),
        (
            "comment_id",
            verdict
                .comment_id
                .map(|n| n.to_string())
                .unwrap_or_default(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{IssueType, TriggerReason};

    #[test]
    fn test_single_line_outputs() {
        let out = format_step_outputs(&[("a", "1".into()), ("b", String::new())]);
        assert_eq!(out, "a=1\nb=\n");
    }

    #[test]
    fn test_multi_line_output_uses_heredoc() {
        let out = format_step_outputs(&[("body", "line one\nline two".into())]);
        assert_eq!(out, "body<<KILOCODE_EOF\nline one\nline two\nKILOCODE_EOF\n");
    }

    #[test]
    fn test_heredoc_delimiter_avoids_collisions() {
        let value = "x\nKILOCODE_EOF\nKILOCODE_EOF_1".to_string();
        let out = format_step_outputs(&[("tricky", value)]);
        assert!(out.starts_with("tricky<<KILOCODE_EOF_2\n"));
        assert!(out.ends_with("\nKILOCODE_EOF_2\n"));
    }

    #[test]
    fn test_write_step_outputs_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("github_output");
        std::fs::write(&path, "existing=1\n").unwrap();

        write_step_outputs(&path, &[("next", "2".into())]).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing=1\nnext=2\n");
    }

    #[test]
    fn test_verdict_outputs() {
        let verdict = TriggerVerdict {
            should_trigger: true,
            trigger_reason: Some(TriggerReason::Comment("@kilocode-agent".into())),
            issue_number: Some(12),
            issue_type: Some(IssueType::Pr),
            comment_id: Some(99),
        };
        assert_eq!(
            format_step_outputs(&verdict_outputs(&verdict)),
            "should_trigger=true\ntrigger_reason=comment with @kilocode-agent\nissue_number=12\nissue_type=pr\ncomment_id=99\n"
        );

        let empty = format_step_outputs(&verdict_outputs(&TriggerVerdict::default()));
        assert_eq!(
            empty,
            "should_trigger=false\ntrigger_reason=\nissue_number=\nissue_type=\ncomment_id=\n"
        );
    }
}
