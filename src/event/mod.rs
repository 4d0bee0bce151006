pub mod classifier;
pub mod types;

use std::path::Path;

pub use classifier::{IssueType, TriggerReason, TriggerVerdict, classify};
pub use types::WebhookEvent;

use crate::error::ActionError;

/// Read the runner's event payload file and build the typed event.
///
/// A missing path yields an empty payload, which is enough for
/// `workflow_call` and classifies as "no target" for everything else.
pub fn load_event(event_name: &str, event_path: Option<&Path>) -> Result<WebhookEvent, ActionError> {
    let payload = match event_path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                ActionError::Other(format!(
                    "failed to read event payload {}: {e}",
                    path.display()
                ))
            })?;
            serde_json::from_str(&text)?
        }
        None => {
            tracing::warn!(event_name, "no event payload path given, using an empty payload");
            serde_json::json!({})
        }
    };
    Ok(WebhookEvent::from_payload(event_name, &payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_load_event_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, fixtures::issue_labeled(4, "fix-me").to_string()).unwrap();

        let event = load_event("issues", Some(&path)).unwrap();
        assert_eq!(event.label(), Some("fix-me"));
        assert_eq!(event.issue().and_then(|i| i.number), Some(4));
    }

    #[test]
    fn test_load_event_without_path() {
        let event = load_event("workflow_call", None).unwrap();
        assert_eq!(event, WebhookEvent::WorkflowCall);
    }

    #[test]
    fn test_load_event_missing_file() {
        let err = load_event("issues", Some(Path::new("/nonexistent/event.json"))).unwrap_err();
        assert!(err.to_string().contains("failed to read event payload"));
    }

    #[test]
    fn test_load_event_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("event.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_event("issues", Some(&path)),
            Err(ActionError::Json(_))
        ));
    }
}
