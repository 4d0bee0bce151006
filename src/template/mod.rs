pub mod render;
pub mod text;

pub use text::{IssueDetails, ResolutionResult, commit_message, pr_body, prompt, result_comment};
