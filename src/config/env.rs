use std::collections::HashMap;

pub const API_KEY_VAR: &str = "KILOCODE_API_KEY";
pub const PAT_TOKEN_VAR: &str = "PAT_TOKEN";
pub const PAT_USERNAME_VAR: &str = "PAT_USERNAME";

/// Outcome of checking the credentials the workflow provides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvValidation {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Check required and optional credentials.
///
/// A missing API key invalidates the run. Missing PAT credentials only
/// produce warnings describing the fallback. Empty values count as missing.
pub fn validate_environment(env: &HashMap<String, String>) -> EnvValidation {
    let is_set = |name: &str| env.get(name).is_some_and(|v| !v.is_empty());

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if !is_set(API_KEY_VAR) {
        errors.push(format!(
            "{API_KEY_VAR} is required. Add it as a repository secret and pass it to the action."
        ));
    }

    if !is_set(PAT_TOKEN_VAR) {
        warnings.push(format!(
            "{PAT_TOKEN_VAR} is not set; falling back to GITHUB_TOKEN. Pull requests opened with it will not trigger other workflows."
        ));
    }

    if !is_set(PAT_USERNAME_VAR) {
        warnings.push(format!(
            "{PAT_USERNAME_VAR} is not set; commits will be authored as github-actions[bot]."
        ));
    }

    EnvValidation {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_environment() {
        let result = validate_environment(&HashMap::new());
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains(API_KEY_VAR));
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains(PAT_TOKEN_VAR));
        assert!(result.warnings[1].contains(PAT_USERNAME_VAR));
    }

    #[test]
    fn test_fully_configured_environment() {
        let result = validate_environment(&env(&[
            ("KILOCODE_API_KEY", "x"),
            ("PAT_TOKEN", "y"),
            ("PAT_USERNAME", "z"),
        ]));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_pat_is_only_a_warning() {
        let result = validate_environment(&env(&[("KILOCODE_API_KEY", "x")]));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("GITHUB_TOKEN"));
        assert!(result.warnings[1].contains("github-actions[bot]"));
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let result = validate_environment(&env(&[
            ("KILOCODE_API_KEY", ""),
            ("PAT_TOKEN", "y"),
            ("PAT_USERNAME", "z"),
        ]));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.warnings.is_empty());
    }
}
