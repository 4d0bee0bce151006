use chrono::Utc;

/// Prefix of every branch the agent pushes.
pub const BRANCH_PREFIX: &str = "kilocode-fix";

/// Branch name for `issue_number` at a given instant (Unix milliseconds):
/// `kilocode-fix-<issue>-<seconds>`.
pub fn branch_name_at(issue_number: u64, timestamp_millis: i64) -> String {
    let seconds = timestamp_millis.div_euclid(1000);
    format!("{BRANCH_PREFIX}-{issue_number}-{seconds}")
}

/// Branch name for `issue_number` at the current wall-clock time.
///
/// Only unique per second, not reproducible.
pub fn branch_name(issue_number: u64) -> String {
    branch_name_at(issue_number, Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branch_name_at_fixed_timestamp() {
        assert_eq!(branch_name_at(42, 1_704_067_200_000), "kilocode-fix-42-1704067200");
    }

    #[test]
    fn test_branch_name_floors_milliseconds() {
        assert_eq!(branch_name_at(7, 1_704_067_200_999), "kilocode-fix-7-1704067200");
        assert_eq!(branch_name_at(7, 999), "kilocode-fix-7-0");
    }

    #[test]
    fn test_branch_name_uses_current_time() {
        let before = Utc::now().timestamp();
        let name = branch_name(3);
        let after = Utc::now().timestamp();

        let seconds: i64 = name
            .strip_prefix("kilocode-fix-3-")
            .expect("prefix")
            .parse()
            .expect("numeric suffix");
        assert!((before..=after).contains(&seconds));
    }
}
