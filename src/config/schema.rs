use crate::revision::{CommitCheck, RevisionPriority};
use serde::{Deserialize, Serialize};

/// User configuration.
///
/// Every key is optional. Example YAML:
/// ```yaml
/// priority: commit
/// remote: upstream
/// commit_check: remote-tracking
/// git_timeout_secs: 5
/// open_browser: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `branch` (default) or `commit`
    pub priority: RevisionPriority,

    /// Remote to link instead of the push default
    pub remote: Option<String>,

    /// How commit-first decides a commit is linkable
    pub commit_check: CommitCheck,

    /// Upper bound for each git/ssh invocation
    pub git_timeout_secs: u64,

    /// Open links in the browser; when false they are printed
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            priority: RevisionPriority::BranchFirst,
            remote: None,
            commit_check: CommitCheck::Local,
            git_timeout_secs: 10,
            open_browser: true,
        }
    }
}
