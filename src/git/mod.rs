//! Queries against the working copy and the user's SSH setup.
//!
//! Everything the link logic needs to know about live repository state goes
//! through [`VcsGateway`], so the resolver can be driven by a fake in tests.

mod cli;
mod error;

pub use cli::{GitCli, DEFAULT_TIMEOUT};
pub use error::GitError;

use std::path::PathBuf;

/// What `git rev-parse --abbrev-ref HEAD` prints when HEAD is detached
pub const DETACHED_HEAD: &str = "HEAD";

/// Remote used when no push default is configured
pub const FALLBACK_REMOTE: &str = "origin";

/// Live repository state. Every call re-reads the underlying tools; nothing
/// is cached between calls.
#[allow(async_fn_in_trait)]
pub trait VcsGateway {
    /// Top-level directory of the working copy.
    async fn repository_root(&self) -> Result<PathBuf, GitError>;

    /// Configured push-default remote (`remote.pushDefault`), if any.
    async fn default_remote(&self) -> Result<Option<String>, GitError>;

    /// URL of the named remote, `None` when the remote does not exist.
    async fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError>;

    /// Real hostname behind an SSH host alias, `None` when it can't be
    /// determined.
    async fn resolve_ssh_host(&self, alias: &str) -> Result<Option<String>, GitError>;

    /// Current branch name, or [`DETACHED_HEAD`] when detached. `None` in a
    /// repository without commits.
    async fn current_branch(&self) -> Result<Option<String>, GitError>;

    /// Full hash of HEAD.
    async fn current_commit(&self) -> Result<Option<String>, GitError>;

    /// Whether a remote-tracking ref `<remote>/<branch>` exists locally.
    /// Cheap; no network access.
    async fn has_remote_tracking_branch(&self, remote: &str, branch: &str)
        -> Result<bool, GitError>;

    /// Whether the remote itself advertises `refs/heads/<branch>`.
    /// Needs a network round-trip.
    async fn remote_has_branch(&self, remote: &str, branch: &str) -> Result<bool, GitError>;

    /// Whether the commit appears in local history.
    async fn commit_in_history(&self, commit: &str) -> Result<bool, GitError>;

    /// Whether any remote-tracking branch contains the commit.
    async fn commit_on_remote_tracking(&self, commit: &str) -> Result<bool, GitError>;

    /// Default branch of the remote (what its `HEAD` points at).
    async fn default_branch(&self, remote: &str) -> Result<Option<String>, GitError>;
}
