//! Choosing the revision a link points at.
//!
//! Branch links are readable; commit links are stable. The caller picks the
//! order with [`RevisionPriority`], and both orders fall back to the remote's
//! default branch when neither the branch nor the commit is usable.

use crate::git::{GitError, VcsGateway, DETACHED_HEAD};
use crate::url::encode_component;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

/// Used when the remote's default branch can't be determined
pub const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Which revision kind to try first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum RevisionPriority {
    #[default]
    BranchFirst,
    CommitFirst,
}

impl From<&str> for RevisionPriority {
    /// `commit` selects commit-first; anything else is branch-first.
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "commit" | "commit-first" | "commit_first" => RevisionPriority::CommitFirst,
            _ => RevisionPriority::BranchFirst,
        }
    }
}

impl From<String> for RevisionPriority {
    fn from(value: String) -> Self {
        RevisionPriority::from(value.as_str())
    }
}

impl From<RevisionPriority> for String {
    fn from(value: RevisionPriority) -> Self {
        match value {
            RevisionPriority::BranchFirst => "branch".to_string(),
            RevisionPriority::CommitFirst => "commit".to_string(),
        }
    }
}

/// How commit-first decides that HEAD's commit is worth linking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommitCheck {
    /// The commit is part of local history. Fast, but says nothing about
    /// whether it was ever pushed.
    #[default]
    Local,
    /// Some remote-tracking branch contains the commit.
    RemoteTracking,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevisionKind {
    Branch,
    Commit,
    DefaultBranch,
    Override,
}

/// A revision ready to be placed in a URL path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRevision {
    pub kind: RevisionKind,
    /// Percent-encoded branch name, or a raw commit hash
    pub value: String,
}

impl ResolvedRevision {
    fn branch(kind: RevisionKind, name: &str) -> Self {
        Self {
            kind,
            value: encode_component(name).into_owned(),
        }
    }

    fn commit(hash: String) -> Self {
        Self {
            kind: RevisionKind::Commit,
            value: hash,
        }
    }

    /// Use a caller-supplied revision as is, apart from encoding.
    pub fn from_override(revision: &str) -> Self {
        Self::branch(RevisionKind::Override, revision)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for ResolvedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Picks the revision for one link. Holds no state of its own beyond the
/// remote it was created for; every call re-reads the gateway.
pub struct RevisionResolver<'a, G> {
    gateway: &'a G,
    remote: &'a str,
    commit_check: CommitCheck,
}

impl<'a, G: VcsGateway> RevisionResolver<'a, G> {
    pub fn new(gateway: &'a G, remote: &'a str) -> Self {
        Self {
            gateway,
            remote,
            commit_check: CommitCheck::default(),
        }
    }

    pub fn with_commit_check(mut self, commit_check: CommitCheck) -> Self {
        self.commit_check = commit_check;
        self
    }

    pub async fn resolve(&self, priority: RevisionPriority) -> Result<ResolvedRevision, GitError> {
        match priority {
            RevisionPriority::BranchFirst => self.resolve_branch_first().await,
            RevisionPriority::CommitFirst => self.resolve_commit_first().await,
        }
    }

    async fn resolve_branch_first(&self) -> Result<ResolvedRevision, GitError> {
        let branch = self.gateway.current_branch().await?;

        if let Some(name) = self.upstreamed_branch(branch.as_deref()).await? {
            debug!(branch = %name, "linking upstreamed branch");
            return Ok(ResolvedRevision::branch(RevisionKind::Branch, &name));
        }

        // A detached HEAD is only cited when a remote-tracking ref proves the
        // commit was pushed; otherwise the default branch is the safer link.
        if branch.as_deref() == Some(DETACHED_HEAD) {
            if let Some(hash) = self.known_commit(CommitCheck::RemoteTracking).await? {
                debug!(commit = %hash, "linking pushed commit of detached HEAD");
                return Ok(ResolvedRevision::commit(hash));
            }
        }

        self.default_branch().await
    }

    async fn resolve_commit_first(&self) -> Result<ResolvedRevision, GitError> {
        if let Some(hash) = self.known_commit(self.commit_check).await? {
            debug!(commit = %hash, "linking current commit");
            return Ok(ResolvedRevision::commit(hash));
        }

        let branch = self.gateway.current_branch().await?;
        if let Some(name) = self.upstreamed_branch(branch.as_deref()).await? {
            debug!(branch = %name, "linking upstreamed branch");
            return Ok(ResolvedRevision::branch(RevisionKind::Branch, &name));
        }

        self.default_branch().await
    }

    /// The branch, if HEAD is on one and the remote has it.
    async fn upstreamed_branch(&self, branch: Option<&str>) -> Result<Option<String>, GitError> {
        let Some(name) = branch.filter(|b| *b != DETACHED_HEAD) else {
            return Ok(None);
        };

        if self.gateway.has_remote_tracking_branch(self.remote, name).await? {
            return Ok(Some(name.to_string()));
        }

        // The local listing can be stale or missing; ask the remote
        if self.gateway.remote_has_branch(self.remote, name).await? {
            return Ok(Some(name.to_string()));
        }

        Ok(None)
    }

    /// HEAD's commit, if it passes the given check.
    async fn known_commit(&self, check: CommitCheck) -> Result<Option<String>, GitError> {
        let Some(hash) = self.gateway.current_commit().await? else {
            return Ok(None);
        };

        let known = match check {
            CommitCheck::Local => self.gateway.commit_in_history(&hash).await?,
            CommitCheck::RemoteTracking => self.gateway.commit_on_remote_tracking(&hash).await?,
        };

        Ok(known.then_some(hash))
    }

    async fn default_branch(&self) -> Result<ResolvedRevision, GitError> {
        let name = match self.gateway.default_branch(self.remote).await? {
            Some(name) => name,
            None => {
                warn!(
                    remote = %self.remote,
                    "could not determine default branch, using '{}'",
                    FALLBACK_DEFAULT_BRANCH
                );
                FALLBACK_DEFAULT_BRANCH.to_string()
            }
        };
        debug!(branch = %name, "linking default branch");
        Ok(ResolvedRevision::branch(RevisionKind::DefaultBranch, &name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;

    const HASH: &str = "3f786850e387550fdab836ed7e6dc881de23001b";

    #[derive(Default)]
    struct FakeGateway {
        branch: Option<String>,
        commit: Option<String>,
        tracking_branches: Vec<String>,
        remote_branches: Vec<String>,
        in_history: bool,
        on_remote_tracking: bool,
        default_branch: Option<String>,
        ls_remote_calls: Cell<u32>,
    }

    impl VcsGateway for FakeGateway {
        async fn repository_root(&self) -> Result<PathBuf, GitError> {
            Ok(PathBuf::from("/repo"))
        }
        async fn default_remote(&self) -> Result<Option<String>, GitError> {
            Ok(None)
        }
        async fn remote_url(&self, _remote: &str) -> Result<Option<String>, GitError> {
            Ok(None)
        }
        async fn resolve_ssh_host(&self, _alias: &str) -> Result<Option<String>, GitError> {
            Ok(None)
        }
        async fn current_branch(&self) -> Result<Option<String>, GitError> {
            Ok(self.branch.clone())
        }
        async fn current_commit(&self) -> Result<Option<String>, GitError> {
            Ok(self.commit.clone())
        }
        async fn has_remote_tracking_branch(
            &self,
            remote: &str,
            branch: &str,
        ) -> Result<bool, GitError> {
            Ok(self
                .tracking_branches
                .contains(&format!("{}/{}", remote, branch)))
        }
        async fn remote_has_branch(&self, _remote: &str, branch: &str) -> Result<bool, GitError> {
            self.ls_remote_calls.set(self.ls_remote_calls.get() + 1);
            Ok(self.remote_branches.iter().any(|b| b == branch))
        }
        async fn commit_in_history(&self, commit: &str) -> Result<bool, GitError> {
            Ok(self.in_history && self.commit.as_deref() == Some(commit))
        }
        async fn commit_on_remote_tracking(&self, commit: &str) -> Result<bool, GitError> {
            Ok(self.on_remote_tracking && self.commit.as_deref() == Some(commit))
        }
        async fn default_branch(&self, _remote: &str) -> Result<Option<String>, GitError> {
            Ok(self.default_branch.clone())
        }
    }

    fn detached_known_commit() -> FakeGateway {
        FakeGateway {
            branch: Some(DETACHED_HEAD.to_string()),
            commit: Some(HASH.to_string()),
            in_history: true,
            default_branch: Some("main".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_priority_from_str() {
        assert_eq!(RevisionPriority::from("commit"), RevisionPriority::CommitFirst);
        assert_eq!(RevisionPriority::from("Commit-First"), RevisionPriority::CommitFirst);
        assert_eq!(RevisionPriority::from("branch"), RevisionPriority::BranchFirst);
        assert_eq!(RevisionPriority::from("whatever"), RevisionPriority::BranchFirst);
        assert_eq!(RevisionPriority::default(), RevisionPriority::BranchFirst);
    }

    #[test]
    fn test_priority_serde() {
        let priority: RevisionPriority = serde_saphyr::from_str("commit").unwrap();
        assert_eq!(priority, RevisionPriority::CommitFirst);
        let priority: RevisionPriority = serde_saphyr::from_str("sideways").unwrap();
        assert_eq!(priority, RevisionPriority::BranchFirst);
    }

    #[tokio::test]
    async fn test_branch_first_upstreamed_branch() {
        let gateway = FakeGateway {
            branch: Some("feature/login".to_string()),
            commit: Some(HASH.to_string()),
            in_history: true,
            tracking_branches: vec!["origin/feature/login".to_string()],
            ..Default::default()
        };
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Branch);
        assert_eq!(revision.as_str(), "feature%2Flogin");
        // Cheap check was conclusive
        assert_eq!(gateway.ls_remote_calls.get(), 0);
    }

    #[tokio::test]
    async fn test_branch_first_falls_back_to_ls_remote() {
        let gateway = FakeGateway {
            branch: Some("topic".to_string()),
            remote_branches: vec!["topic".to_string()],
            ..Default::default()
        };
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Branch);
        assert_eq!(revision.as_str(), "topic");
        assert_eq!(gateway.ls_remote_calls.get(), 1);
    }

    #[tokio::test]
    async fn test_detached_known_commit_commit_first_returns_raw_hash() {
        let gateway = detached_known_commit();
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::CommitFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Commit);
        assert_eq!(revision.as_str(), HASH);
    }

    #[tokio::test]
    async fn test_detached_known_commit_branch_first_uses_default_branch() {
        let gateway = detached_known_commit();
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::DefaultBranch);
        assert_eq!(revision.as_str(), "main");
    }

    #[tokio::test]
    async fn test_detached_pushed_commit_branch_first_returns_hash() {
        let gateway = FakeGateway {
            on_remote_tracking: true,
            ..detached_known_commit()
        };
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Commit);
        assert_eq!(revision.as_str(), HASH);
    }

    #[tokio::test]
    async fn test_nothing_upstreamed_both_converge_on_default_branch() {
        let gateway = FakeGateway {
            branch: Some("local-only".to_string()),
            commit: Some(HASH.to_string()),
            in_history: false,
            default_branch: Some("release/1.0".to_string()),
            ..Default::default()
        };
        let resolver = RevisionResolver::new(&gateway, "origin");

        let branch_first = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        let commit_first = resolver.resolve(RevisionPriority::CommitFirst).await.unwrap();

        assert_eq!(branch_first, commit_first);
        assert_eq!(branch_first.kind, RevisionKind::DefaultBranch);
        assert_eq!(branch_first.as_str(), "release%2F1.0");
    }

    #[tokio::test]
    async fn test_commit_first_prefers_branch_when_commit_unknown() {
        let gateway = FakeGateway {
            branch: Some("main".to_string()),
            commit: Some(HASH.to_string()),
            in_history: false,
            tracking_branches: vec!["upstream/main".to_string()],
            ..Default::default()
        };
        let resolver = RevisionResolver::new(&gateway, "upstream");
        let revision = resolver.resolve(RevisionPriority::CommitFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Branch);
        assert_eq!(revision.as_str(), "main");
    }

    #[tokio::test]
    async fn test_commit_first_remote_tracking_check() {
        let gateway = FakeGateway {
            branch: Some("main".to_string()),
            tracking_branches: vec!["origin/main".to_string()],
            ..detached_known_commit()
        };
        let resolver =
            RevisionResolver::new(&gateway, "origin").with_commit_check(CommitCheck::RemoteTracking);
        // In local history, but not on any remote-tracking branch
        let revision = resolver.resolve(RevisionPriority::CommitFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::Branch);
    }

    #[tokio::test]
    async fn test_unknown_default_branch_falls_back() {
        let gateway = FakeGateway::default();
        let resolver = RevisionResolver::new(&gateway, "origin");
        let revision = resolver.resolve(RevisionPriority::BranchFirst).await.unwrap();
        assert_eq!(revision.kind, RevisionKind::DefaultBranch);
        assert_eq!(revision.as_str(), FALLBACK_DEFAULT_BRANCH);
    }

    #[test]
    fn test_override_is_encoded() {
        let revision = ResolvedRevision::from_override("v1.2.3+build");
        assert_eq!(revision.kind, RevisionKind::Override);
        assert_eq!(revision.to_string(), "v1.2.3%2Bbuild");
        assert_eq!(ResolvedRevision::from_override(HASH).as_str(), HASH);
    }
}
