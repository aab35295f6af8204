//! Building web links for a working copy.
//!
//! Each operation loads a fresh [`RepositoryContext`], resolves a revision
//! (unless one was given), and assembles the URL.

mod context;
mod error;
mod path;

pub use context::RepositoryContext;
pub use error::LinkError;
pub use path::relative_file_path;

use crate::git::VcsGateway;
use crate::revision::{CommitCheck, ResolvedRevision, RevisionPriority, RevisionResolver};
use crate::url::UrlRequest;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Knobs shared by all link operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkOptions {
    /// Remote to link instead of the push default
    pub remote: Option<String>,
    pub priority: RevisionPriority,
    /// Explicit revision; skips resolution entirely
    pub revision: Option<String>,
    pub commit_check: CommitCheck,
}

/// The file (and lines) a file link points at. Lines are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileTarget {
    pub path: Option<PathBuf>,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
}

/// A finished link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub url: String,
    pub revision: ResolvedRevision,
    pub remote: String,
    pub repository: String,
}

/// Link to a file, optionally anchored to a line or a line range.
///
/// Relative paths in `target` are resolved against `work_dir`.
pub async fn file_url<G: VcsGateway>(
    gateway: &G,
    work_dir: &Path,
    target: &FileTarget,
    options: &LinkOptions,
) -> Result<Link, LinkError> {
    let file = target.path.as_deref().ok_or(LinkError::NoActiveFile)?;
    let context = RepositoryContext::load(gateway, options.remote.as_deref()).await?;
    let relative = relative_file_path(&context.root, work_dir, file)?;
    let revision = revision(gateway, &context, options).await?;

    // Selections made bottom-up arrive reversed
    let (line_start, line_end) = match (target.line_start, target.line_end) {
        (Some(start), Some(end)) if end < start => (Some(end), Some(start)),
        range => range,
    };

    let request = UrlRequest {
        repo_base_url: context.base_url.clone(),
        revision: revision.value.clone(),
        relative_file_path: Some(relative),
        line_start,
        line_end,
    };

    Ok(Link {
        url: request.build(),
        revision,
        remote: context.remote_name,
        repository: context.base_url,
    })
}

/// Link to the repository tree.
pub async fn tree_url<G: VcsGateway>(gateway: &G, options: &LinkOptions) -> Result<Link, LinkError> {
    let context = RepositoryContext::load(gateway, options.remote.as_deref()).await?;
    let revision = revision(gateway, &context, options).await?;

    let request = UrlRequest {
        repo_base_url: context.base_url.clone(),
        revision: revision.value.clone(),
        relative_file_path: None,
        line_start: None,
        line_end: None,
    };

    Ok(Link {
        url: request.build(),
        revision,
        remote: context.remote_name,
        repository: context.base_url,
    })
}

async fn revision<G: VcsGateway>(
    gateway: &G,
    context: &RepositoryContext,
    options: &LinkOptions,
) -> Result<ResolvedRevision, LinkError> {
    if let Some(revision) = options.revision.as_deref().filter(|r| !r.is_empty()) {
        return Ok(ResolvedRevision::from_override(revision));
    }

    let resolved = RevisionResolver::new(gateway, &context.remote_name)
        .with_commit_check(options.commit_check)
        .resolve(options.priority)
        .await?;
    Ok(resolved)
}
