use super::LinkError;
use crate::git::{VcsGateway, FALLBACK_REMOTE};
use crate::remote::{parse_remote_url, Protocol, RemoteDescriptor};
use crate::url::repo_base_url;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Snapshot of where a repository lives on the web, taken for one operation.
///
/// Built fresh every time: the remote, its URL, and the SSH config can all
/// change between two invocations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryContext {
    /// Working copy top-level directory
    pub root: PathBuf,
    /// Remote the link points at
    pub remote_name: String,
    pub remote: RemoteDescriptor,
    /// Host usable in a web URL (SSH aliases resolved)
    pub web_host: String,
    /// `http://<web_host>/<owner-path>/<repo>`
    pub base_url: String,
}

impl RepositoryContext {
    /// Read the repository's remote through the gateway.
    ///
    /// `remote_override` wins over the push-default remote, which wins over
    /// `origin`.
    pub async fn load<G: VcsGateway>(
        gateway: &G,
        remote_override: Option<&str>,
    ) -> Result<Self, LinkError> {
        let root = gateway.repository_root().await?;

        let remote_name = match remote_override {
            Some(name) => name.to_string(),
            None => gateway
                .default_remote()
                .await?
                .unwrap_or_else(|| FALLBACK_REMOTE.to_string()),
        };

        let raw_url = gateway
            .remote_url(&remote_name)
            .await?
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| LinkError::NoRemoteConfigured {
                remote: remote_name.clone(),
            })?;

        let remote = parse_remote_url(&raw_url)?;
        let web_host = web_host(gateway, &remote).await;
        let base_url = repo_base_url(&web_host, &remote);

        debug!(remote = %remote_name, url = %raw_url, base = %base_url, "loaded repository context");

        Ok(Self {
            root,
            remote_name,
            remote,
            web_host,
            base_url,
        })
    }
}

/// Host for the web URL. SSH hosts may be aliases from `~/.ssh/config`;
/// when the alias can't be resolved the host is used as written.
async fn web_host<G: VcsGateway>(gateway: &G, remote: &RemoteDescriptor) -> String {
    if remote.protocol != Protocol::Ssh {
        return remote.host.clone();
    }

    match gateway.resolve_ssh_host(&remote.host).await {
        Ok(Some(host)) => host,
        Ok(None) => remote.host.clone(),
        Err(e) => {
            warn!(host = %remote.host, error = %e, "could not resolve SSH host alias");
            remote.host.clone()
        }
    }
}
