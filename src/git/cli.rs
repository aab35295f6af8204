use super::{GitError, VcsGateway};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, warn};

/// Upper bound for any single external command
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`VcsGateway`] backed by the `git` and `ssh` executables.
#[derive(Debug, Clone)]
pub struct GitCli {
    work_dir: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Run a command in the working directory.
    ///
    /// Returns trimmed stdout on success and `None` when the command ran but
    /// exited non-zero. Only failures to run the command at all are errors.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Option<String>, GitError> {
        let command_line = format!("{} {}", program, args.join(" "));
        let started = Instant::now();

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(&self.work_dir)
            .env_remove("GIT_DIR")
            .env_remove("GIT_WORK_TREE")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) if e.kind() == io::ErrorKind::NotFound => {
                return Err(GitError::CommandNotFound(program.to_string()));
            }
            Ok(Err(source)) => {
                return Err(GitError::Io {
                    command: command_line,
                    source,
                });
            }
            Err(_) => {
                warn!(command = %command_line, "command timed out");
                return Err(GitError::Timeout {
                    command: command_line,
                    secs: self.timeout.as_secs(),
                });
            }
        };

        debug!(
            command = %command_line,
            status = ?output.status.code(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "ran command"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                return Err(GitError::NotGitRepository);
            }
            return Ok(None);
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| GitError::InvalidUtf8(command_line))?;
        Ok(Some(stdout.trim().to_string()))
    }

    async fn git(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        self.run("git", args).await
    }

    /// Like [`Self::git`], but an empty stdout also counts as "nothing".
    async fn git_non_empty(&self, args: &[&str]) -> Result<Option<String>, GitError> {
        Ok(self.git(args).await?.filter(|out| !out.is_empty()))
    }
}

impl VcsGateway for GitCli {
    async fn repository_root(&self) -> Result<PathBuf, GitError> {
        self.git_non_empty(&["rev-parse", "--show-toplevel"])
            .await?
            .map(PathBuf::from)
            .ok_or(GitError::NotGitRepository)
    }

    async fn default_remote(&self) -> Result<Option<String>, GitError> {
        self.git_non_empty(&["config", "--get", "remote.pushDefault"]).await
    }

    async fn remote_url(&self, remote: &str) -> Result<Option<String>, GitError> {
        self.git_non_empty(&["remote", "get-url", remote]).await
    }

    async fn resolve_ssh_host(&self, alias: &str) -> Result<Option<String>, GitError> {
        let config = self.run("ssh", &["-G", alias]).await?;
        Ok(config.as_deref().and_then(parse_ssh_hostname))
    }

    async fn current_branch(&self) -> Result<Option<String>, GitError> {
        self.git_non_empty(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn current_commit(&self) -> Result<Option<String>, GitError> {
        self.git_non_empty(&["rev-parse", "HEAD"]).await
    }

    async fn has_remote_tracking_branch(
        &self,
        remote: &str,
        branch: &str,
    ) -> Result<bool, GitError> {
        let tracking = format!("{}/{}", remote, branch);
        let listing = self.git(&["branch", "-r", "--list", &tracking]).await?;
        Ok(listing.is_some_and(|out| out.lines().any(|line| line.trim() == tracking)))
    }

    async fn remote_has_branch(&self, remote: &str, branch: &str) -> Result<bool, GitError> {
        let head_ref = format!("refs/heads/{}", branch);
        let listing = self.git(&["ls-remote", "--heads", remote, &head_ref]).await?;
        Ok(listing.is_some_and(|out| {
            out.lines()
                .filter_map(|line| line.split_whitespace().nth(1))
                .any(|name| name == head_ref)
        }))
    }

    async fn commit_in_history(&self, commit: &str) -> Result<bool, GitError> {
        // Exits 0 only when the commit is an ancestor of (or equal to) HEAD
        let found = self
            .git(&["merge-base", "--is-ancestor", commit, "HEAD"])
            .await?;
        Ok(found.is_some())
    }

    async fn commit_on_remote_tracking(&self, commit: &str) -> Result<bool, GitError> {
        let listing = self.git_non_empty(&["branch", "-r", "--contains", commit]).await?;
        Ok(listing.is_some())
    }

    async fn default_branch(&self, remote: &str) -> Result<Option<String>, GitError> {
        let head = format!("refs/remotes/{}/HEAD", remote);
        if let Some(short) = self.git_non_empty(&["symbolic-ref", "--short", &head]).await? {
            let prefix = format!("{}/", remote);
            let branch = short.strip_prefix(&prefix).unwrap_or(&short);
            return Ok(Some(branch.to_string()));
        }

        // No local remote HEAD (common after `git remote add`); ask the remote
        let listing = self.git(&["ls-remote", "--symref", remote, "HEAD"]).await?;
        Ok(listing.as_deref().and_then(parse_symref_head))
    }
}

/// Extract `hostname` from `ssh -G` output.
fn parse_ssh_hostname(config: &str) -> Option<String> {
    config
        .lines()
        .filter_map(|line| line.split_once(' '))
        .find(|(key, _)| key.eq_ignore_ascii_case("hostname"))
        .map(|(_, value)| value.trim().to_string())
        .filter(|host| !host.is_empty())
}

/// Extract the branch from `git ls-remote --symref <remote> HEAD` output,
/// e.g. `ref: refs/heads/main\tHEAD`.
fn parse_symref_head(listing: &str) -> Option<String> {
    listing
        .lines()
        .filter_map(|line| line.strip_prefix("ref:"))
        .filter_map(|rest| rest.split_whitespace().next())
        .find_map(|target| target.strip_prefix("refs/heads/"))
        .map(str::to_string)
}
