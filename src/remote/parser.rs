use std::fmt;
use thiserror::Error;

/// Transport a remote URL was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Ssh,
}

/// A parsed remote URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub protocol: Protocol,
    /// Host as written in the URL. For SSH remotes this may be an alias
    /// from the user's SSH config.
    pub host: String,
    /// Everything between the host and the repository name, e.g. `org/group`.
    /// Never starts or ends with `/`.
    pub owner_path: String,
    /// Final path segment, without a trailing `.git`
    pub repo_name: String,
}

impl fmt::Display for RemoteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.host, self.owner_path, self.repo_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized remote URL '{0}'")]
pub struct ParseError(pub String);

/// Splits a raw URL into `(host, path)` when it matches one syntax.
type Attempt = fn(&str) -> Option<(&str, &str)>;

/// Syntaxes in priority order. The first attempt that matches wins, even if
/// its path turns out to be unusable.
const ATTEMPTS: [(Protocol, Attempt); 3] = [
    (Protocol::Http, split_http),
    (Protocol::Ssh, split_ssh_scheme),
    (Protocol::Ssh, split_scp_like),
];

/// Parse a raw remote URL as printed by `git remote get-url`.
///
/// Surrounding whitespace is ignored. The owner path is matched greedily so
/// nested groups stay together and the last segment is always the repo name.
/// No percent-decoding happens; only a literal `.git` suffix is dropped.
///
/// An empty string means "no remote"; callers are expected to check for
/// that before calling and will get a `ParseError` here if they don't.
pub fn parse_remote_url(raw: &str) -> Result<RemoteDescriptor, ParseError> {
    let url = raw.trim();

    for (protocol, attempt) in ATTEMPTS {
        if let Some((host, path)) = attempt(url) {
            return split_owner_and_repo(protocol, host, path)
                .ok_or_else(|| ParseError(url.to_string()));
        }
    }

    Err(ParseError(url.to_string()))
}

/// `http(s)://[userinfo@]<host>/<path>`
fn split_http(url: &str) -> Option<(&str, &str)> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))?;
    let (authority, path) = rest.split_once('/')?;
    // Credentials embedded in clone URLs must not leak into web links
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    Some((host, path))
}

/// `ssh://[<user>@]<host>[:<port>]/<path>`
fn split_ssh_scheme(url: &str) -> Option<(&str, &str)> {
    let rest = url.strip_prefix("ssh://")?;
    let (authority, path) = rest.split_once('/')?;
    let host = authority.rsplit_once('@').map_or(authority, |(_, h)| h);
    // The port is the SSH port, meaningless for the web UI
    let host = host.split_once(':').map_or(host, |(h, _)| h);
    Some((host, path))
}

/// `<user>@<host>:<path>`
fn split_scp_like(url: &str) -> Option<(&str, &str)> {
    let (login, path) = url.split_once(':')?;
    let (user, host) = login.split_once('@')?;
    if user.is_empty() || login.contains('/') {
        return None;
    }
    Some((host, path))
}

fn split_owner_and_repo(protocol: Protocol, host: &str, path: &str) -> Option<RemoteDescriptor> {
    if host.is_empty() || host.chars().any(char::is_whitespace) {
        return None;
    }

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repo) = path.rsplit_once('/')?;
    let owner = owner.trim_matches('/');

    if owner.is_empty() || repo.is_empty() || path.chars().any(char::is_whitespace) {
        return None;
    }

    Some(RemoteDescriptor {
        protocol,
        host: host.to_string(),
        owner_path: owner.to_string(),
        repo_name: repo.to_string(),
    })
}
