use thiserror::Error;

/// Failures of the external tools themselves.
///
/// A query that runs fine but finds nothing (missing ref, unknown remote,
/// empty listing) is not an error; the gateway reports it as `None`/`false`.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Not a git repository")]
    NotGitRepository,
    #[error("'{0}' was not found on PATH")]
    CommandNotFound(String),
    #[error("'{command}' did not finish within {secs}s")]
    Timeout { command: String, secs: u64 },
    #[error("Failed to execute '{command}': {source}")]
    Io {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{0}' output was not valid UTF-8")]
    InvalidUtf8(String),
}
