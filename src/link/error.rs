use crate::git::GitError;
use crate::remote::ParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a link could not be built. None of these are fatal; the caller reports
/// them and does nothing else.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("No URL configured for remote '{remote}'")]
    NoRemoteConfigured { remote: String },
    #[error(transparent)]
    UnparseableRemoteUrl(#[from] ParseError),
    #[error("No file to link")]
    NoActiveFile,
    #[error("{} is outside the repository", .path.display())]
    FileOutsideRepository { path: PathBuf },
    #[error(transparent)]
    Git(#[from] GitError),
}
