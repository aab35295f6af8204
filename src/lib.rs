//! Open the web page of a git working copy's remote: the repository tree, a
//! file, or a line range, at the branch or commit that best matches what
//! exists on the remote.

pub mod browser;
pub mod config;
pub mod git;
pub mod link;
pub mod logging;
pub mod output;
pub mod remote;
pub mod revision;
pub mod url;
