//! Git remote URL parsing.
//!
//! Recognized forms, tried in this order:
//! - HTTP(S): `https://github.com/org/repo.git`
//! - Explicit SSH: `ssh://git@github.com/org/group/repo.git`
//! - SCP-like shorthand: `git@github.com:org/repo.git`, `git@work:org/repo`

pub mod parser;

pub use parser::{parse_remote_url, ParseError, Protocol, RemoteDescriptor};
