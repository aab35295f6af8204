use std::borrow::Cow;
use std::ffi::OsStr;

/// Percent-encode a single path segment or revision name.
///
/// Only the RFC 3986 unreserved set (`A-Za-z0-9_.~-`) passes through.
/// Every other byte, including each byte of a multi-byte UTF-8 sequence,
/// becomes an uppercase `%XX` triple. A `/` inside the input is encoded too,
/// so `feature/login` becomes `feature%2Flogin`.
pub fn encode_component(input: &str) -> Cow<'_, str> {
    urlencoding::encode(input)
}

/// Percent-encode raw bytes, e.g. a file name that is not valid UTF-8.
pub fn encode_bytes(input: &[u8]) -> Cow<'_, str> {
    urlencoding::encode_binary(input)
}

/// Percent-encode one file-system path segment from its underlying bytes.
///
/// On Unix the bytes are taken as is, so names that aren't valid UTF-8 keep
/// their real bytes in the URL.
pub fn encode_os_segment(segment: &OsStr) -> String {
    #[cfg(unix)]
    {
        use std::os::unix::ffi::OsStrExt;
        encode_bytes(segment.as_bytes()).into_owned()
    }
    #[cfg(not(unix))]
    {
        encode_component(&segment.to_string_lossy()).into_owned()
    }
}

/// Percent-encode a `/`-separated path, segment by segment.
///
/// The separators themselves are kept, so a leading `/` survives:
/// `/src/a b.ts` becomes `/src/a%20b.ts`.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(encode_component)
        .collect::<Vec<_>>()
        .join("/")
}
