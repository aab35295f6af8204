use crate::remote::RemoteDescriptor;

/// Base web URL of a repository: `http://<host>/<owner-path>/<repo>`.
///
/// `web_host` must already be a real hostname. For SSH remotes that means the
/// host after SSH alias resolution, not the alias itself.
pub fn repo_base_url(web_host: &str, remote: &RemoteDescriptor) -> String {
    format!("http://{}/{}/{}", web_host, remote.owner_path, remote.repo_name)
}

/// URL of a file at a revision, optionally anchored to a line or line range.
///
/// `file_path` is expected to be encoded already and to start with `/`.
/// A `line_end` without a `line_start` is ignored.
pub fn build_file_url(
    repo_base_url: &str,
    revision: &str,
    file_path: &str,
    line_start: Option<u32>,
    line_end: Option<u32>,
) -> String {
    let url = format!("{}/blob/{}{}", repo_base_url, revision, file_path);

    match (line_start, line_end) {
        (Some(start), Some(end)) => format!("{}#L{}-L{}", url, start, end),
        (Some(start), None) => format!("{}#L{}", url, start),
        (None, _) => url,
    }
}

/// URL of the repository tree at a revision.
pub fn build_tree_url(repo_base_url: &str, revision: &str) -> String {
    format!("{}/tree/{}", repo_base_url, revision)
}

/// Everything needed to build one file URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRequest {
    pub repo_base_url: String,
    pub revision: String,
    /// Leading `/`, every segment percent-encoded
    pub relative_file_path: Option<String>,
    pub line_start: Option<u32>,
    pub line_end: Option<u32>,
}

impl UrlRequest {
    /// Build the final URL: a file URL when a path is present, otherwise the
    /// tree URL.
    pub fn build(&self) -> String {
        match &self.relative_file_path {
            Some(path) => build_file_url(
                &self.repo_base_url,
                &self.revision,
                path,
                self.line_start,
                self.line_end,
            ),
            None => build_tree_url(&self.repo_base_url, &self.revision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::Protocol;

    const BASE: &str = "http://github.com/acme/widgets";

    #[test]
    fn test_repo_base_url_nested_owner() {
        let remote = RemoteDescriptor {
            protocol: Protocol::Ssh,
            host: "work".to_string(),
            owner_path: "org/group".to_string(),
            repo_name: "widgets".to_string(),
        };
        assert_eq!(
            repo_base_url("gitlab.example.com", &remote),
            "http://gitlab.example.com/org/group/widgets"
        );
    }

    #[test]
    fn test_file_url_without_range() {
        let url = build_file_url(BASE, "main", "/src/lib.rs", None, None);
        assert_eq!(url, "http://github.com/acme/widgets/blob/main/src/lib.rs");
        assert!(!url.contains('#'));
    }

    #[test]
    fn test_file_url_single_line() {
        let url = build_file_url(BASE, "main", "/src/lib.rs", Some(5), None);
        assert!(url.ends_with("/src/lib.rs#L5"));
    }

    #[test]
    fn test_file_url_range_same_line_differs_from_single() {
        let single = build_file_url(BASE, "main", "/src/lib.rs", Some(5), None);
        let range = build_file_url(BASE, "main", "/src/lib.rs", Some(5), Some(5));
        assert!(range.ends_with("#L5-L5"));
        assert_ne!(single, range);
    }

    #[test]
    fn test_file_url_end_without_start_is_ignored() {
        let url = build_file_url(BASE, "main", "/src/lib.rs", None, Some(9));
        assert_eq!(url, "http://github.com/acme/widgets/blob/main/src/lib.rs");
    }

    #[test]
    fn test_tree_url() {
        assert_eq!(
            build_tree_url(BASE, "feature%2Flogin"),
            "http://github.com/acme/widgets/tree/feature%2Flogin"
        );
    }

    #[test]
    fn test_url_request_dispatch() {
        let mut request = UrlRequest {
            repo_base_url: BASE.to_string(),
            revision: "0123abcd".to_string(),
            relative_file_path: Some("/README.md".to_string()),
            line_start: Some(3),
            line_end: Some(8),
        };
        assert_eq!(
            request.build(),
            "http://github.com/acme/widgets/blob/0123abcd/README.md#L3-L8"
        );

        request.relative_file_path = None;
        assert_eq!(request.build(), "http://github.com/acme/widgets/tree/0123abcd");
    }
}
