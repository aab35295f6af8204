use thiserror::Error;

/// Opening a URL failed. Carries the URL so it can be shown for copying.
#[derive(Error, Debug)]
#[error("Failed to open browser for URL: {url}")]
pub struct BrowserError {
    pub url: String,
    #[source]
    pub source: std::io::Error,
}

/// Open a URL in the user's default browser
///
/// # Errors
/// Returns error if browser cannot be opened (e.g., no browser available)
pub fn open_url(url: &str) -> Result<(), BrowserError> {
    webbrowser::open(url).map_err(|source| BrowserError {
        url: url.to_string(),
        source,
    })
}
