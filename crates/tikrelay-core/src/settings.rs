//! Relay pipeline settings.
//!
//! Passed explicitly into the resolver and media source constructors; there
//! is no process-wide mutable state.

use std::time::Duration;

/// Default tikwm resolution endpoint.
pub const DEFAULT_RESOLVER_ENDPOINT: &str = "https://www.tikwm.com/api/";

/// Default number of calls made to the resolution API per request.
pub const DEFAULT_MAX_RETRIES: u8 = 3;

/// Default timeout applied to each outbound call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Filename offered to the caller in `Content-Disposition`.
pub const DEFAULT_DOWNLOAD_FILENAME: &str = "tiktok-video.mp4";

/// Settings shared by the resolver and the stream relay.
///
/// # Example
///
/// ```
/// use tikrelay_core::RelaySettings;
/// use std::time::Duration;
///
/// let settings = RelaySettings::new()
///     .with_request_timeout(Duration::from_secs(5))
///     .with_max_retries(2);
/// assert_eq!(settings.max_retries(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    resolver_endpoint: String,
    max_retries: u8,
    request_timeout: Duration,
    download_filename: String,
    user_agent: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            resolver_endpoint: DEFAULT_RESOLVER_ENDPOINT.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            download_filename: DEFAULT_DOWNLOAD_FILENAME.to_string(),
            user_agent: concat!("tikrelay/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl RelaySettings {
    /// Create settings with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the resolution API endpoint.
    #[must_use]
    pub fn with_resolver_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.resolver_endpoint = endpoint.into();
        self
    }

    /// Set the number of resolution attempts. Clamped to at least one.
    #[must_use]
    pub fn with_max_retries(mut self, retries: u8) -> Self {
        self.max_retries = retries.max(1);
        self
    }

    /// Set the timeout applied to each outbound call.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the filename offered in `Content-Disposition`.
    #[must_use]
    pub fn with_download_filename(mut self, filename: impl Into<String>) -> Self {
        self.download_filename = filename.into();
        self
    }

    /// Set the user agent sent to upstream hosts.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn resolver_endpoint(&self) -> &str {
        &self.resolver_endpoint
    }

    pub const fn max_retries(&self) -> u8 {
        self.max_retries
    }

    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn download_filename(&self) -> &str {
        &self.download_filename
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// `Content-Disposition` value forcing a download.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.download_filename)
    }
}
