use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::progress::Progress;

/// Default bound on followed redirects.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Configuration for a download.
///
/// ```
/// use linterhub_fetch::FetchOptions;
/// use std::time::Duration;
///
/// let options = FetchOptions::default()
///     .max_redirects(5)
///     .timeout(Some(Duration::from_secs(300)));
/// ```
#[derive(Clone)]
pub struct FetchOptions {
    /// Redirect hops followed before giving up.
    ///
    /// Default: 10
    pub max_redirects: usize,

    /// Overall deadline for the whole request chain and body transfer.
    ///
    /// Default: None
    pub timeout: Option<Duration>,

    /// Progress callback.
    ///
    /// Invoked when the integer percentage changes, or on every chunk when
    /// the response carries no usable `content-length`.
    ///
    /// Default: None
    pub on_progress: Option<Arc<dyn Fn(&Progress) + Send + Sync>>,
}

impl fmt::Debug for FetchOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchOptions")
            .field("max_redirects", &self.max_redirects)
            .field("timeout", &self.timeout)
            .field("on_progress", &self.on_progress.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_redirects: DEFAULT_MAX_REDIRECTS,
            timeout:       None,
            on_progress:   None,
        }
    }
}

impl FetchOptions {
    #[must_use]
    pub fn max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn on_progress(mut self, callback: Arc<dyn Fn(&Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }
}
