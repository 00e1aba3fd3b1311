use std::future::Future;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};
use url::Url;

use crate::core::{is_redirect, request_options};
use crate::data::{FetchOptions, Progress, ProgressTracker};
use crate::effects::http::{HttpClient, HttpRequest, HttpResponse};
use crate::error::{DownloadError, Result};
use crate::proxy::ProxySettings;

/// Upper bound on the buffer preallocated from `content-length`.
const CONTENT_CAPACITY_HINT: usize = 64 * 1024;

/// Downloads files and text bodies over HTTP(S).
///
/// Redirects (301/302) are followed sequentially, one request in flight at a
/// time, with the proxy re-resolved for every hop. Nothing is retried.
pub struct Fetcher<C: HttpClient> {
    client:  C,
    options: FetchOptions,
}

impl<C: HttpClient> Fetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            options: FetchOptions::default(),
        }
    }

    pub fn with_options(mut self, options: FetchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &FetchOptions { &self.options }

    /// Stream `url` into `destination`, returning the number of bytes written.
    ///
    /// A failure partway through leaves whatever was written in place.
    pub async fn download(&self, url: &str, destination: &Path, proxy: &ProxySettings) -> Result<u64> {
        self.with_deadline(self.download_inner(url, destination, proxy)).await
    }

    /// GET `url` and return the whole body as UTF-8 text.
    pub async fn download_content(&self, url: &str, proxy: &ProxySettings) -> Result<String> {
        self.with_deadline(self.content_inner(url, proxy)).await
    }

    async fn with_deadline<T>(&self, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match self.options.timeout {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| DownloadError::Timeout)?,
            None => fut.await,
        }
    }

    async fn download_inner(&self, url: &str, destination: &Path, proxy: &ProxySettings) -> Result<u64> {
        let response = self.open(url, proxy).await?;
        let mut tracker = ProgressTracker::new(response.content_length);

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, e))?;
        }
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| io_error(destination, e))?;

        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Transport(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| io_error(destination, e))?;
            if let Some(progress) = tracker.advance(chunk.len() as u64) {
                self.report_progress(&progress);
            }
        }

        file.flush().await.map_err(|e| io_error(destination, e))?;
        info!(path = %destination.display(), bytes = tracker.downloaded(), "download complete");
        Ok(tracker.downloaded())
    }

    async fn content_inner(&self, url: &str, proxy: &ProxySettings) -> Result<String> {
        let response = self.open(url, proxy).await?;
        let hint = response
            .content_length
            .and_then(|len| usize::try_from(len).ok())
            .unwrap_or(0)
            .min(CONTENT_CAPACITY_HINT);
        let mut buf = Vec::with_capacity(hint);

        let mut body = response.body;
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| DownloadError::Transport(e.to_string()))?;
            buf.extend_from_slice(&chunk);
        }

        String::from_utf8(buf).map_err(|_| DownloadError::Decode)
    }

    /// Issue the request chain until a 200 arrives.
    async fn open(&self, url: &str, proxy: &ProxySettings) -> Result<HttpResponse<C::Error>> {
        let mut current = parse_url(url)?;

        for hop in 0..=self.options.max_redirects {
            let (host, path) = request_options(&current);
            let request = HttpRequest {
                proxy: proxy.resolve_for(&current),
                strict_ssl: proxy.strict_ssl,
                url: current.clone(),
            };
            debug!(%host, %path, hop, proxied = request.proxy.is_some(), "sending request");

            let response = self
                .client
                .get(&request)
                .await
                .map_err(|e| DownloadError::Request {
                    url:     current.to_string(),
                    message: e.to_string(),
                })?;

            match response.status {
                200 => return Ok(response),
                status if is_redirect(status) => {
                    let next = response
                        .location
                        .as_deref()
                        .and_then(|loc| current.join(loc).ok())
                        .ok_or_else(|| DownloadError::MissingLocation(current.to_string()))?;
                    debug!(%status, from = %current, to = %next, "following redirect");
                    current = next;
                }
                status => return Err(DownloadError::BadStatus(status)),
            }
        }

        Err(DownloadError::TooManyRedirects(self.options.max_redirects))
    }

    fn report_progress(&self, progress: &Progress) {
        if let Some(ref callback) = self.options.on_progress {
            callback(progress);
        }
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|e| DownloadError::Request {
        url:     url.to_string(),
        message: e.to_string(),
    })
}

fn io_error(path: &Path, source: std::io::Error) -> DownloadError {
    DownloadError::Io {
        path: PathBuf::from(path),
        source,
    }
}
