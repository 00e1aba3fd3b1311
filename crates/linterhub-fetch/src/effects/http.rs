use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;
use url::Url;

use crate::proxy::ProxyConfig;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// One GET request, with the proxy already resolved for its URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url:        Url,
    pub proxy:      Option<ProxyConfig>,
    pub strict_ssl: bool,
}

/// Response head plus the streaming body.
pub struct HttpResponse<E> {
    pub status:         u16,
    pub location:       Option<String>,
    pub content_length: Option<u64>,
    pub body:           BoxStream<'static, Result<Bytes, E>>,
}

impl<E> std::fmt::Debug for HttpResponse<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpResponse")
            .field("status", &self.status)
            .field("location", &self.location)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations must not follow redirects themselves; the [`Fetcher`]
/// does that so every hop gets its own proxy resolution and the hop limit
/// applies.
///
/// [`Fetcher`]: super::Fetcher
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn get(
        &self,
        request: &HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse<Self::Error>, Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_client {
    use reqwest::header::LOCATION;
    use reqwest::redirect::Policy;
    use reqwest::{Client, Proxy};

    use super::*;

    /// Production [`HttpClient`] backed by `reqwest`.
    ///
    /// A client is built per request because proxy and certificate settings
    /// may differ between redirect hops.
    #[derive(Debug, Clone, Default)]
    pub struct ReqwestClient {
        user_agent: Option<String>,
    }

    impl ReqwestClient {
        pub fn new() -> Self { Self::default() }

        pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
            self.user_agent = Some(user_agent.into());
            self
        }

        pub fn user_agent(&self) -> Option<&str> { self.user_agent.as_deref() }

        fn build(&self, request: &HttpRequest) -> reqwest::Result<Client> {
            let mut builder = Client::builder()
                .redirect(Policy::none())
                .danger_accept_invalid_certs(!request.strict_ssl);

            if let Some(agent) = &self.user_agent {
                builder = builder.user_agent(agent.clone());
            }

            builder = match &request.proxy {
                Some(config) => {
                    let mut proxy = Proxy::all(config.url())?;
                    if let Some((user, pass)) = &config.auth {
                        proxy = proxy.basic_auth(user, pass);
                    }
                    builder.proxy(proxy)
                }
                None => builder.no_proxy(),
            };

            builder.build()
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = reqwest::Error;

        async fn get(&self, request: &HttpRequest) -> Result<HttpResponse<Self::Error>, Self::Error> {
            let client = self.build(request)?;
            let response = client.get(request.url.clone()).send().await?;

            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            Ok(HttpResponse {
                status: response.status().as_u16(),
                location,
                content_length: response.content_length(),
                body: Box::pin(response.bytes_stream()),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_client::ReqwestClient;
