//! I/O operations for downloading.

mod fetcher;
mod http;

pub use fetcher::Fetcher;
pub use http::{BoxStream, HttpClient, HttpRequest, HttpResponse};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
