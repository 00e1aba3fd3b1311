//! HTTP downloading through an optional proxy with redirect following and
//! progress reporting.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and progress types
//! - [`core`] - Pure transformations
//! - [`effects`] - I/O operations behind the [`HttpClient`] trait
//!
//! Proxy resolution lives in [`proxy`] and reads the process environment only
//! through an explicit [`ProxyEnv`] snapshot.

pub mod core;
pub mod data;
pub mod effects;
mod error;
pub mod proxy;

pub use core::{is_redirect, request_options};
pub use data::options::DEFAULT_MAX_REDIRECTS;
pub use data::{FetchOptions, Progress, ProgressTracker};
pub use effects::{BoxStream, Fetcher, HttpClient, HttpRequest, HttpResponse};
pub use error::{DownloadError, Result};
pub use proxy::{ProxyConfig, ProxyEnv, ProxyScheme, ProxySettings};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;
