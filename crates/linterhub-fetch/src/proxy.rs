//! Proxy resolution.
//!
//! Resolution order is: explicit proxy, then the protocol-matched environment
//! variable, then none. Anything that does not parse as an `http`/`https` URL
//! resolves to no proxy so the caller connects directly.

use std::env;
use std::fmt;

use tracing::debug;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyScheme {
    Http,
    Https,
}

impl fmt::Display for ProxyScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => f.write_str("http"),
            Self::Https => f.write_str("https"),
        }
    }
}

/// Connection parameters for a resolved proxy.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub scheme:     ProxyScheme,
    pub host:       String,
    pub port:       u16,
    pub auth:       Option<(String, String)>,
    pub strict_ssl: bool,
}

impl ProxyConfig {
    /// Proxy URL without credentials.
    pub fn url(&self) -> String { format!("{}://{}:{}", self.scheme, self.host, self.port) }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("auth", &self.auth.as_ref().map(|(user, _)| user))
            .field("strict_ssl", &self.strict_ssl)
            .finish()
    }
}

/// Snapshot of the proxy environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxyEnv {
    pub http:  Option<String>,
    pub https: Option<String>,
}

impl ProxyEnv {
    /// Read `HTTP_PROXY`/`HTTPS_PROXY` from the process, upper case first.
    pub fn from_process() -> Self {
        Self {
            http:  lookup(&["HTTP_PROXY", "http_proxy"]),
            https: lookup(&["HTTPS_PROXY", "https_proxy"]),
        }
    }

    /// Environment proxy matching the target's protocol. HTTPS targets fall
    /// back to the HTTP variable.
    pub fn for_target(&self, target: &Url) -> Option<&str> {
        match target.scheme() {
            "https" => self.https.as_deref().or(self.http.as_deref()),
            "http" => self.http.as_deref(),
            _ => None,
        }
    }
}

fn lookup(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Everything needed to pick a proxy for any URL met during a download,
/// including redirect targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxySettings {
    pub explicit:   Option<String>,
    pub strict_ssl: bool,
    pub env:        ProxyEnv,
}

impl Default for ProxySettings {
    fn default() -> Self {
        Self {
            explicit:   None,
            strict_ssl: true,
            env:        ProxyEnv::default(),
        }
    }
}

impl ProxySettings {
    pub fn new(explicit: Option<String>, strict_ssl: bool, env: ProxyEnv) -> Self {
        Self {
            explicit: explicit.filter(|p| !p.trim().is_empty()),
            strict_ssl,
            env,
        }
    }

    pub fn resolve_for(&self, target: &Url) -> Option<ProxyConfig> {
        resolve(target, self.explicit.as_deref(), self.strict_ssl, &self.env)
    }
}

/// Compute the proxy for `target`.
pub fn resolve(
    target: &Url,
    explicit: Option<&str>,
    strict_ssl: bool,
    env: &ProxyEnv,
) -> Option<ProxyConfig> {
    let raw = explicit
        .filter(|p| !p.trim().is_empty())
        .or_else(|| env.for_target(target))?;

    let parsed = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(e) => {
            debug!(proxy = raw, error = %e, "ignoring unparsable proxy");
            return None;
        }
    };

    let scheme = match parsed.scheme() {
        "http" => ProxyScheme::Http,
        "https" => ProxyScheme::Https,
        other => {
            debug!(proxy = raw, scheme = other, "ignoring proxy with unsupported scheme");
            return None;
        }
    };

    let host = parsed.host_str()?.to_string();
    let port = parsed.port_or_known_default()?;
    let auth = (!parsed.username().is_empty()).then(|| {
        (
            parsed.username().to_string(),
            parsed.password().unwrap_or_default().to_string(),
        )
    });

    Some(ProxyConfig {
        scheme,
        host,
        port,
        auth,
        strict_ssl,
    })
}
