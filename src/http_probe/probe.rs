use reqwest::{Client, Proxy, redirect::Policy};
use url::Url;

use super::error_chain;
use super::prelude::*;
use crate::config::app_config::ProbeSettings;
use crate::config::hosts::Protocol;
use crate::config::proxy::ProxyConfig;
use crate::error::CheckError;

const USER_AGENT: &str = concat!("reachcheck/", env!("CARGO_PKG_VERSION"));

/// Issues one reachability check per call. Failures are returned as data.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, protocol: Protocol, host: &str) -> ProbeResult;
}

/// Build the URL a host is probed at.
///
/// Hosts that already carry a scheme are used as-is.
pub fn target_url(protocol: Protocol, host: &str) -> String {
    if host.contains("://") {
        if !host.starts_with(&format!("{}://", protocol.scheme())) {
            log::debug!("{host} keeps its own scheme in the {protocol} pass");
        }
        host.to_string()
    } else {
        format!("{}://{}", protocol.scheme(), host)
    }
}

/// Any 2xx, 3xx or 4xx status proves the network path is open.
pub fn classify_status(code: u16) -> Outcome {
    match code {
        200..=499 => Outcome::Reachable(code),
        _ => Outcome::Unreachable(Failure::Status(code)),
    }
}

fn classify_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connect
    } else if err.is_builder() {
        TransportError::InvalidUrl
    } else {
        TransportError::Request
    }
}

/// Reachability prober backed by a single shared `reqwest::Client`.
pub struct HttpProber {
    client: Client,
}

impl HttpProber {
    /// Build the client once for the whole run.
    ///
    /// The proxy, when given, is applied to both schemes. Without one, proxy
    /// variables from the environment are ignored.
    pub fn new(settings: &ProbeSettings, proxy: Option<&ProxyConfig>) -> Result<Self, CheckError> {
        let builder = Client::builder()
            .use_rustls_tls()
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(true)
            .redirect(Policy::none())
            .user_agent(USER_AGENT);

        let builder = match proxy {
            Some(proxy) => {
                log::info!("Routing all probes through proxy {proxy}");
                builder.proxy(Proxy::all(proxy.url().as_str())?)
            }
            None => builder.no_proxy(),
        };

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait::async_trait]
impl Prober for HttpProber {
    async fn probe(&self, protocol: Protocol, host: &str) -> ProbeResult {
        let target = target_url(protocol, host);

        let outcome = match Url::parse(&target) {
            Ok(url) => match self.client.head(url).send().await {
                Ok(resp) => classify_status(resp.status().as_u16()),
                Err(err) => {
                    log::debug!("{protocol}: {host} failed: {}", error_chain(&err));
                    Outcome::Unreachable(Failure::Transport(classify_error(&err)))
                }
            },
            Err(err) => {
                log::debug!("{protocol}: {host} is not a valid target {target:?}: {err}");
                Outcome::Unreachable(Failure::Transport(TransportError::InvalidUrl))
            }
        };

        ProbeResult {
            protocol,
            host: host.to_string(),
            outcome,
        }
    }
}
