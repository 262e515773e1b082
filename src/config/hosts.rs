use serde::Deserialize;

use crate::error::CheckError;

/// The scheme a protocol pass probes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Http,
    Https,
}

impl Protocol {
    /// Pass order for a run: the HTTP pass always completes before HTTPS starts.
    pub const ALL: [Protocol; 2] = [Protocol::Http, Protocol::Https];

    pub fn scheme(self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn banner(self) -> &'static str {
        match self {
            Protocol::Http => "HTTP",
            Protocol::Https => "HTTPS",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

const HTTP_HOSTS: &[&str] = &[
    "archive.ubuntu.com",
    "security.ubuntu.com",
    "ports.ubuntu.com",
    "ppa.launchpad.net",
    "ppa.launchpadcontent.net",
    "keyserver.ubuntu.com",
    "cloud-images.ubuntu.com",
    "images.maas.io",
];

const HTTPS_HOSTS: &[&str] = &[
    "archive.ubuntu.com",
    "security.ubuntu.com",
    "images.maas.io",
    "api.snapcraft.io",
    "dashboard.snapcraft.io",
    "storage.snapcraftcontent.com",
    "launchpad.net",
    "ppa.launchpadcontent.net",
    "keyserver.ubuntu.com",
    "cloud-images.ubuntu.com",
    "entropy.ubuntu.com",
    "esm.ubuntu.com",
    "contracts.canonical.com",
    "landscape.canonical.com",
    "https://login.ubuntu.com",
];

/// Ordered host lists, one per protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostRegistry {
    http: Vec<String>,
    https: Vec<String>,
}

impl HostRegistry {
    pub fn new(http: Vec<String>, https: Vec<String>) -> Self {
        Self { http, https }
    }

    pub fn hosts(&self, protocol: Protocol) -> &[String] {
        match protocol {
            Protocol::Http => &self.http,
            Protocol::Https => &self.https,
        }
    }

    /// Replace the built-in lists with the ones present in a YAML host file.
    ///
    /// A protocol key missing from the file keeps its built-in list.
    pub fn from_yaml(yaml: &str) -> Result<Self, CheckError> {
        let file: HostFile = serde_yaml::from_str(yaml)?;
        let defaults = Self::default();

        let http = file.http.unwrap_or(defaults.http);
        let https = file.https.unwrap_or(defaults.https);

        validate_hosts(Protocol::Http, &http)?;
        validate_hosts(Protocol::Https, &https)?;

        Ok(Self { http, https })
    }
}

impl Default for HostRegistry {
    fn default() -> Self {
        let owned = |hosts: &[&str]| hosts.iter().map(|h| h.to_string()).collect();
        Self {
            http: owned(HTTP_HOSTS),
            https: owned(HTTPS_HOSTS),
        }
    }
}

/// On-disk shape of a host override file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct HostFile {
    http: Option<Vec<String>>,
    https: Option<Vec<String>>,
}

fn validate_hosts(protocol: Protocol, hosts: &[String]) -> Result<(), CheckError> {
    if hosts.iter().any(|h| h.trim().is_empty()) {
        return Err(CheckError::EmptyHost(protocol.scheme()));
    }
    Ok(())
}
