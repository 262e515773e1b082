use url::Url;

use crate::error::CheckError;

/// A forward proxy used for both the HTTP and the HTTPS pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    url: Url,
}

impl ProxyConfig {
    /// Interpret the optional command line argument.
    ///
    /// Absent or empty means no proxy. Anything else must start with `http://` or
    /// `https://` and name a host.
    pub fn from_arg(arg: Option<&str>) -> Result<Option<Self>, CheckError> {
        let raw = match arg {
            None | Some("") => return Ok(None),
            Some(raw) => raw,
        };

        if !(raw.starts_with("http://") || raw.starts_with("https://")) {
            return Err(CheckError::InvalidArgument(raw.to_string()));
        }

        let url = Url::parse(raw).map_err(|_| CheckError::InvalidArgument(raw.to_string()))?;
        if url.host_str().is_none() {
            return Err(CheckError::InvalidArgument(raw.to_string()));
        }

        Ok(Some(Self { url }))
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
