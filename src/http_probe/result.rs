use crate::config::hosts::Protocol;

/// Why a probe produced no usable response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The target could not be turned into a URL; nothing was sent.
    InvalidUrl,
    Timeout,
    /// DNS resolution, refused connection, TLS handshake or proxy tunnel failure.
    Connect,
    /// Any other failure while sending or receiving.
    Request,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Status(u16),
    Transport(TransportError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reachable(u16),
    Unreachable(Failure),
}

impl Outcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, Outcome::Reachable(_))
    }

    /// The code shown in the report. Transport failures have no status and show `000`.
    pub fn code(&self) -> String {
        match self {
            Outcome::Reachable(code) | Outcome::Unreachable(Failure::Status(code)) => {
                format!("{code:03}")
            }
            Outcome::Unreachable(Failure::Transport(_)) => "000".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub protocol: Protocol,
    pub host: String,
    pub outcome: Outcome,
}
