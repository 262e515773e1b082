pub mod probe;
pub mod result;

pub mod prelude {
    pub use super::probe::{HttpProber, Prober, classify_status, target_url};
    pub use super::result::{Failure, Outcome, ProbeResult, TransportError};
}

use std::fmt::Write;

/// Flatten an error and its sources into one log-friendly line.
fn error_chain(mut err: &(dyn std::error::Error + 'static)) -> String {
    let mut chain = err.to_string();
    while let Some(src) = err.source() {
        let _ = write!(chain, ": {src}");
        err = src;
    }
    chain
}
