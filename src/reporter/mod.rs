use std::io::{self, Write};

use ansi_term::Colour;

use crate::config::hosts::Protocol;
use crate::http_probe::result::ProbeResult;

/// Receives the results of a run in report order.
pub trait Reporter {
    /// Called once before the first host of a protocol pass.
    fn section(&mut self, protocol: Protocol) -> io::Result<()>;

    fn record(&mut self, result: &ProbeResult) -> io::Result<()>;
}

/// Colored, human readable report.
pub struct TerminalReporter<W: Write> {
    out: W,
}

impl TerminalReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for TerminalReporter<W> {
    fn section(&mut self, protocol: Protocol) -> io::Result<()> {
        writeln!(self.out, "==== {} ====", protocol.banner())?;
        self.out.flush()
    }

    fn record(&mut self, result: &ProbeResult) -> io::Result<()> {
        let suffix = if result.outcome.is_reachable() {
            Colour::Green.paint(format!("[{}] OK", result.outcome.code()))
        } else {
            Colour::Red.paint(format!("[{}] ERR", result.outcome.code()))
        };

        writeln!(
            self.out,
            "{}: {} - {}",
            result.protocol.scheme(),
            result.host,
            suffix
        )?;
        self.out.flush()
    }
}
