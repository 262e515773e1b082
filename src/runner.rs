use std::io;

use futures::stream::{self, StreamExt};

use crate::config::hosts::{HostRegistry, Protocol};
use crate::http_probe::prelude::*;
use crate::reporter::Reporter;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reachable: usize,
    pub unreachable: usize,
}

/// Run the HTTP pass, then the HTTPS pass, reporting every host in list order.
///
/// At most `concurrency` probes of a pass are in flight; results are still
/// handed to the reporter in host order, so output matches a sequential run.
pub async fn run_checks<P, R>(
    prober: &P,
    registry: &HostRegistry,
    reporter: &mut R,
    concurrency: usize,
) -> io::Result<RunSummary>
where
    P: Prober + ?Sized,
    R: Reporter + ?Sized,
{
    let mut summary = RunSummary::default();

    for protocol in Protocol::ALL {
        reporter.section(protocol)?;

        let mut results = stream::iter(registry.hosts(protocol))
            .map(|host| prober.probe(protocol, host))
            .buffered(concurrency.max(1));

        while let Some(result) = results.next().await {
            if result.outcome.is_reachable() {
                summary.reachable += 1;
            } else {
                summary.unreachable += 1;
            }
            reporter.record(&result)?;
        }
    }

    log::info!(
        "{} reachable, {} unreachable",
        summary.reachable,
        summary.unreachable
    );
    Ok(summary)
}
