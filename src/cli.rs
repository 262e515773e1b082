use std::ffi::OsString;
use std::io::Write;

use clap::{CommandFactory, Parser};

use crate::config::app_config::{AppConfig, ProbeSettings};
use crate::config::proxy::ProxyConfig;
use crate::error::CheckError;
use crate::http_probe::prelude::*;
use crate::reporter::Reporter;
use crate::runner::run_checks;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_UNREACHABLE: u8 = 2;

const AFTER_HELP: &str = "\
Pass -h or --help as the first argument to print this help.

Checks every configured host over http:// and then https:// and prints one line per host.
Any 2xx, 3xx or 4xx answer counts as reachable.

Environment:
  CONFIG_FILE            YAML file with `http:` and/or `https:` host lists
  PROBE_TIMEOUT_SECONDS  per-request timeout (default 5)
  PROBE_CONCURRENCY      probes in flight per pass (default 1)
  FAIL_ON_UNREACHABLE    exit with status 2 if any host is unreachable (default false)
  RUST_LOG               log filter for diagnostics on stderr (default warn)";

/// Only the first argument carries meaning. Help is recognised by [`parse_command`]
/// so that a help flag in any later position is ignored like every other extra word.
#[derive(Parser, Debug)]
#[command(name = "reachcheck")]
#[command(about = "Pre-flight connectivity check for package repositories and service endpoints")]
#[command(after_help = AFTER_HELP)]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Cli {
    /// Forward proxy used for every request, e.g. http://proxy.example:3128
    #[arg(value_name = "PROXY_URL", allow_hyphen_values = true)]
    pub proxy: Option<String>,

    #[arg(hide = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
    pub ignored: Vec<String>,
}

/// What a single invocation does.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the contained text and exit successfully.
    ShowHelp(String),
    RunChecks { proxy: Option<ProxyConfig> },
}

/// Parse the arguments (program name first) into a [`Command`].
///
/// `-h`/`--help` as the first argument is help; any other non-empty first argument
/// must be a proxy URL. The value is validated here, before any request goes out.
pub fn parse_command<I, T>(args: I) -> Result<Command, CheckError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    let first = args.get(1).map(|arg| arg.to_string_lossy().into_owned());

    if matches!(first.as_deref(), Some("-h" | "--help")) {
        return Ok(Command::ShowHelp(help_text()));
    }

    let cli = Cli::try_parse_from(args.iter().cloned()).map_err(|err| {
        log::debug!("Argument parsing failed: {err}");
        CheckError::InvalidArgument(first.clone().unwrap_or_default())
    })?;
    if !cli.ignored.is_empty() {
        log::warn!("Ignoring extra arguments: {:?}", cli.ignored);
    }

    // The parser swallows a bare `--`; the raw first argument is what gets validated.
    Ok(Command::RunChecks {
        proxy: ProxyConfig::from_arg(first.as_deref())?,
    })
}

pub fn help_text() -> String {
    Cli::command().render_help().to_string()
}

/// Run one invocation end to end and return its exit status.
///
/// Help and argument errors are written to `out`; nothing is loaded or probed for
/// them. `build_prober` is only called once the arguments and configuration are valid.
pub async fn dispatch<I, T, L, B, P, R, W>(
    args: I,
    load: L,
    build_prober: B,
    reporter: &mut R,
    out: &mut W,
) -> u8
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
    L: FnOnce() -> Result<AppConfig, CheckError>,
    B: FnOnce(&ProbeSettings, Option<&ProxyConfig>) -> Result<P, CheckError>,
    P: Prober,
    R: Reporter + ?Sized,
    W: Write + ?Sized,
{
    let proxy = match parse_command(args) {
        Ok(Command::ShowHelp(text)) => {
            return match writeln!(out, "{text}") {
                Ok(()) => EXIT_SUCCESS,
                Err(_) => EXIT_FAILURE,
            };
        }
        Ok(Command::RunChecks { proxy }) => proxy,
        Err(e) => {
            let _ = writeln!(out, "{e}\n\n{}", help_text());
            return EXIT_FAILURE;
        }
    };

    let config = match load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return EXIT_FAILURE;
        }
    };

    let prober = match build_prober(&config.probe, proxy.as_ref()) {
        Ok(prober) => prober,
        Err(e) => {
            eprintln!("{e}");
            return EXIT_FAILURE;
        }
    };

    match run_checks(&prober, &config.registry, reporter, config.concurrency).await {
        Ok(summary) if config.fail_on_unreachable && summary.unreachable > 0 => EXIT_UNREACHABLE,
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            eprintln!("{}", CheckError::Output(e));
            EXIT_FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::hosts::{HostRegistry, Protocol};
    use crate::reporter::tests::RecordingReporter;
    use crate::runner::tests::ScriptedProber;

    fn invalid_argument(args: &[&str]) -> String {
        match parse_command(args.iter().copied()) {
            Err(CheckError::InvalidArgument(arg)) => arg,
            other => panic!("expected InvalidArgument for {args:?}, got {other:?}"),
        }
    }

    fn test_config(fail_on_unreachable: bool) -> AppConfig {
        AppConfig {
            registry: HostRegistry::new(
                vec!["archive.ubuntu.com".into()],
                vec!["images.maas.io".into(), "https://login.ubuntu.com".into()],
            ),
            probe: ProbeSettings::default(),
            concurrency: 1,
            fail_on_unreachable,
        }
    }

    #[test]
    fn test_no_argument_runs_without_proxy() {
        assert_eq!(
            parse_command(["reachcheck"]).unwrap(),
            Command::RunChecks { proxy: None }
        );
        assert_eq!(
            parse_command(["reachcheck", ""]).unwrap(),
            Command::RunChecks { proxy: None }
        );
    }

    #[test]
    fn test_proxy_argument() {
        let command = parse_command(["reachcheck", "http://proxy.example:3128"]).unwrap();
        let Command::RunChecks { proxy: Some(proxy) } = command else {
            panic!("expected a proxied run, got {command:?}");
        };
        assert_eq!(proxy.url().as_str(), "http://proxy.example:3128/");
    }

    #[test]
    fn test_extra_arguments_after_proxy_are_ignored() {
        let command = parse_command(["reachcheck", "http://proxy.example:3128", "extra", "-h"]).unwrap();
        assert!(matches!(command, Command::RunChecks { proxy: Some(_) }));
    }

    #[test]
    fn test_help_flags() {
        for flag in ["-h", "--help"] {
            match parse_command(["reachcheck", flag]).unwrap() {
                Command::ShowHelp(text) => assert!(text.contains("PROXY_URL"), "help was {text}"),
                other => panic!("expected help for {flag}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_invalid_first_arguments() {
        assert_eq!(invalid_argument(&["reachcheck", "not-a-url"]), "not-a-url");
        assert_eq!(invalid_argument(&["reachcheck", "-x"]), "-x");
        assert_eq!(invalid_argument(&["reachcheck", "--proxy"]), "--proxy");
        assert_eq!(invalid_argument(&["reachcheck", "-V"]), "-V");
        assert_eq!(invalid_argument(&["reachcheck", "--version"]), "--version");
        assert_eq!(invalid_argument(&["reachcheck", "--"]), "--");
        assert_eq!(invalid_argument(&["reachcheck", "not-a-url", "-h"]), "not-a-url");
    }

    #[test]
    fn test_help_text_mentions_environment() {
        assert!(help_text().contains("PROBE_TIMEOUT_SECONDS"));
    }

    #[tokio::test]
    async fn test_dispatch_help_never_probes() {
        for flag in ["-h", "--help"] {
            let mut loaded = false;
            let mut built = false;
            let mut reporter = RecordingReporter::default();
            let mut out = Vec::new();

            let code = dispatch(
                ["reachcheck", flag],
                || {
                    loaded = true;
                    Ok(test_config(false))
                },
                |_, _| {
                    built = true;
                    Ok(ScriptedProber::default())
                },
                &mut reporter,
                &mut out,
            )
            .await;

            assert_eq!(code, EXIT_SUCCESS);
            assert!(String::from_utf8_lossy(&out).contains("PROXY_URL"));
            assert!(!loaded && !built, "help must not load config or build a prober");
            assert!(reporter.sections.is_empty() && reporter.lines.is_empty());
        }
    }

    #[tokio::test]
    async fn test_dispatch_invalid_argument_exits_one_without_probing() {
        let mut built = false;
        let mut reporter = RecordingReporter::default();
        let mut out = Vec::new();

        let code = dispatch(
            ["reachcheck", "not-a-url"],
            || Ok(test_config(false)),
            |_, _| {
                built = true;
                Ok(ScriptedProber::default())
            },
            &mut reporter,
            &mut out,
        )
        .await;

        let out = String::from_utf8_lossy(&out);
        assert_eq!(code, EXIT_FAILURE);
        assert!(out.starts_with("Invalid proxy URL: not-a-url\n"), "output was {out}");
        assert!(out.contains(&help_text()));
        assert!(!built);
        assert!(reporter.lines.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_all_unreachable_still_exits_zero() {
        let mut reporter = RecordingReporter::default();
        let mut out = Vec::new();

        let code = dispatch(
            ["reachcheck"],
            || Ok(test_config(false)),
            |_, _| Ok(ScriptedProber::default()),
            &mut reporter,
            &mut out,
        )
        .await;

        assert_eq!(code, EXIT_SUCCESS);
        assert_eq!(reporter.sections, vec![Protocol::Http, Protocol::Https]);
        assert_eq!(reporter.lines.len(), 3);
        assert!(reporter.lines.iter().all(|(_, _, outcome)| !outcome.is_reachable()));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_fail_on_unreachable_exits_two() {
        let mut reporter = RecordingReporter::default();
        let mut out = Vec::new();

        let code = dispatch(
            ["reachcheck"],
            || Ok(test_config(true)),
            |_, _| Ok(ScriptedProber::default()),
            &mut reporter,
            &mut out,
        )
        .await;

        assert_eq!(code, EXIT_UNREACHABLE);
        assert_eq!(reporter.lines.len(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_hands_proxy_to_prober() {
        let mut seen_proxy = None;
        let mut reporter = RecordingReporter::default();
        let mut out = Vec::new();

        let code = dispatch(
            ["reachcheck", "http://proxy.example:3128"],
            || Ok(test_config(false)),
            |_, proxy| {
                seen_proxy = proxy.cloned();
                Ok(ScriptedProber::default())
            },
            &mut reporter,
            &mut out,
        )
        .await;

        assert_eq!(code, EXIT_SUCCESS);
        let proxy = seen_proxy.expect("prober built with a proxy");
        assert_eq!(proxy.url().host_str(), Some("proxy.example"));
        assert_eq!(reporter.lines.len(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_config_error_exits_one() {
        let mut built = false;
        let mut reporter = RecordingReporter::default();
        let mut out = Vec::new();

        let code = dispatch(
            ["reachcheck"],
            || Err(CheckError::EmptyHost("http")),
            |_, _| {
                built = true;
                Ok(ScriptedProber::default())
            },
            &mut reporter,
            &mut out,
        )
        .await;

        assert_eq!(code, EXIT_FAILURE);
        assert!(!built);
        assert!(reporter.lines.is_empty());
    }
}
