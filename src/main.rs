use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use tcping::cli::Cli;
use tcping::config::{Mode, OutputFormat, Settings};
use tcping::metrics::ProbeMetrics;
use tcping::output::Renderer;
use tcping::{
    ConfigError, EventSink, ProbeEvent, Prober, Scheduler, Target, TcpConnectProber, cancellation,
};

const EXIT_CLOSED: u8 = 1;
const EXIT_UNKNOWN_HOST: u8 = 2;
const EXIT_USAGE: u8 = 255;

/// Exit status for a problem found before probing starts.
fn config_exit_code(err: &ConfigError) -> u8 {
    if err.is_unknown_host() {
        EXIT_UNKNOWN_HOST
    } else {
        EXIT_USAGE
    }
}

/// Ping style tools end the `^C` line before the summary. JSON lines output
/// must stay one object per line, so it gets nothing.
fn breaks_line_on_interrupt(format: OutputFormat) -> bool {
    format == OutputFormat::Text
}

/// Exit status of the single-shot check.
fn check_exit_code(open: bool) -> u8 {
    if open { 0 } else { EXIT_CLOSED }
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version also land here
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            e.print()?;
            return Ok(ExitCode::from(code));
        }
    };

    let settings = match Settings::load(&cli).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(config_exit_code(&e)));
        }
    };

    // Logs go to stderr, results to stdout
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                format!("tcping={}", settings.log_level.as_str().to_lowercase()).parse()?,
            ),
        )
        .init();

    let target = match Target::resolve(&settings.host, settings.port).await {
        Ok(target) => target,
        Err(e) => {
            eprintln!("error: {}", e);
            return Ok(ExitCode::from(config_exit_code(&e)));
        }
    };
    info!("resolved {} to {}", settings.host, target.addr());

    let mut renderer = Renderer::new(io::stdout(), settings.format, settings.quiet);
    match settings.mode {
        Mode::Check => {
            let sample = TcpConnectProber
                .attempt(&target, settings.probe.timeout)
                .await;
            renderer.check(&target, sample.succeeded())?;
            Ok(ExitCode::from(check_exit_code(sample.succeeded())))
        }
        Mode::Ping => {
            ping(&settings, &target, renderer).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn ping(
    settings: &Settings,
    target: &Target,
    mut renderer: Renderer<io::Stdout>,
) -> anyhow::Result<()> {
    let scheduler = Scheduler::new(TcpConnectProber, settings.probe)?;

    let metrics = match settings.metrics_listen {
        Some(addr) => {
            let metrics = ProbeMetrics::new(settings.enable_latency_history)?;
            tokio::spawn(metrics.clone().serve(addr));
            Some(metrics)
        }
        None => None,
    };

    let (handle, signal) = cancellation();
    let format = settings.format;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            if breaks_line_on_interrupt(format) {
                println!();
            }
            handle.cancel();
        }
    });

    renderer.header(&program_name(), target)?;
    let summary = scheduler
        .run(target, signal, &mut |event: &ProbeEvent<'_>| {
            renderer.on_attempt(event);
            if let Some(metrics) = &metrics {
                metrics.observe(event);
            }
        })
        .await;
    renderer.summary(target, &summary)?;
    Ok(())
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .and_then(|name| name.to_str())
        .unwrap_or("tcping")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn check_exit_codes() {
        assert_eq!(check_exit_code(true), 0);
        assert_eq!(check_exit_code(false), 1);
    }

    #[test]
    fn interrupt_newline_only_for_text() {
        assert!(breaks_line_on_interrupt(OutputFormat::Text));
        assert!(!breaks_line_on_interrupt(OutputFormat::Json));
    }

    #[test]
    fn config_error_exit_codes() {
        assert_eq!(config_exit_code(&ConfigError::NoAddress("nowhere".into())), 2);
        assert_eq!(
            config_exit_code(&ConfigError::ResolveFailed {
                host: "nowhere".into(),
                source: io::Error::from(io::ErrorKind::NotFound),
            }),
            2
        );
        assert_eq!(config_exit_code(&ConfigError::InvalidPort("0".into())), 255);
        assert_eq!(config_exit_code(&ConfigError::ZeroTimeout), 255);
        assert_eq!(
            config_exit_code(&ConfigError::ConfigNotFound(PathBuf::from("tcping.json"))),
            255
        );
    }
}
