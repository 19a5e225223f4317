#![warn(clippy::all, rust_2018_idioms)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::prelude::*;

use ecslogs::app::config::{load_aws_config, AppOptions, ConfigFile, OptionArgs};
use ecslogs::app::data_plane::CloudWatchLogsClient;
use ecslogs::app::resource_discovery::EcsClient;
use ecslogs::app::selector::TerminalSelector;
use ecslogs::app::viewer::{resolve_target, retrieve, LogOutput};
use ecslogs::{log_error, log_info};

const DEFAULT_FILTER: &str = "ecslogs=info,aws_config=warn,aws_smithy_runtime=warn,hyper=warn";

/// View the CloudWatch logs of an ECS container
#[derive(Debug, Parser)]
#[command(
    name = "ecslogs",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("ECSLOGS_GIT_COMMIT"), ")")
)]
struct Cli {
    #[command(flatten)]
    options: OptionArgs,

    /// Defaults file. Falls back to <config dir>/ecslogs/config.toml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Append diagnostics to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn env_filter(verbose: u8) -> Result<tracing_subscriber::EnvFilter> {
    let directives = match std::env::var("RUST_LOG") {
        Ok(value) if !value.is_empty() => value,
        _ => match verbose {
            0 => DEFAULT_FILTER.to_string(),
            1 => DEFAULT_FILTER.replace("ecslogs=info", "ecslogs=debug"),
            _ => DEFAULT_FILTER.replace("ecslogs=info", "ecslogs=trace"),
        },
    };

    tracing_subscriber::EnvFilter::builder()
        .parse(&directives)
        .with_context(|| format!("Invalid log filter {:?}", directives))
}

fn open_log_file(path: &Path) -> Result<File> {
    let file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = file.metadata()?.permissions();
        perms.set_mode(0o600);
        std::fs::set_permissions(path, perms)
            .with_context(|| format!("Failed to restrict permissions of {}", path.display()))?;
    }

    Ok(file)
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let filter = env_filter(verbose)?;

    // Diagnostics go to the log file when one is given, otherwise to stderr;
    // stdout is reserved for results.
    let (file_layer, stderr_layer) = match log_file {
        Some(path) => {
            let file = open_log_file(path)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);
            (Some(layer), None)
        }
        None => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false);
            (None, Some(layer))
        }
    };

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer);
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    // Bridge log crate records (our log_* macros included) to tracing.
    // This must be done AFTER setting the tracing subscriber
    tracing_log::LogTracer::init().context("Failed to initialize log-to-tracing bridge")?;
    Ok(())
}

fn open_sink(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

async fn run(options: AppOptions) -> Result<()> {
    let format = options.validate()?;

    let aws_config = load_aws_config(&options).await;
    let region = options.required_region(aws_config.region().map(|region| region.as_ref()))?;
    let ecs = EcsClient::new(&aws_config);
    let logs = CloudWatchLogsClient::new(&aws_config);

    let mut selector = TerminalSelector::stdio();
    let target = resolve_target(&ecs, &mut selector, &options).await?;

    let output = retrieve(&logs, &target, &options, &region, chrono::Utc::now()).await?;

    if let LogOutput::ConsoleUrl(url) = &output {
        open::that(url).with_context(|| format!("Failed to open browser for {}", url))?;
        return Ok(());
    }

    if output.is_empty() {
        log_info!("No logs found in the specified time range");
        return Ok(());
    }

    let mut sink = open_sink(options.output.as_deref())?;
    output.write_to(&mut sink, format, options.csv_header)?;
    sink.flush().context("Failed to flush output")?;

    if let Some(path) = &options.output {
        log_info!("Results written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let file = ConfigFile::load(cli.config.as_deref())?;
    let options = AppOptions::resolve(cli.options, file)?;

    if let Err(err) = run(options).await {
        log_error!("{:#}", err);
        std::process::exit(1);
    }
    Ok(())
}
