//! Run options of the viewer.
//!
//! Options are layered: built-in defaults, then the optional TOML file
//! (`<config dir>/ecslogs/config.toml`), then command-line flags.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_types::region::Region;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::app::data_plane::cloudwatch_logs::{OutputFormat, DEFAULT_POLL_INTERVAL};
use crate::app::error::ViewerError;

pub const DEFAULT_FIELD: &str = "@message";
pub const DEFAULT_DURATION: Duration = Duration::from_secs(24 * 60 * 60);
const CONFIG_FILE_NAME: &str = "config.toml";

/// Defaults read from the configuration file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub fields: Option<Vec<String>>,
    pub format: Option<String>,
    /// humantime duration, e.g. `"6h"`
    pub duration: Option<String>,
    /// humantime duration, e.g. `"500ms"`
    pub poll_interval: Option<String>,
    pub csv_header: Option<bool>,
}

impl ConfigFile {
    /// `<config dir>/ecslogs/config.toml`, when a home directory is known
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "ecslogs")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Load an explicitly named file (which must exist), or the default file if
    /// present, or nothing.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                log_debug!("Loading defaults from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Options taken from the command line; `None` leaves the value to the config file
/// or the built-in default.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct OptionArgs {
    /// AWS profile name to use for authentication
    #[arg(short, long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region where your ECS clusters are located
    #[arg(short, long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Time range to fetch logs from (e.g. 24h, 1h, 30m). Defaults to the last 24 hours
    #[arg(short, long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// Filter pattern to search for in log messages
    #[arg(short, long)]
    pub filter: Option<String>,

    /// ECS task definition family name. Prompted for when not given
    #[arg(short, long)]
    pub taskdef: Option<String>,

    /// Container name within the task definition. Prompted for when not given
    #[arg(short, long)]
    pub container: Option<String>,

    /// Pick the task definition from the tasks running in this cluster
    #[arg(long, conflicts_with = "taskdef")]
    pub cluster: Option<String>,

    /// Comma-separated list of log fields to display (e.g. @message,@timestamp)
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,

    /// Output file path. Defaults to stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (simple, csv, json). 'simple' needs exactly one field
    #[arg(long)]
    pub format: Option<String>,

    /// Open the query in the CloudWatch console instead of running it
    #[arg(short, long, conflicts_with = "direct")]
    pub web: bool,

    /// Read the log streams directly instead of running a Logs Insights query
    #[arg(long)]
    pub direct: bool,

    /// Leave out the CSV header row
    #[arg(long)]
    pub no_header: bool,
}

/// How the logs are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Logs Insights query, rendered by the result writer
    Query,
    /// Read every stream and merge the events by time
    Direct,
    /// Open the query in the CloudWatch console
    Web,
}

/// Fully resolved run options
#[derive(Debug, Clone, PartialEq)]
pub struct AppOptions {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub duration: Duration,
    pub taskdef: Option<String>,
    pub container: Option<String>,
    pub cluster: Option<String>,
    pub filter: String,
    pub fields: Vec<String>,
    pub output: Option<PathBuf>,
    pub format: String,
    pub mode: Mode,
    pub csv_header: bool,
    pub poll_interval: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            profile: None,
            region: None,
            duration: DEFAULT_DURATION,
            taskdef: None,
            container: None,
            cluster: None,
            filter: String::new(),
            fields: vec![DEFAULT_FIELD.to_string()],
            output: None,
            format: OutputFormat::Simple.to_string(),
            mode: Mode::Query,
            csv_header: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

fn parse_duration(key: &str, value: &str) -> Result<Duration> {
    humantime::parse_duration(value)
        .with_context(|| format!("Invalid {} in config file: {:?}", key, value))
}

impl AppOptions {
    /// Merge command-line arguments over the config file over the defaults
    pub fn resolve(args: OptionArgs, file: ConfigFile) -> Result<Self> {
        let defaults = Self::default();

        let file_duration = file
            .duration
            .as_deref()
            .map(|value| parse_duration("duration", value))
            .transpose()?;
        let poll_interval = file
            .poll_interval
            .as_deref()
            .map(|value| parse_duration("poll_interval", value))
            .transpose()?
            .unwrap_or(defaults.poll_interval);

        let mode = if args.web {
            Mode::Web
        } else if args.direct {
            Mode::Direct
        } else {
            Mode::Query
        };

        Ok(Self {
            profile: args.profile.or(file.profile),
            region: args.region.or(file.region),
            duration: args.duration.or(file_duration).unwrap_or(defaults.duration),
            taskdef: args.taskdef,
            container: args.container,
            cluster: args.cluster,
            filter: args.filter.unwrap_or_default(),
            fields: args.fields.or(file.fields).unwrap_or(defaults.fields),
            output: args.output,
            format: args.format.or(file.format).unwrap_or(defaults.format),
            mode,
            csv_header: !args.no_header && file.csv_header.unwrap_or(defaults.csv_header),
            poll_interval,
        })
    }

    pub fn output_format(&self) -> Result<OutputFormat, ViewerError> {
        self.format.parse()
    }

    /// Reject option combinations that cannot produce output
    pub fn validate(&self) -> Result<OutputFormat, ViewerError> {
        let format = self.output_format()?;
        if format == OutputFormat::Simple && self.fields.len() != 1 {
            return Err(ViewerError::SimpleFormatFieldCount(self.fields.len()));
        }
        Ok(format)
    }

    /// The region to report, from the loaded AWS config. Web mode cannot build a
    /// console link without one, so that is an error up front.
    pub fn required_region(&self, configured: Option<&str>) -> Result<String> {
        let region = configured.unwrap_or_default();
        if self.mode == Mode::Web && region.is_empty() {
            anyhow::bail!("No AWS region configured; pass --region or set AWS_REGION");
        }
        Ok(region.to_string())
    }
}

/// Load the AWS SDK configuration, honoring an explicit profile and region.
/// Credentials come from the default provider chain.
pub async fn load_aws_config(options: &AppOptions) -> aws_types::SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(profile) = &options.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(region) = &options.region {
        loader = loader.region(Region::new(region.clone()));
    }

    let config = loader.load().await;
    log_debug!(
        "Loaded AWS config (profile: {:?}, region: {:?})",
        options.profile,
        config.region()
    );
    config
}
