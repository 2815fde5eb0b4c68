//! LakeStack CLI.
//!
//! Synthesizes the data lake infrastructure templates for a target
//! environment, and bootstraps the deployment credential secret.
//!
//! # Usage
//!
//! ```text
//! lakestack synth --environment Dev [--config lakestack.json] [--output-dir out]
//! lakestack configure-secret [--config lakestack.json]
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod secrets;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lakestack_core::{AwsEnvironment, Configuration, TargetEnvironment};
use lakestack_stacks::DeployStage;

const USAGE: &str = "usage:
  lakestack synth --environment <Dev|Test|Prod> [--config <file>] [--output-dir <dir>]
  lakestack configure-secret [--config <file>]";

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Read the log level from the environment.
fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

/// A parsed CLI invocation.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    /// Synthesize templates for one environment.
    Synth {
        environment: TargetEnvironment,
        config: Option<PathBuf>,
        output_dir: PathBuf,
    },
    /// One-shot deployment credential bootstrap.
    ConfigureSecret { config: Option<PathBuf> },
}

/// Parse command-line arguments (without the binary name).
fn parse_args(args: &[String]) -> Result<Command> {
    let Some((subcommand, rest)) = args.split_first() else {
        bail!("missing subcommand\n{USAGE}");
    };

    let mut environment = None;
    let mut config = None;
    let mut output_dir = PathBuf::from("out");

    let mut iter = rest.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .map(String::as_str)
                .with_context(|| format!("flag {flag} requires a value\n{USAGE}"))
        };
        match flag.as_str() {
            "--environment" => environment = Some(value()?.parse::<TargetEnvironment>()?),
            "--config" => config = Some(PathBuf::from(value()?)),
            "--output-dir" => output_dir = PathBuf::from(value()?),
            other => bail!("unknown flag: {other}\n{USAGE}"),
        }
    }

    match subcommand.as_str() {
        "synth" => {
            let environment =
                environment.with_context(|| format!("synth requires --environment\n{USAGE}"))?;
            Ok(Command::Synth {
                environment,
                config,
                output_dir,
            })
        }
        "configure-secret" => {
            if environment.is_some() {
                bail!("configure-secret targets the deployment account; --environment does not apply\n{USAGE}");
            }
            Ok(Command::ConfigureSecret { config })
        }
        other => bail!("unknown subcommand: {other}\n{USAGE}"),
    }
}

/// Load the configuration table, with an optional override file.
fn load_configuration(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "loading configuration file");
            Ok(Configuration::from_json_file(path)?)
        }
        None => Ok(Configuration::builtin()),
    }
}

/// Synthesize and write the templates for one environment.
fn run_synth(
    configuration: &Configuration,
    environment: TargetEnvironment,
    output_dir: &Path,
) -> Result<()> {
    let resolved = configuration.resolve(environment)?;
    let aws_env = AwsEnvironment::new(resolved.account_id().clone(), resolved.region().clone());
    let deployment = configuration.deployment()?;

    let stage = DeployStage::new(configuration, environment, &deployment.account_id, &aws_env)?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create output directory {}", output_dir.display()))?;

    for synthesized in stage.templates() {
        let path = output_dir.join(format!("{}.template.json", synthesized.name));
        let json = synthesized.template.to_json_pretty()?;
        std::fs::write(&path, json)
            .with_context(|| format!("cannot write template {}", path.display()))?;
        info!(template = %path.display(), "wrote template");
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(&log_level())?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    match parse_args(&args)? {
        Command::Synth {
            environment,
            config,
            output_dir,
        } => {
            let configuration = load_configuration(config.as_deref())?;
            run_synth(&configuration, environment, &output_dir)
        }
        Command::ConfigureSecret { config } => {
            let configuration = load_configuration(config.as_deref())?;
            secrets::configure_secret(&configuration).await
        }
    }
}
