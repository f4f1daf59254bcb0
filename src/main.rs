use anyhow::{bail, Context};
use chanscore::orchestration::{
    resolution_files, score_files, utilization_files, PeriodicRunner, ReportFormat,
};
use chanscore::report::ScoreWriteOptions;
use chanscore::Config;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Time-decayed channel metrics from forwarding history")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute per-channel reputation and revenue scores
    Scores {
        #[arg(long, default_value = "forwarding_data.csv")]
        input: PathBuf,
        /// Channel info CSV; enables liquidity utilization
        #[arg(long)]
        channel_info: Option<PathBuf>,
        #[arg(long, default_value = "channel_scores.csv")]
        output: PathBuf,
        /// Evaluation time in Unix seconds (default: now)
        #[arg(long)]
        as_of: Option<f64>,
        /// Append a timestamped snapshot instead of overwriting
        #[arg(long)]
        append: bool,
        /// Re-run every N seconds, appending each snapshot
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Stop after this many periodic runs
        #[arg(long, requires = "interval_secs")]
        max_runs: Option<u64>,
    },
    /// Compute time-weighted slot and liquidity occupancy of incoming channels
    Utilization {
        input: PathBuf,
        channel_info: PathBuf,
        /// Output file (default: channel_utilization_distribution_<delay>.txt)
        #[arg(long)]
        output: Option<PathBuf>,
        /// Override HTLC_RESOLUTION_SECS
        #[arg(long)]
        resolution_secs: Option<f64>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Distribution of HTLC resolution times from LND logs
    Resolution {
        #[arg(default_value = "htlc-resolution/logs")]
        logs_dir: PathBuf,
        #[arg(default_value = "htlc_resolution_distribution.txt")]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli.cmd, config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cmd: Command, config: Config) -> anyhow::Result<()> {
    match cmd {
        Command::Scores {
            input,
            channel_info,
            output,
            as_of,
            append,
            interval_secs,
            max_runs,
        } => {
            let Some(interval) = interval_secs else {
                return run_scores(&input, channel_info.as_deref(), &output, &config, as_of, append);
            };
            if interval == 0 {
                bail!("--interval-secs must be positive");
            }
            let runner = PeriodicRunner::new(Duration::from_secs(interval), max_runs);
            runner
                .run(|_| run_scores(&input, channel_info.as_deref(), &output, &config, None, true))
                .await;
            Ok(())
        }
        Command::Utilization {
            input,
            channel_info,
            output,
            resolution_secs,
            format,
        } => {
            let output = output.unwrap_or_else(|| {
                default_utilization_output(resolution_secs.unwrap_or(config.htlc_resolution_secs))
            });
            let format = match format {
                Format::Text => ReportFormat::Text,
                Format::Json => ReportFormat::Json,
            };
            utilization_files(&input, &channel_info, &output, &config, resolution_secs, format)
                .with_context(|| format!("utilization report for {}", input.display()))?;
            Ok(())
        }
        Command::Resolution { logs_dir, output } => {
            resolution_files(&logs_dir, &output)
                .with_context(|| format!("resolution report for {}", logs_dir.display()))?;
            Ok(())
        }
    }
}

fn run_scores(
    input: &Path,
    channel_info: Option<&Path>,
    output: &Path,
    config: &Config,
    as_of: Option<f64>,
    append: bool,
) -> anyhow::Result<()> {
    let now = chrono::Utc::now();
    let as_of = as_of.unwrap_or_else(|| now.timestamp_millis() as f64 / 1000.0);
    let options = ScoreWriteOptions {
        mode: config.channel_id_mode,
        timestamp: append.then(|| now.format("%Y-%m-%d %H:%M:%S").to_string()),
        append,
    };
    score_files(input, channel_info, output, config, as_of, &options)
        .with_context(|| format!("scoring {}", input.display()))?;
    Ok(())
}

fn default_utilization_output(resolution_secs: f64) -> PathBuf {
    let label = if resolution_secs >= 1.0 {
        format!("{}s", resolution_secs as u64)
    } else {
        format!("{:.1}s", resolution_secs)
    };
    PathBuf::from(format!("channel_utilization_distribution_{}.txt", label))
}
