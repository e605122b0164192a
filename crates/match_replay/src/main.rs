//! Match Replay CLI
//!
//! Replays a stored match document and prints the score, the point-by-point
//! timeline, the format presets, or the request JSON Schema.

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "match_replay")]
#[command(about = "Replay stored tennis match records", long_about = None)]
struct Cli {
    /// Raise the log level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Replay a match and print its score
    Score {
        /// Input match JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Override the stored format with a named preset
        #[arg(long, env = "TENNIS_FORMAT_PRESET")]
        preset: Option<String>,

        /// Print the summary as JSON
        #[arg(long, default_value = "false")]
        json: bool,

        /// Include the SHA-256 digest of the replayed score
        #[arg(long, default_value = "false")]
        digest: bool,
    },

    /// Print every point with the score after it and its pressure badge
    Timeline {
        /// Input match JSON file path
        #[arg(long)]
        r#in: PathBuf,

        /// Override the stored format with a named preset
        #[arg(long, env = "TENNIS_FORMAT_PRESET")]
        preset: Option<String>,

        /// Print the annotations as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List the built-in match format presets
    Presets,

    /// Print the JSON Schema of the score request
    Schema,
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Score {
            r#in,
            preset,
            json,
            digest,
        } => {
            let mut normalized = match_replay::load_match(&r#in)?;
            match_replay::apply_preset(&mut normalized.record, preset.as_deref())?;
            let summary = match_replay::replay(&normalized);

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("🎾 {}", r#in.display());
                println!("{}", match_replay::render_summary(&summary, digest));
            }
        }

        Commands::Timeline { r#in, preset, json } => {
            let mut normalized = match_replay::load_match(&r#in)?;
            match_replay::apply_preset(&mut normalized.record, preset.as_deref())?;
            let record = &normalized.record;
            let annotations = tennis_core::annotate(&record.match_format, &record.point_log);

            if json {
                println!("{}", serde_json::to_string_pretty(&annotations)?);
            } else {
                println!("{}", match_replay::render_timeline(&annotations));
            }
        }

        Commands::Presets => {
            println!("{}", match_replay::render_presets());
        }

        Commands::Schema => {
            let schema = tennis_core::score_request_schema_json()
                .context("Failed to render request schema")?;
            println!("{schema}");
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("match_replay CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
