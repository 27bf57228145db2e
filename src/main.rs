// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Bot detection demo CLI
//!
//! Usage:
//!   botbuster analyze jack --seed 42
//!   botbuster evaluate --samples 1000 --output results
//!   botbuster register --data-dir ./data alice alice@example.com

use anyhow::{bail, Result};
use botbuster::analysis::{run_demo_evaluation, AnalysisConfig, Analyzer};
use botbuster::chart::{confusion_grid, metrics_chart, roc_chart};
use botbuster::graph::network_layout;
use botbuster::metrics::{ConfusionMatrix, ModelMetrics};
use botbuster::store::SessionStore;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "botbuster")]
#[command(about = "Heuristic bot detection demo")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a username or profile URL
    Analyze {
        /// Username or twitter.com profile URL
        input: String,

        /// Random seed for reproducibility
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Simulated analysis time in milliseconds
        #[arg(long, default_value_t = 2000)]
        delay_ms: u64,

        /// Directory for saved reports (omit to skip saving)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "both")]
        format: OutputFormat,
    },

    /// Print the synthetic follower network for a handle
    Network {
        /// Username to build the network around
        handle: String,
    },

    /// Show the published model metrics and confusion matrix
    Metrics,

    /// Run the demo evaluation against generated ground truth
    Evaluate {
        /// Number of profiles to generate and score
        #[arg(long, default_value_t = 1000)]
        samples: usize,

        /// Random seed for reproducibility
        #[arg(short, long, default_value_t = 42)]
        seed: u64,

        /// Directory for saved reports (omit to skip saving)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Register a new user and sign in
    Register {
        username: String,
        email: String,
        /// Password (prompt-free for demo purposes)
        password: String,

        /// Directory holding users.json and session.json
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Sign in with an existing account
    Login {
        username: String,
        password: String,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Sign out of the current session
    Logout {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Show the current session, if any
    Whoami {
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Markdown,
    Both,
}

impl OutputFormat {
    fn json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    fn markdown(self) -> bool {
        matches!(self, OutputFormat::Markdown | OutputFormat::Both)
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match args.command {
        Command::Analyze {
            input,
            seed,
            delay_ms,
            output,
            format,
        } => analyze(&input, seed, delay_ms, output.as_deref(), format),
        Command::Network { handle } => network(&handle),
        Command::Metrics => metrics(),
        Command::Evaluate {
            samples,
            seed,
            output,
        } => evaluate(samples, seed, output.as_deref()),
        Command::Register {
            username,
            email,
            password,
            data_dir,
        } => {
            let store = SessionStore::open(data_dir)?;
            match store.register(&username, &password, &email)? {
                Some(session) => println!("Registered and signed in as {}", session.username),
                None => bail!("username {username:?} is already taken"),
            }
            Ok(())
        }
        Command::Login {
            username,
            password,
            data_dir,
        } => {
            let store = SessionStore::open(data_dir)?;
            match store.login(&username, &password)? {
                Some(session) => println!("Signed in as {} <{}>", session.username, session.email),
                None => bail!("invalid username or password"),
            }
            Ok(())
        }
        Command::Logout { data_dir } => {
            let store = SessionStore::open(data_dir)?;
            store.clear_session()?;
            println!("Signed out");
            Ok(())
        }
        Command::Whoami { data_dir } => {
            let store = SessionStore::open(data_dir)?;
            match store.get_session()? {
                Some(session) => println!("{} <{}>", session.username, session.email),
                None => println!("Not signed in"),
            }
            Ok(())
        }
    }
}

fn analyze(
    input: &str,
    seed: u64,
    delay_ms: u64,
    output: Option<&std::path::Path>,
    format: OutputFormat,
) -> Result<()> {
    let mut analyzer = Analyzer::new(seed);

    // The original product shows a fixed "analyzing" pause before the
    // verdict; the spinner stands in for it here.
    if delay_ms > 0 {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
        spinner.set_message(format!("Analyzing @{input}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));
        std::thread::sleep(Duration::from_millis(delay_ms));
        spinner.finish_and_clear();
    }

    let report = analyzer.analyze(input)?;

    println!("\n{}", "=".repeat(70));
    println!("ANALYSIS: @{}", report.handle);
    println!("{}", "=".repeat(70));
    println!(
        "\nVerdict: {} (confidence {:.1}%, risk: {})",
        report.prediction.verdict,
        report.prediction.confidence * 100.0,
        report.prediction.risk
    );
    println!(
        "\nProfile: {} followers, {} following, {} tweets, verified: {}",
        report.profile.followers,
        report.profile.following,
        report.profile.tweets,
        report.profile.verified
    );

    println!("\nFeature Attribution:");
    println!("{:-<70}", "");
    for entry in &report.explanation.attributions {
        println!("{:<30} {:>+8.3}", entry.feature, entry.value);
    }
    println!("{:-<70}", "");

    println!("\nKey Factors:");
    for factor in &report.explanation.local_factors {
        println!(
            "{:<30} value {:>8.2}  weight {:>+5.2}",
            factor.feature, factor.value, factor.weight
        );
    }

    println!("\n{}", report.explanation.summary);

    if let Some(dir) = output {
        std::fs::create_dir_all(dir)?;
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

        if format.json() {
            let json_path = dir.join(format!("analysis_{}_{}.json", report.handle, timestamp));
            report.save_json(&json_path)?;
            println!("\nJSON report saved to: {}", json_path.display());
        }
        if format.markdown() {
            let md_path = dir.join(format!("analysis_{}_{}.md", report.handle, timestamp));
            std::fs::write(&md_path, report.render_markdown())?;
            println!("Markdown report saved to: {}", md_path.display());
        }
    }

    Ok(())
}

fn network(handle: &str) -> Result<()> {
    let handle = botbuster::sanitize_handle(handle);
    if handle.is_empty() {
        bail!("no usable username in input");
    }

    let layout = network_layout(&handle);
    println!("Network for @{handle}: {} nodes, {} edges", layout.nodes.len(), layout.edges.len());
    println!("{:-<50}", "");
    for node in &layout.nodes {
        println!("{:<16} {:>10?} ({:>7.1}, {:>7.1})", node.id, node.kind, node.x, node.y);
    }
    Ok(())
}

fn metrics() -> Result<()> {
    let metrics = ModelMetrics::published();
    let cm = ConfusionMatrix::published();

    println!("\n{}", "=".repeat(70));
    println!("PUBLISHED MODEL METRICS");
    println!("{}", "=".repeat(70));
    println!("\n{}", metrics.format());
    println!("{}", cm.format());

    let chart = metrics_chart(&metrics);
    println!("Chart layout: {} columns on a {}x{} canvas", chart.columns.len(), chart.width, chart.height);
    let grid = confusion_grid(&cm);
    println!("Grid layout: {} cells on a {}x{} canvas", grid.cells.len(), grid.width, grid.height);
    let roc = roc_chart(&metrics);
    println!("ROC layout: {} curve points on a {}x{} canvas ({})", roc.curve.len(), roc.width, roc.height, roc.auc_label.text);

    Ok(())
}

fn evaluate(samples: usize, seed: u64, output: Option<&std::path::Path>) -> Result<()> {
    let config = AnalysisConfig { seed, samples };
    let report = run_demo_evaluation(&config)?;

    println!("\n{}", "=".repeat(70));
    println!("DEMO EVALUATION ({} samples, seed {})", samples, seed);
    println!("{}", "=".repeat(70));
    println!("\n{}", report.metrics.format());
    println!("{}", report.confusion.format());

    println!("Sample predictions:");
    println!("{:-<70}", "");
    println!("{:<16} {:>10} {:>10} {:>12}", "Username", "Predicted", "Actual", "Confidence");
    println!("{:-<70}", "");
    for sample in &report.samples {
        println!(
            "{:<16} {:>10} {:>10} {:>11.1}%",
            sample.username,
            sample.predicted.to_string(),
            sample.actual.to_string(),
            sample.confidence * 100.0
        );
    }
    println!("{:-<70}", "");

    if let Some(dir) = output {
        std::fs::create_dir_all(dir)?;
        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");

        let json_path = dir.join(format!("eval_{timestamp}.json"));
        report.save_json(&json_path)?;
        println!("\nJSON results saved to: {}", json_path.display());

        let md_path = dir.join(format!("eval_{timestamp}.md"));
        std::fs::write(&md_path, report.render_markdown())?;
        println!("Markdown report saved to: {}", md_path.display());
    }

    println!("\nEvaluation complete!");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_misspelled_format_is_rejected() {
        let result = Args::try_parse_from(["botbuster", "analyze", "jack", "--format", "markdwon"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_format_values_parse() {
        for (value, json, markdown) in [
            ("json", true, false),
            ("markdown", false, true),
            ("both", true, true),
        ] {
            let args =
                Args::try_parse_from(["botbuster", "analyze", "jack", "--format", value]).unwrap();
            match args.command {
                Command::Analyze { format, .. } => {
                    assert_eq!(format.json(), json);
                    assert_eq!(format.markdown(), markdown);
                }
                _ => panic!("expected analyze command"),
            }
        }
    }

    #[test]
    fn test_format_defaults_to_both() {
        let args = Args::try_parse_from(["botbuster", "analyze", "jack"]).unwrap();
        match args.command {
            Command::Analyze { format, .. } => assert_eq!(format, OutputFormat::Both),
            _ => panic!("expected analyze command"),
        }
    }
}
