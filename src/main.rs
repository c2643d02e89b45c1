use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use utilkit::config::{self, Config};
use utilkit::output::Reporter;
use utilkit::output::json::JsonReporter;
use utilkit::output::text::TextReporter;
use utilkit::suite;

#[derive(Parser)]
#[command(
    name = "utilkit",
    version,
    about = "Run the utilkit self-check suite"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory to load utilkit.toml / Cargo.toml from (defaults to current directory).
    #[arg(short, long, global = true)]
    path: Option<PathBuf>,

    /// Only run cases of these modules (can be repeated).
    #[arg(short, long, global = true)]
    module: Vec<String>,

    /// Stop after the first failing case.
    #[arg(long, global = true)]
    fail_fast: bool,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Run the self-check cases and exit non-zero on any failure (default).
    Check,
    /// List the selected cases without running them.
    List,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let root = cli
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut config = match Config::load(&root) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    // Apply CLI overrides
    if !cli.module.is_empty() {
        config.modules = match config::parse_modules(&cli.module) {
            Ok(m) => m,
            Err(e) => {
                eprintln!("Error: {e}");
                process::exit(2);
            }
        };
    }
    if cli.fail_fast {
        config.fail_fast = true;
    }

    let stdout = std::io::stdout();
    let mut writer = stdout.lock();

    let reporter: Box<dyn Reporter> = match cli.format {
        OutputFormat::Text => Box::new(TextReporter::new(cli.verbose > 0)),
        OutputFormat::Json => Box::new(JsonReporter),
    };

    match cli.command.unwrap_or(Command::Check) {
        Command::List => {
            let cases: Vec<_> = suite::catalog()
                .into_iter()
                .filter(|c| config.includes(c.module))
                .collect();
            if let Err(e) = reporter.report_catalog(&cases, &mut writer) {
                eprintln!("Error writing output: {e}");
                process::exit(2);
            }
        }
        Command::Check => {
            let report = suite::run(&config);
            if let Err(e) = reporter.report_run(&report, &mut writer) {
                eprintln!("Error writing output: {e}");
                process::exit(2);
            }
            if !report.success() {
                process::exit(1);
            }
        }
    }
}
