//! sumoq - Sumo Logic query prompt
//!
//! Reads one Sumo Logic query with context-sensitive completion and prints it
//! to stdout. Index names, custom fields, namespaces and where-value
//! suggestions are loaded in the background while the prompt is already live.
//!
//! # Usage
//!
//! ```bash
//! # Interactive prompt, credentials from the environment
//! sumoq
//!
//! # Explicit keys document and kubeconfig
//! sumoq --keys ~/.sumo/keys.toml --kubeconf ~/.kube/config
//! ```

use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing::debug;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use sumoq::cli::CliInterface;
use sumoq::config::Credentials;
use sumoq::error::Result;
use sumoq::repl::ReplEngine;
use sumoq::session::Session;

/// Environment variable holding a full log filter directive
const LOG_ENV: &str = "SUMOQ_LOG";

/// Application entry point
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// This function orchestrates the application startup:
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle subcommands or read a query
///
/// # Returns
/// * `Result<()>` - Success or error
async fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli)?;

    if cli.handle_subcommand().await? {
        return Ok(());
    }

    run_interactive_mode(&cli).await
}

/// Start the producers, read one query and print it
async fn run_interactive_mode(cli: &CliInterface) -> Result<()> {
    let config = cli.config();
    let credentials = Credentials::resolve(config.credentials.keys_file.as_deref());
    let mut session = Session::start(config, credentials).await?;

    let mut repl = ReplEngine::new(
        session.completion_engine(),
        session.cache().clone(),
        &config.history,
        &config.display,
    )?;

    // The editor blocks on the terminal; producers keep running on the other workers
    let query = tokio::task::block_in_place(|| repl.read_query());

    debug!("{} producers still running at exit", session.pending_producers());
    session.shutdown();

    if let Some(query) = query? {
        println!("{}", query);
    }
    Ok(())
}

/// Initialize logging system
///
/// `SUMOQ_LOG` wins over the configured level. Logs go to the configured
/// file, else stderr, so they never land in the printed query.
///
/// # Arguments
/// * `cli` - CLI interface with the effective logging configuration
fn initialize_logging(cli: &CliInterface) -> Result<()> {
    let logging = &cli.config().logging;

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(logging.level.to_tracing_level()).into())
        .with_env_var(LOG_ENV)
        .from_env_lossy();

    let writer = match &logging.file_path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(logging.file_path.is_none())
        .with_target(false);

    if logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
    Ok(())
}
