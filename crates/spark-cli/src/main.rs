//! Spark CLI
//!
//! Serves the configuration API and lets educators inspect what the assistant
//! will see: materials per mode, the context block and the system prompt.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::pin::pin;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use futures::{stream, StreamExt};
use spark_assistant::{
    assemble, compose, create_router, summary, AppState, Config, MaterialsSummary, Mode,
    TeachingStyle,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Default port for the HTTP API server.
const DEFAULT_PORT: u16 = 7860;

/// Spark - AI Teaching Companion
///
/// Grounds a voice assistant in the course materials an educator drops into a
/// folder, and keeps its replies speakable.
#[derive(Parser, Debug)]
#[command(name = "spark")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (default: spark.json in current directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Course materials directory (overrides config and COURSE_MATERIALS_DIR)
    #[arg(short, long, value_name = "DIR", global = true)]
    materials: Option<PathBuf>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the configuration HTTP API
    Serve {
        /// Port for the HTTP API server
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },

    /// Print the composed system prompt
    Prompt {
        /// Teaching mode to compose for (faq, assignment, lecture)
        #[arg(long)]
        mode: Option<Mode>,

        /// Teaching style to compose for (supportive, socratic, concise)
        #[arg(long)]
        style: Option<TeachingStyle>,
    },

    /// List the course materials visible to each mode
    Materials {
        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the raw context block for a mode
    Context {
        /// Teaching mode (defaults to the configured mode)
        #[arg(long)]
        mode: Option<Mode>,
    },

    /// Read text from stdin and print voice-safe lines
    Normalize,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match dotenv::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded environment file"),
        Err(e) => tracing::debug!(error = %e, "No environment file loaded"),
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref(), args.materials)?;

    match args.command {
        Command::Serve { port } => serve(config, port).await,
        Command::Prompt { mode, style } => {
            let config = Config {
                mode: mode.unwrap_or(config.mode),
                teaching_style: style.unwrap_or(config.teaching_style),
                ..config
            };
            println!("{}", compose(&config));
            Ok(())
        }
        Command::Materials { json } => {
            let materials = summary(&config.materials_dir);
            if json {
                println!("{}", serde_json::to_string_pretty(&materials)?);
            } else {
                print_materials(&config.materials_dir, &materials);
            }
            Ok(())
        }
        Command::Context { mode } => {
            let block = assemble(&config.materials_dir, mode.unwrap_or(config.mode));
            println!("{block}");
            Ok(())
        }
        Command::Normalize => normalize_stdin().await,
    }
}

/// Loads configuration from file, environment and CLI overrides, in that order.
fn load_config(config_path: Option<&Path>, materials: Option<PathBuf>) -> anyhow::Result<Config> {
    let config = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            Config::load_from_file(path)?
        }
        None => Config::load()?,
    };

    let mut config = config.with_env();
    if let Some(dir) = materials {
        config.materials_dir = dir;
    }

    config.validate()?;
    Ok(config)
}

async fn serve(config: Config, port: u16) -> anyhow::Result<()> {
    print_config(&config);

    let addr: SocketAddr = ([127, 0, 0, 1], port).into();
    let state = tokio::task::spawn_blocking(move || AppState::new(config)).await?;
    let router = create_router(state);

    let listener = TcpListener::bind(addr).await.map_err(|e| {
        anyhow::anyhow!(
            "Failed to bind to {addr}: {e}\n\nSuggestion: Try a different port with --port"
        )
    })?;

    tracing::info!(%addr, "HTTP API server running");
    println!("HTTP API server running on http://{addr}");
    println!("Press Ctrl+C to stop");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down");
            }
        })
        .await?;
    Ok(())
}

/// Streams stdin line by line through the voice-safe normalizer.
async fn normalize_stdin() -> anyhow::Result<()> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    let fragments = stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((line, lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Stopped reading stdin");
                None
            }
        }
    });

    let mut spoken = pin!(spark_voice::voice_safe(fragments));
    while let Some(line) = spoken.next().await {
        println!("{line}");
    }
    Ok(())
}

fn print_config(config: &Config) {
    println!("Configuration loaded:");
    println!("  Course: {}", config.course_name);
    println!("  Mode: {} ({})", config.mode.label(), config.mode);
    println!("  Teaching style: {}", config.teaching_style);
    println!("  Materials directory: {}", config.materials_dir.display());
    println!(
        "  LLM params: temperature {}, max tokens {}",
        config.llm_params.temperature, config.llm_params.max_tokens
    );
}

fn print_materials(root: &Path, materials: &MaterialsSummary) {
    println!("Course materials in {}:", root.display());
    for entry in materials.iter() {
        println!(
            "  {} ({}): {} file(s)",
            entry.mode.label(),
            entry.mode,
            entry.files.len()
        );
        for file in &entry.files {
            println!("    - {file}");
        }
    }
}
