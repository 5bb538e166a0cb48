//! WebSynth-RS: answers questions from the web with cited reports
//!
//! This is the main entry point for the application.

use anyhow::{bail, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter};
use websynth_rs::{
    config::{self, Settings},
    llm,
    network::HttpClient,
    search,
    web::{create_router, AppState},
    Pipeline,
};

enum Command {
    Serve,
    Ask(String),
}

struct Args {
    config: Option<PathBuf>,
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = match parse_args(std::env::args().skip(1))? {
        Some(args) => args,
        None => return Ok(()),
    };

    // Initialize logging on stderr so `ask` keeps stdout for the answer
    let rust_log = std::env::var("RUST_LOG").ok();
    let (filter, filter_handle) =
        reload::Layer::new(EnvFilter::new(log_directive(rust_log.clone(), false)));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();

    info!("Starting WebSynth-RS v{}", websynth_rs::VERSION);

    // Load configuration
    let settings = config::load(args.config.as_deref())?;
    if settings.general.debug {
        filter_handle.reload(EnvFilter::new(log_directive(rust_log, true)))?;
    }
    info!("Loaded configuration for instance: {}", settings.general.instance_name);

    let pipeline = build_pipeline(&settings)?;

    match args.command {
        Command::Serve => serve(settings, pipeline).await,
        Command::Ask(question) => {
            println!("{}", pipeline.run(&question).await);
            Ok(())
        }
    }
}

fn build_pipeline(settings: &Settings) -> Result<Pipeline> {
    let client = HttpClient::with_settings(&settings.outgoing)?;
    info!("HTTP client initialized");

    let provider = search::from_settings(&settings.search, &client)?;
    let (model, writer) = llm::from_settings(settings, &client);
    info!("Models: planner={} writer={}", model.name(), writer.name());

    Ok(Pipeline::from_settings(settings, provider, model, writer))
}

async fn serve(settings: Settings, pipeline: Pipeline) -> Result<()> {
    let addr = SocketAddr::new(
        settings.server.bind_address.parse()?,
        settings.server.port,
    );

    let app = create_router(AppState::new(settings, pipeline));

    info!("Starting server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Log filter: `RUST_LOG` wins, then the debug setting
fn log_directive(rust_log: Option<String>, debug: bool) -> String {
    rust_log.unwrap_or_else(|| if debug { "debug" } else { "info" }.to_string())
}

/// Parse command line arguments; `None` means help or version was printed
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Option<Args>> {
    let mut config = None;
    let mut command = Command::Serve;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage();
                return Ok(None);
            }
            "-V" | "--version" => {
                println!("websynth-rs {}", websynth_rs::VERSION);
                return Ok(None);
            }
            "-c" | "--config" => match args.next() {
                Some(path) => config = Some(PathBuf::from(path)),
                None => bail!("--config requires a file path"),
            },
            "serve" => command = Command::Serve,
            "ask" => {
                let question = args.by_ref().collect::<Vec<_>>().join(" ");
                if question.trim().is_empty() {
                    bail!("ask requires a question");
                }
                command = Command::Ask(question);
            }
            other => bail!("Unknown argument: {} (see --help)", other),
        }
    }

    Ok(Some(Args { config, command }))
}

/// Print usage information
fn print_usage() {
    println!(
        r#"
WebSynth-RS v{}
Answers questions by planning web searches and writing a cited report

USAGE:
    websynth-rs [OPTIONS] [serve]
    websynth-rs [OPTIONS] ask <QUESTION>...

OPTIONS:
    -c, --config <FILE>    Path to configuration file
    -h, --help             Print help information
    -V, --version          Print version information

ENVIRONMENT VARIABLES:
    WEBSYNTH_SETTINGS_PATH    Path to settings.yml
    WEBSYNTH_DEBUG            Enable debug mode (true/false)
    WEBSYNTH_PORT             Server port
    WEBSYNTH_BIND_ADDRESS     Bind address
    WEBSYNTH_SEARCH_PROVIDER  tavily, searxng or perplexity
    TAVILY_API_KEY            Tavily API key
    PERPLEXITY_API_KEY        Perplexity API key
    SEARXNG_URL               SearXNG instance URL
    OLLAMA_HOST               Ollama server URL
    WEBSYNTH_PLANNER_MODEL    Planner and summarizer model
    WEBSYNTH_WRITER_MODEL     Final writer model
    RUST_LOG                  Log filter (default: info)
"#,
        websynth_rs::VERSION
    );
}
