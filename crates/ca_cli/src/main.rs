use anyhow::Context;
use ca_core::config::DEFAULT_MODEL;
use ca_core::AppConfig;
use ca_feeds::{select_top, Aggregator};
use ca_inference::{generate_note, OllamaClient};
use ca_web::{create_app, AppState};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ca-notes", version, about = "Exam-oriented study notes from live news feeds")]
struct Cli {
    /// Base URL of the Ollama generation service. Overrides OLLAMA_HOST.
    #[arg(long)]
    ollama_host: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
    },
    /// Run the pipeline once and print the notes to stdout
    Daily {
        /// Number of notes to generate (clamped to 1-10)
        #[arg(short, default_value_t = 5)]
        n: i64,
        #[arg(long, default_value = DEFAULT_MODEL)]
        model: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(host) = cli.ollama_host {
        config = config.with_ollama_host(host);
    }
    info!(ollama_host = %config.ollama_host, feeds = config.feeds.len(), "configuration loaded");

    match cli.command {
        Commands::Serve { addr } => {
            let state = AppState::from_config(&config)?;
            let app = create_app(state);

            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {}", addr))?;
            info!(addr = %addr, "serving HTTP API");
            axum::serve(listener, app).await.context("server error")?;
        }
        Commands::Daily { n, model } => {
            let aggregator = Aggregator::from_config(&config)?;
            let ollama = OllamaClient::new(config.ollama_host.clone())?;

            let selected = select_top(aggregator.aggregate().await, n);
            info!(selected = selected.len(), model = %model, "generating notes");

            for (i, article) in selected.iter().enumerate() {
                let note = generate_note(&ollama, article, &model).await?;
                println!("--- Note {} ({})\n{}\n", i + 1, article.article.url, note);
            }
        }
    }

    Ok(())
}
