mod agent;
mod config;
mod error;
mod handlers;
mod intent;
mod ollama;
mod store;
mod tools;

use std::io::Write;

use agent::NoteAgent;
use anyhow::{Context, Result};
use config::{Config, DEFAULT_CONFIG_PATH};
use handlers::Reply;
use ollama::{ChatModel, OllamaClient};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Load configuration
    let config_path =
        std::env::var("NOTES_AGENT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load_or_default(&config_path)?;

    init_logging(&config);
    log::info!("Starting notes agent...");
    log::info!("Configuration loaded from {}", config_path);

    config.ensure_directories()?;
    log::info!("Notes directory verified: {}", config.storage.notes_dir);

    let client = OllamaClient::new(
        config.ai_model.endpoint.clone(),
        config.ai_model.model.clone(),
        config.ai_model.timeout(),
    )
    .context("Failed to create Ollama client")?;

    if !client.health_check().await {
        log::warn!(
            "Ollama is not reachable at {}; requests will fail until it is running",
            config.ai_model.endpoint
        );
    }

    let agent = NoteAgent::new(&config, client);
    println!("{}", handlers::banner(&agent, &config));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines.next_line().await.context("Failed to read from stdin")? else {
            break;
        };

        match handlers::handle_line(&agent, &config, &line).await {
            Reply::Print(text) => println!("{}\n", text),
            Reply::Nothing => {}
            Reply::Quit => break,
        }
    }

    println!("👋 Bye!");
    log::info!("Notes agent stopped");
    Ok(())
}

/// `RUST_LOG` wins when set; otherwise use the configured level.
fn init_logging(config: &Config) {
    if std::env::var("RUST_LOG").is_ok() {
        pretty_env_logger::init();
    } else {
        pretty_env_logger::formatted_builder()
            .parse_filters(&config.logging.level)
            .init();
    }
}
