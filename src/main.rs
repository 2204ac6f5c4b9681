//! studiochat - game studio assistant chat client
//!
#![doc = "Main entry point for the studiochat application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use studiochat::backend::TaskKind;
use studiochat::cli::{Cli, Commands};
use studiochat::commands;
use studiochat::commands::send::SendOptions;
use studiochat::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Chat { module, model } => {
            if let Some(m) = &module {
                tracing::debug!("Using module override: {}", m);
            }
            if let Some(m) = &model {
                tracing::debug!("Using model override: {}", m);
            }
            commands::chat::run_chat(config, module, model).await?;
            Ok(())
        }
        Commands::Send {
            text,
            module,
            model,
            images,
            documents,
            json,
        } => {
            tracing::debug!(
                images = images.len(),
                documents = documents.len(),
                "Starting one-shot send"
            );
            let options = SendOptions {
                module,
                model,
                images,
                documents,
                json,
            };
            commands::send::run_send(config, text, options).await?;
            Ok(())
        }
        Commands::Models { module, json } => {
            let module = module.as_deref().map(str::parse::<TaskKind>).transpose()?;
            commands::models::list_models(&config, module, json)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "studiochat=debug"
    } else {
        "studiochat=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
