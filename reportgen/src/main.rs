use anyhow::Result;
use clap::Parser;
use reportgen::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment (GEMINI_API_KEY may live in .env)
    dotenv::dotenv().ok();

    // Initialize tracing for the CLI.
    tracing_subscriber::fmt::init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let cli = Cli::parse();
    tracing::info!("CLI arguments parsed, invoking run");
    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
