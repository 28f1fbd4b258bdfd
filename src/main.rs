mod app;
mod commands;
mod config;
mod error;
mod messages;
mod profile;
mod screens;
mod services;
mod upload;

use app::App;
use config::Config;

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout is the user's screen
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    tracing::info!("Starting reelbox");

    let config = Config::load()?;
    config.validate()?;

    App::new(config).await?.run().await
}
