use color_eyre::Result;
use log::info;
use starter_snake::{config::Config, logging, server::Server, strategies};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::init()?;

    #[cfg(debug_assertions)]
    info!("running in debug mode");

    #[cfg(not(debug_assertions))]
    info!("running in release mode");

    let config = Config::from_env();
    let strategy = strategies::resolve(None)?;
    let server = Server::new(config, strategy);

    info!(
        "Running Battlesnake (Local Dev Mode) at http://{}:{}",
        config.host, config.port
    );
    server.run().await?;

    Ok(())
}
