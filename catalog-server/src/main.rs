use catalog_server::{Config, Server, ServerState, init_logger_with_file};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Environment first: config and log level both read from it
    dotenv::dotenv().ok();

    let config = Config::from_env();
    config.ensure_work_dir_structure()?;

    let log_level = std::env::var("RUST_LOG").ok();
    let log_dir = config.log_dir();
    init_logger_with_file(
        log_level.as_deref(),
        if config.is_production() {
            log_dir.to_str()
        } else {
            None
        },
    );

    tracing::info!("Catalog server starting...");

    let state = ServerState::initialize(&config).await?;
    let server = Server::with_state(config, state);

    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
