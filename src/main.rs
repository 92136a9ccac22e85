use clap::Parser;
use poem::{listener::TcpListener, Server};
use std::sync::Arc;

use registry_backend::api::build_app;
use registry_backend::app_data::AppData;
use registry_backend::cli::{execute_command, Cli, Commands};
use registry_backend::config::{init_logging, BootstrapSettings, SecretManager, SystemEnvironment};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    if let Err(e) = init_logging(&SystemEnvironment) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Fatal error");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = BootstrapSettings::from_env()?;
    let secret_manager = Arc::new(SecretManager::init()?);
    let app_data = Arc::new(AppData::init(&settings, secret_manager)?);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(&settings, app_data).await,
        command => {
            let result = execute_command(command, &app_data, &SystemEnvironment).await;
            // Drain queued log rows before exiting
            app_data.audit_logger.flush().await?;
            result
        }
    }
}

async fn serve(settings: &BootstrapSettings, app_data: Arc<AppData>) -> Result<(), Box<dyn std::error::Error>> {
    let address = settings.server_address();
    let server_url = format!("http://{}", address);
    let app = build_app(app_data, &server_url);

    tracing::info!(address = %address, "Starting server");
    tracing::info!("Swagger UI available at {}/swagger", server_url);
    tracing::info!("API endpoints available at {}/api", server_url);

    Server::new(TcpListener::bind(address)).run(app).await?;
    Ok(())
}
