// CLI module for administrative operations

pub mod seed;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::EnvironmentProvider;

/// Court registry backend
#[derive(Parser)]
#[command(name = "registry-backend")]
#[command(about = "Court registry record-keeping API", long_about = None)]
pub struct Cli {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the HTTP server
    Serve,

    /// Create the superadmin account from SUPERADMIN_EMAIL and SUPERADMIN_PASSWORD
    SeedSuperadmin,
}

/// Execute a one-shot CLI command
///
/// # Returns
/// * `Ok(())` - Command executed successfully
/// * `Err(...)` - Command execution failed
pub async fn execute_command(
    command: Commands,
    app_data: &AppData,
    env_provider: &dyn EnvironmentProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::SeedSuperadmin => {
            match seed::seed_superadmin(&app_data.credential_store, env_provider).await? {
                seed::SeedOutcome::Created { user_id } => {
                    println!("Superadmin created with id {}", user_id);
                }
                seed::SeedOutcome::AlreadyExists => {
                    println!("Superadmin already exists, nothing to do");
                }
            }
        }
        Commands::Serve => {
            return Err("serve is handled by the server entry point".into());
        }
    }
    Ok(())
}
