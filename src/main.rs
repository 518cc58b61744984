use anyhow::Result;
use car_doctor::config::{Config, Environment};
use clap::{Parser, Subcommand};

/// car-doctor - Car service booking API
#[derive(Parser)]
#[command(name = "car-doctor")]
#[command(about = "Car service catalogue and booking API", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server host address (overrides config file)
        #[arg(long)]
        host: Option<String>,

        /// Server port (overrides config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    car_doctor::observability::init_observability(
        "car-doctor",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.environment == Environment::Production,
    )?;

    match cli.command {
        Commands::Serve { host, port } => car_doctor::server::serve(config, host, port).await,
        Commands::Migrate => car_doctor::migrate::migrate(&config).await,
        Commands::Reset => car_doctor::migrate::reset(&config).await,
    }
}
