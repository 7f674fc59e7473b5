use std::sync::Arc;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use tracing_subscriber::{fmt, EnvFilter};

use lodestar::consents::ConsentService;
use lodestar::notifier::HttpNotifier;
use lodestar::{settings, storage, web};

#[derive(Parser, Debug)]
#[command(
    name = "lodestar",
    version,
    about = "Consent and credential authorization service"
)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    // load settings
    let settings = settings::Settings::load(&cli.config)?;
    tracing::info!(?settings, "Loaded configuration");

    // init storage (database + migrations)
    let db = storage::init(&settings.database).await.into_diagnostic()?;

    // outbound notifier and lifecycle orchestrator
    let notifier = Arc::new(HttpNotifier::new(&settings.participant));
    let service = Arc::new(ConsentService::new(db, notifier));

    // start web server
    web::serve(settings, service).await.into_diagnostic()?;
    Ok(())
}
