use commotion::cli::Cli;
use commotion::error::CommotionError;
use commotion::logger::{initialize as LoggerInitialize, level_for_verbosity};
use commotion::window::HeadlessWindowFactory;

use launch_core::application::{Application, ExitStatus};
use launch_core::config::{AppConfig, default_config_dir};
use launch_core::lifecycle::StubControllerFactory;
use launch_core::{APPLICATION_NAME, APPLICATION_VERSION, ORGANIZATION_DOMAIN, ORGANIZATION_NAME};

use std::process::exit;

use clap::Parser;
use log::{error, info, warn};

const FAILURE_EXIT_CODE: i32 = 1;

#[tokio::main]
async fn main() {
    let code = match run().await {
        Ok(status) => status.code(),
        Err(e) => {
            error!("CRITICAL: {APPLICATION_NAME} could not start. {e}");
            eprintln!("{APPLICATION_NAME} could not start: {e}");
            FAILURE_EXIT_CODE
        }
    };

    exit(code);
}

async fn run() -> Result<ExitStatus, CommotionError> {
    let cli = Cli::parse();

    // Config problems are reported once the logger is up.
    let (config, config_error) = match load_config(&cli) {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    let settings = cli.into_settings(config)?;

    // Initialize logger FIRST
    LoggerInitialize(&settings.log_file, level_for_verbosity(settings.verbosity))?;

    info!("{APPLICATION_NAME} {APPLICATION_VERSION} starting");
    info!("{ORGANIZATION_NAME} ({ORGANIZATION_DOMAIN})");
    if let Some(e) = config_error {
        warn!("Using default configuration: {e}");
    }

    let app = Application::start(
        settings,
        HeadlessWindowFactory::boxed(),
        Box::new(StubControllerFactory),
    )
    .await?;

    Ok(app.run_until(shutdown_signal()).await)
}

fn load_config(cli: &Cli) -> Result<AppConfig, CommotionError> {
    let config_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => default_config_dir()?,
    };
    Ok(AppConfig::load(&config_dir)?)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    }
}
