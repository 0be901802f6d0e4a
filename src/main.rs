use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use mysetrun::api::ApiClient;
use mysetrun::app::App;
use mysetrun::config::AppConfig;
use mysetrun::error::user_friendly_message;
use mysetrun::session::timer::clamp_rest_secs;
use mysetrun::util::parse_duration;
use mysetrun::{logging, Result, API_ROOT_ENV};

/// Guided myset training in the terminal
#[derive(Parser, Debug)]
#[command(name = "mysetrun", version, about)]
struct Cli {
    /// Config file (default: $CONFIG_DIR/mysetrun/mysetrun.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// API root, overrides the config file and MYSETRUN_API_ROOT
    #[arg(long)]
    api_url: Option<String>,

    /// Open this myset directly instead of the list
    #[arg(long)]
    myset: Option<i64>,

    /// Default rest between sets, e.g. `90s` or `2m`
    #[arg(long)]
    rest: Option<String>,

    /// Log filter, e.g. `debug` or `mysetrun=trace`
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective settings to the config file and exit
    #[arg(long)]
    write_config: bool,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?
            .with_api_root_override(std::env::var(API_ROOT_ENV).ok()),
        None => AppConfig::load()?,
    };

    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url.clone());
    }
    if let Some(rest) = &cli.rest {
        let secs = parse_duration(rest)
            .map_err(mysetrun::MysetError::Config)?
            .as_secs();
        config = config.with_rest_secs(clamp_rest_secs(secs));
    }
    if let Some(level) = &cli.log_level {
        config = config.with_log_level(level.clone());
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", user_friendly_message(&e));
            std::process::exit(2);
        }
    };

    if cli.write_config {
        let saved = match &cli.config {
            Some(path) => config.save_to(path).map(|_| path.clone()),
            None => AppConfig::config_file_path().and_then(|path| config.save().map(|_| path)),
        };
        return match saved {
            Ok(path) => {
                println!("Configuration written to {}", path.display());
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", user_friendly_message(&e));
                std::process::exit(2);
            }
        };
    }

    if let Err(e) = logging::init(&config.log) {
        eprintln!("Logging disabled: {}", e);
    }
    info!(api = %config.api.base_url, rest = config.training.rest_secs, "starting");

    let api = Arc::new(ApiClient::new(&config.api)?);
    let mut app = App::new(config, api)?;
    app.init(cli.myset)?;

    let outcome = app.run().await;
    if let Err(e) = app.restore() {
        warn!(error = %e, "terminal restore failed");
    }

    if let Err(e) = outcome {
        error!(error = %e, "application error");
        eprintln!("Application error: {}", user_friendly_message(&e));
        std::process::exit(1);
    }

    info!("bye");
    Ok(())
}
