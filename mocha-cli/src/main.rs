use clap::Parser;
use tracing_subscriber::EnvFilter;

use mocha_cli::app::App;
use mocha_cli::cli::{Cli, Command};
use mocha_cli::config::{MochaConfig, Settings};
use mocha_cli::repl;
use mocha_server::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    let file = match &cli.global.config {
        Some(path) => MochaConfig::load_from(path)?,
        None => MochaConfig::load()?,
    };
    let settings = Settings::resolve(&cli.global, file)?;
    tracing::debug!(?settings, "resolved settings");

    let app = App::build(settings).await?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => repl::run(app.engine()?).await?,
        Command::Devices => {
            let devices = app.devices().await?;
            if devices.is_empty() {
                println!("No devices found.");
            }
            for (id, name) in devices {
                println!("{id}: {name}");
            }
        }
        Command::Search { query } => {
            let matches = app.search(&query).await?;
            if matches.is_empty() {
                println!("No matching devices found.");
            }
            let resolver = app.resolver.read().await;
            for found in matches {
                let name = resolver.display_name(&found.identifier).unwrap_or_default();
                println!("{:>5.1}  {}: {}", found.score, found.identifier, name);
            }
        }
        Command::Models => {
            for model in app.client.list_models().await? {
                println!("{model}");
            }
        }
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(app.settings.bind);
            let state = AppState::new(app.engine()?, app.lights.clone());
            tracing::info!(%addr, model = %app.settings.model, "serving chat api");
            mocha_server::serve(addr, state).await?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
