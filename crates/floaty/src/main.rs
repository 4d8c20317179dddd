use std::io;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use floaty_config::Config;
use tracing::{info, warn};

mod app;
mod debounce;
mod logging;

use app::App;

/// Floating particles in your terminal.
#[derive(Parser, Debug)]
#[command(name = "floaty", version, about)]
struct Cli {
    /// Number of particles (overrides the config file).
    #[arg(long, short = 'n')]
    particles: Option<NonZeroUsize>,

    /// Config file to use instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    if let Some(path) = logging::init() {
        info!("logging to {}", path.display());
    }

    let config_path = cli.config.or_else(Config::path);
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };
    if let Some(n) = cli.particles {
        config.particles = n.get();
    }

    let app = App::new(config, config_path)?;
    let terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .map_err(color_eyre::Report::from)
        .and_then(|()| app.run(terminal));
    if let Err(e) = execute!(io::stdout(), DisableMouseCapture) {
        warn!("failed to disable mouse capture: {e}");
    }
    ratatui::restore();
    result
}
