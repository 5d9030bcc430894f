//! retro-tui - Terminal UI for RetroScroll
//!
//! An endless feed of retro content with XP, levels and a mini arcade.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use libretroscroll::config::resolve_data_path;
use libretroscroll::logging::{LogFormat, LoggingConfig};
use libretroscroll::Config;
use retro_tui::{
    app::{event::EventHandler, reduce, Action, AppState},
    services::{drain_effects, ServiceHandle},
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui,
};

#[derive(Parser, Debug)]
#[command(name = "retro-tui")]
#[command(about = "Endless retro feed with XP and mini-games", long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(short, long, env = "RETROSCROLL_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for reproducible content
    #[arg(long)]
    seed: Option<u64>,

    /// Keep progress in memory only
    #[arg(long)]
    memory: bool,

    /// Log format (text, json or pretty)
    #[arg(long, default_value = "text", env = "RETROSCROLL_LOG_FORMAT")]
    log_format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The terminal owns stderr, so logs go to a file
    let log_dir = resolve_data_path()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("creating log directory {}", log_dir.display()))?;
    let file_appender = tracing_appender::rolling::never(&log_dir, "retro-tui.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);

    let format: LogFormat = cli.log_format.parse().map_err(anyhow::Error::msg)?;
    let level = std::env::var("RETROSCROLL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    LoggingConfig::new(format, level, cli.verbose).init_with_writer(writer);

    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from_path(path)?;
            config.apply_env_overrides()?;
            config
        }
        None => Config::load()?,
    };
    if cli.seed.is_some() {
        config.content.seed = cli.seed;
    }

    let services = if cli.memory {
        ServiceHandle::in_memory(config)?
    } else {
        ServiceHandle::new(config)?
    };

    install_panic_hook();
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, services);
    restore_terminal(terminal)?;

    result?;
    Ok(())
}

fn run_app(terminal: &mut Tui, mut services: ServiceHandle) -> retro_tui::Result<()> {
    let threshold = services.service().config().feed.scroll_threshold;
    let mut state = AppState::with_threshold(threshold);
    let service_events = services.subscribe();

    for action in services.boot_actions() {
        state = reduce(state, action);
    }
    let size = terminal.size()?;
    state = reduce(state, Action::Resize(size.width, size.height));
    state = reduce(state, Action::RequestMore);
    state = drain_effects(&mut services, state);

    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    loop {
        terminal.draw(|frame| ui::render(frame, &state))?;

        let tui_event = event_handler.next()?;
        state = reduce(state, tui_event.into());

        while let Ok(event) = service_events.try_recv() {
            if let Some(action) = services.action_for(event) {
                state = reduce(state, action);
            }
        }

        state = drain_effects(&mut services, state);

        if state.should_quit {
            break;
        }
    }

    tracing::info!(xp = state.profile.stats.xp, "session ended");
    Ok(())
}
