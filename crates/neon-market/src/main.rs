use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use neon_core::ProgramOptions;
use neon_widgets::theme_toggle::Theme;
use neon_widgets::Markup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::app::{Flags, Storefront, BUNDLED_MARKUP};
use crate::config::AppConfig;
use crate::theme_store::ThemeStore;

mod app;
mod config;
mod theme_store;

#[derive(Parser)]
#[command(name = "neon-market")]
#[command(version, about = "Neon Market storefront in the terminal")]
struct Cli {
    /// Config file (default: <config dir>/neon-market/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page markup to load instead of the bundled storefront
    #[arg(short, long)]
    markup: Option<PathBuf>,

    /// Start with the carousel stopped
    #[arg(long)]
    no_autoplay: bool,

    /// Milliseconds between carousel slides
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Write logs here instead of the data directory
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(markup) = &self.markup {
            config.page.markup = Some(markup.clone());
        }
        if self.no_autoplay {
            config.carousel.autoplay = false;
        }
        if let Some(interval) = self.interval_ms {
            config.carousel.interval_ms = interval;
        }
        if let Some(log_file) = &self.log_file {
            config.log.file = Some(log_file.clone());
        }
    }
}

/// Logs go to a file: the terminal belongs to the page.
fn init_logging(config: &AppConfig) -> Result<()> {
    let path = config.log_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating log directory {}", dir.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.level)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

async fn load_markup(path: Option<&Path>) -> Result<Markup> {
    match path {
        Some(path) => {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading markup {}", path.display()))?;
            toml::from_str(&content).with_context(|| format!("parsing markup {}", path.display()))
        }
        None => toml::from_str(BUNDLED_MARKUP).context("parsing bundled markup"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config);
    init_logging(&config)?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting Neon Market");

    let markup = load_markup(config.page.markup.as_deref()).await?;

    let theme_store = ThemeStore::in_dir(&AppConfig::data_dir());
    let theme = theme_store.load().await.unwrap_or_else(|err| {
        tracing::error!(%err, "could not read theme, using dark");
        Theme::default()
    });

    let flags = Flags {
        markup,
        carousel: config.carousel_config(),
        back_to_top_rows: config.page.back_to_top_rows,
        notice_duration: config.notice_duration(),
        theme,
        theme_store: Some(theme_store),
        size: crossterm::terminal::size().unwrap_or((80, 24)),
    };
    let options = ProgramOptions {
        fps: config.runtime.fps,
        mouse_capture: config.runtime.mouse,
        title: Some("Neon Market".into()),
        ..ProgramOptions::default()
    };

    neon_core::run_with::<Storefront>(flags, options).await?;
    tracing::info!("Neon Market closed");
    Ok(())
}
