mod core;
mod window;

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use vfxwindow_config::WindowSettings;
use vfxwindow_core::{launch, StandalonePersistence, WindowOptions};

use crate::core::context::Context;
use crate::window::toolkit::X11Toolkit;

/// Open a window that remembers where it was left.
///
/// Only one window per process: start another process for a second one.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Window identity; a second launch with the same identity replaces the first
    #[arg(long, default_value = "vfxwindow")]
    id: String,

    /// Window title (defaults to the identity)
    #[arg(long)]
    title: Option<String>,

    /// Initial width when nothing was saved
    #[arg(long, default_value_t = 640)]
    width: u32,

    /// Initial height when nothing was saved
    #[arg(long, default_value_t = 480)]
    height: u32,

    /// Settings file to use instead of the one in the config directory
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn open_settings(args: &Args) -> WindowSettings {
    let opened = match &args.settings {
        Some(path) => WindowSettings::open(path),
        None => WindowSettings::for_window(&args.id),
    };

    match opened {
        Ok(settings) => settings,
        Err(e) => {
            // unreadable settings must not keep the window from opening
            warn!("Ignoring saved settings for {}: {}", args.id, e);
            WindowSettings::in_memory()
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    info!("Starting vfxwindow-standalone...");

    let settings = open_settings(&args);
    if let Some(path) = settings.path() {
        info!("Window settings: {}", path.display());
    }

    let ctx = Context::new()?;
    info!("Screen: {}, Root Window: {}", ctx.screen_num, ctx.root_window);

    let mut options = WindowOptions::new(args.id.as_str());
    if let Some(title) = args.title {
        options.title = title;
    }
    options.width = args.width;
    options.height = args.height;

    launch(X11Toolkit::new(ctx), StandalonePersistence::new(), settings, options)
}
