//! Hypaurora - wallpaper-driven desktop theme manager
//!
//! Generates and applies color themes across Ghostty, GTK, GNOME Shell,
//! Rofi, EWW, Dunst and Hyprland, either from stored theme documents or
//! synthesized from the current wallpaper.

mod background;
mod color;
mod error;
mod extract;
mod manager;
mod patch;
mod registry;
mod settings;
mod targets;
mod theme;
mod watch;

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser as ClapParser, Subcommand};

use manager::{ThemeManager, WALLPAPER_THEME};
use registry::ThemeRegistry;
use settings::{DesktopSettings, GsettingsClient, MemorySettings};
use theme::Variant;

#[derive(ClapParser)]
#[command(name = "hypaurora")]
#[command(about = "Wallpaper-driven desktop theme manager", long_about = None)]
struct Cli {
    /// Base directory holding themes and application configs
    /// (default: $HYPAURORA_DIR or ~/Documents/hypaurora)
    #[arg(long, value_name = "DIR", global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available themes
    List,
    /// Show a theme's color table without applying it
    Preview {
        /// Theme name (a file stem under themes/)
        theme: String,
    },
    /// Apply a theme, or `wallpaper` to synthesize one from the wallpaper
    Apply {
        /// Theme name, or `wallpaper`
        theme: String,
        /// Force dark or light instead of following the desktop scheme
        #[arg(long, value_enum)]
        variant: Option<Variant>,
        /// Keep running and re-apply whenever the wallpaper changes
        #[arg(long)]
        listen: bool,
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Follow the desktop color scheme and swap preferred themes on flips
    WatchDarkMode,
    /// Build dark/light wallpaper variants from the picked background
    Backgrounds {
        /// Run a single pass instead of watching for changes
        #[arg(long)]
        once: bool,
    },
}

/// Prefer the real gsettings client; fall back to an in-memory store so the
/// file-only operations still work on machines without GNOME.
fn desktop_settings() -> Box<dyn DesktopSettings> {
    match GsettingsClient::new() {
        Ok(client) => Box::new(client),
        Err(err) => {
            tracing::warn!("{err}; desktop settings changes will not persist");
            Box::new(MemorySettings::new())
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base_dir = ThemeRegistry::resolve_base_dir(cli.base_dir)?;
    let manager = ThemeManager::new(ThemeRegistry::new(base_dir), desktop_settings());

    match cli.command {
        Commands::List => manager.list(),
        Commands::Preview { theme } => manager.preview(&theme),
        Commands::Apply {
            theme,
            variant,
            listen,
            dry_run,
        } => {
            if listen && theme != WALLPAPER_THEME {
                bail!("--listen only makes sense with the `wallpaper` theme");
            }
            if listen && dry_run {
                bail!("--listen and --dry-run cannot be combined");
            }
            manager.apply(&theme, variant, dry_run)?;
            if listen {
                watch::watch_wallpaper(&manager)?;
            }
            Ok(())
        }
        Commands::WatchDarkMode => watch::watch_dark_mode(&manager),
        Commands::Backgrounds { once } => background::run(manager.settings(), once),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("✗ {err:#}");
        std::process::exit(1);
    }
}
