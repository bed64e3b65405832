//! Orchestration of theme operations: list, preview, apply.
//!
//! An apply pass resolves the theme (stored document or a fresh synthesis
//! from the current wallpaper), then walks every application target
//! best-effort. One broken config never aborts the pass; each target reports
//! its outcome on stdout.

use anyhow::{Context, Result};

use crate::extract::{extract_dominant_colors, DEFAULT_COLOR_COUNT};
use crate::patch::PatchOutcome;
use crate::registry::ThemeRegistry;
use crate::settings::DesktopSettings;
use crate::targets;
use crate::theme::{Theme, Variant};

/// Pseudo theme name that triggers synthesis from the current wallpaper.
pub const WALLPAPER_THEME: &str = "wallpaper";

pub struct ThemeManager {
    registry: ThemeRegistry,
    settings: Box<dyn DesktopSettings>,
}

impl ThemeManager {
    pub fn new(registry: ThemeRegistry, settings: Box<dyn DesktopSettings>) -> Self {
        Self { registry, settings }
    }

    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &dyn DesktopSettings {
        self.settings.as_ref()
    }

    /// Explicit `--variant` wins; otherwise follow the desktop color scheme.
    pub fn resolve_variant(&self, requested: Option<Variant>) -> Variant {
        requested.unwrap_or(if self.settings.prefers_dark() {
            Variant::Dark
        } else {
            Variant::Light
        })
    }

    /// Load a stored theme, or synthesize one from the wallpaper when asked
    /// for the `wallpaper` pseudo theme.
    pub fn resolve_theme(&self, name: &str, variant: Variant, dry_run: bool) -> Result<Theme> {
        if name != WALLPAPER_THEME {
            let theme = self.registry.load_theme(name)?;
            theme
                .validate()
                .with_context(|| format!("Theme '{name}' failed validation"))?;
            return Ok(theme);
        }

        let wallpaper = self
            .settings
            .wallpaper_path(variant.is_dark())
            .context("No wallpaper is set; cannot synthesize a theme from it")?;
        tracing::info!("Synthesizing {variant} theme from {}", wallpaper.display());
        let colors = extract_dominant_colors(&wallpaper, DEFAULT_COLOR_COUNT)?;
        let theme = Theme::from_image_colors(WALLPAPER_THEME, variant, &colors);
        if !dry_run {
            let path = self.registry.save_theme(WALLPAPER_THEME, &theme)?;
            tracing::debug!("Saved synthesized theme to {}", path.display());
        }
        Ok(theme)
    }

    /// Apply a theme to every target, then switch the desktop color scheme
    /// and persist the current-theme pointer.
    pub fn apply(&self, name: &str, requested: Option<Variant>, dry_run: bool) -> Result<()> {
        // Seeding defaults is itself a write; a dry run must leave the whole
        // tree untouched.
        if !dry_run {
            self.registry.ensure_defaults()?;
        }
        let variant = self.resolve_variant(requested);
        let theme = self.resolve_theme(name, variant, dry_run)?;

        println!("Applying theme: {} ({})", theme.name, theme.variant);
        if dry_run {
            println!("Dry run: no files will be written.\n");
        }

        let base_dir = self.registry.base_dir();
        let steps: [(&str, fn(&Theme, &std::path::Path, bool) -> Result<PatchOutcome>); 9] = [
            ("Ghostty", targets::ghostty::apply),
            ("Rofi", targets::rofi::apply),
            ("EWW", targets::eww::apply),
            ("GTK theme CSS", targets::gtk::apply_theme_css),
            ("GTK main CSS", targets::gtk::apply_main_css),
            ("Hyprland", targets::hyprland::apply),
            ("Dunst", targets::dunst::apply),
            ("GNOME Shell", targets::gnome_shell::apply_scss),
            ("EWW icons", targets::svg::apply),
        ];

        let mut shell_changed = false;
        for (label, step) in steps {
            match step(&theme, base_dir, dry_run) {
                Ok(outcome) => {
                    report(label, outcome);
                    if label == "GNOME Shell" && outcome.changed() {
                        shell_changed = true;
                    }
                }
                Err(err) => println!("  ⚠ {label}: {err:#}"),
            }
        }

        if shell_changed {
            if let Err(err) = targets::gnome_shell::install(base_dir, dry_run) {
                println!("  ⚠ GNOME Shell install: {err:#}");
            }
        }

        if !dry_run {
            if let Err(err) = self.settings.set_color_scheme(theme.variant) {
                println!("  ⚠ Could not set color scheme: {err:#}");
            }
            // GTK only rereads gtk.css on an accessibility toggle.
            if let Err(err) = self.settings.pulse_high_contrast() {
                tracing::debug!("High-contrast pulse failed: {err:#}");
            }

            let mut config = self.registry.load_config()?;
            config.current_theme = name.to_string();
            self.registry.save_config(&config)?;
        }

        println!("\n✓ Theme applied. Reload eww/dunst manually if they are running.");
        Ok(())
    }

    /// Print a theme's full color table without touching anything.
    pub fn preview(&self, name: &str) -> Result<()> {
        self.registry.ensure_defaults()?;
        let theme = self.registry.load_theme(name)?;

        println!("{} by {} ({})\n", theme.name, theme.author, theme.variant);

        let base = &theme.colors.base;
        println!("Base:");
        for (label, value) in [
            ("background", &base.background),
            ("foreground", &base.foreground),
            ("cursor", &base.cursor),
            ("selection_bg", &base.selection_bg),
            ("selection_fg", &base.selection_fg),
        ] {
            println!("  {label:<14} {value}");
        }

        let semantic = &theme.colors.semantic;
        println!("Semantic:");
        for (label, value) in [
            ("accent", &semantic.accent),
            ("border", &semantic.border),
            ("success", &semantic.success),
            ("warning", &semantic.warning),
            ("error", &semantic.error),
        ] {
            println!("  {label:<14} {value}");
        }

        let ui = &theme.colors.ui;
        println!("UI:");
        for (label, value) in [
            ("card", &ui.card),
            ("popover", &ui.popover),
            ("sidebar", &ui.sidebar),
            ("headerbar", &ui.headerbar),
        ] {
            println!("  {label:<14} {value}");
        }

        println!("Palette:");
        for (i, color) in theme.colors.palette.iter().enumerate() {
            println!("  {i:>2}  {color}");
        }
        Ok(())
    }

    /// List stored themes, marking the active one.
    pub fn list(&self) -> Result<()> {
        self.registry.ensure_defaults()?;
        let config = self.registry.load_config()?;
        let names = self.registry.list_themes()?;
        if names.is_empty() {
            println!("No themes found in {}", self.registry.themes_dir().display());
            return Ok(());
        }
        for name in names {
            if name == config.current_theme {
                println!("→ {name}");
            } else {
                println!("  {name}");
            }
        }
        Ok(())
    }
}

fn report(label: &str, outcome: PatchOutcome) {
    match outcome {
        PatchOutcome::Patched => println!("  ✓ {label}"),
        PatchOutcome::Unchanged => println!("  ✓ {label} (already up to date)"),
        PatchOutcome::WouldPatch => println!("  ✓ {label} (would update)"),
        PatchOutcome::Missing => println!("  ⚠ {label} (config not found, skipped)"),
    }
}
