//! Theme document model and the wallpaper synthesizer.
//!
//! A theme is a JSON document of named color roles (base, 16-slot palette,
//! semantic, UI surfaces). Themes either ship as static JSON in the registry
//! or get synthesized here from the dominant colors of a wallpaper.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::color::{contrast_ratio, ensure_contrast, Rgb};

/// Minimum foreground/background contrast for a finalized theme.
pub const FG_BG_CONTRAST: f64 = 7.0;

pub const PALETTE_SIZE: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[clap(rename_all = "lowercase")]
pub enum Variant {
    Dark,
    Light,
}

impl Variant {
    pub fn is_dark(self) -> bool {
        matches!(self, Variant::Dark)
    }

    /// GNOME `color-scheme` value that selects this variant.
    pub fn color_scheme(self) -> &'static str {
        match self {
            Variant::Dark => "prefer-dark",
            Variant::Light => "default",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Variant::Dark => write!(f, "dark"),
            Variant::Light => write!(f, "light"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub author: String,
    pub variant: Variant,
    pub colors: ThemeColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeColors {
    pub base: BaseColors,
    pub palette: Vec<String>,
    pub semantic: SemanticColors,
    pub ui: UiColors,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseColors {
    pub background: String,
    pub foreground: String,
    pub cursor: String,
    pub cursor_text: String,
    pub selection_bg: String,
    pub selection_fg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticColors {
    pub accent: String,
    pub accent_fg: String,
    pub border: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiColors {
    pub card: String,
    pub card_fg: String,
    pub popover: String,
    pub popover_fg: String,
    pub sidebar: String,
    pub sidebar_fg: String,
    pub headerbar: String,
    pub headerbar_fg: String,
}

impl Theme {
    /// Check the document invariants: exactly 16 palette slots, every color a
    /// parseable hex string, foreground legible against background.
    pub fn validate(&self) -> Result<()> {
        if self.colors.palette.len() != PALETTE_SIZE {
            bail!(
                "palette must have exactly {} entries, found {}",
                PALETTE_SIZE,
                self.colors.palette.len()
            );
        }

        for hex in self.all_colors() {
            Rgb::from_hex(hex)?;
        }

        let bg = Rgb::from_hex(&self.colors.base.background)?;
        let fg = Rgb::from_hex(&self.colors.base.foreground)?;
        let ratio = contrast_ratio(fg, bg);
        if ratio < FG_BG_CONTRAST {
            bail!(
                "foreground/background contrast {ratio:.2} is below the required {FG_BG_CONTRAST:.1}"
            );
        }

        Ok(())
    }

    fn all_colors(&self) -> impl Iterator<Item = &String> {
        let base = &self.colors.base;
        let semantic = &self.colors.semantic;
        let ui = &self.colors.ui;
        [
            &base.background,
            &base.foreground,
            &base.cursor,
            &base.cursor_text,
            &base.selection_bg,
            &base.selection_fg,
            &semantic.accent,
            &semantic.accent_fg,
            &semantic.border,
            &semantic.success,
            &semantic.warning,
            &semantic.error,
            &ui.card,
            &ui.card_fg,
            &ui.popover,
            &ui.popover_fg,
            &ui.sidebar,
            &ui.sidebar_fg,
            &ui.headerbar,
            &ui.headerbar_fg,
        ]
        .into_iter()
        .chain(self.colors.palette.iter())
    }

    /// Synthesize a theme from extracted wallpaper colors.
    ///
    /// If fewer colors than expected are available the index slices narrow
    /// silently; the result is degraded but still a valid document.
    pub fn from_image_colors(theme_name: &str, variant: Variant, colors: &[Rgb]) -> Self {
        let mut sorted = colors.to_vec();
        sorted.sort_by(|a, b| {
            a.luminance()
                .partial_cmp(&b.luminance())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        if sorted.is_empty() {
            sorted.push(Rgb::new(0, 0, 0));
        }

        let is_dark = variant.is_dark();
        let (mut background, foreground_seed) = if is_dark {
            (sorted[0], *sorted.last().unwrap())
        } else {
            (*sorted.last().unwrap(), sorted[0])
        };

        // Force the background into its luminance class. One rescale usually
        // suffices; flat inputs need a few more before they converge.
        for _ in 0..8 {
            if is_dark && background.luminance() > 0.1 {
                background = background.scale_brightness(0.5);
            } else if !is_dark && background.luminance() < 0.9 {
                background = background.scale_brightness(1.3);
            } else {
                break;
            }
        }
        if is_dark && background.luminance() > 0.1 {
            background = Rgb::new(0, 0, 0);
        } else if !is_dark && background.luminance() < 0.9 {
            background = Rgb::new(255, 255, 255);
        }

        let foreground = ensure_contrast(foreground_seed, background, FG_BG_CONTRAST);

        // Middle luminance slice for accents; narrower when extraction came
        // back short.
        let accents: Vec<Rgb> = if sorted.len() > 9 {
            sorted[3..9].to_vec()
        } else {
            let lo = 2.min(sorted.len().saturating_sub(1));
            let hi = 6.min(sorted.len());
            sorted[lo..hi].to_vec()
        };

        let mut ansi: Vec<Rgb> = Vec::with_capacity(PALETTE_SIZE);
        ansi.push(background);
        if sorted.len() > 1 {
            ansi.push(sorted[1]);
        }
        ansi.extend(accents.iter().take(6));
        ansi.truncate(8);
        let brights: Vec<Rgb> = ansi.iter().map(|c| c.scale_brightness(1.3)).collect();
        ansi.extend(brights);
        while ansi.len() < PALETTE_SIZE {
            ansi.push(foreground);
        }

        let accent = accents.first().copied().unwrap_or(sorted[sorted.len() / 2]);
        let cursor = accents.get(1).copied().unwrap_or(accent);
        let cursor = ensure_contrast(cursor, background, 3.0);

        let selection_bg = accent.scale_brightness(if is_dark { 0.4 } else { 1.6 });

        let card = background.scale_brightness(if is_dark { 0.9 } else { 1.02 });
        let popover = background.scale_brightness(if is_dark { 1.1 } else { 0.98 });
        let headerbar = background.scale_brightness(if is_dark { 0.7 } else { 1.05 });

        let sidebar_fg = foreground.scale_brightness(0.7);
        let headerbar_fg = foreground.scale_brightness(0.6);

        let mut title: Vec<char> = theme_name.chars().collect();
        if let Some(first) = title.first_mut() {
            *first = first.to_ascii_uppercase();
        }
        let title: String = title.into_iter().collect();

        Theme {
            name: format!("{title} (Auto-generated)"),
            author: "Hypaurora Theme Manager".to_string(),
            variant,
            colors: ThemeColors {
                base: BaseColors {
                    background: background.to_hex(),
                    foreground: foreground.to_hex(),
                    cursor: cursor.to_hex(),
                    cursor_text: background.to_hex(),
                    selection_bg: selection_bg.to_hex(),
                    selection_fg: foreground.to_hex(),
                },
                semantic: SemanticColors {
                    accent: accent.to_hex(),
                    accent_fg: ensure_contrast(foreground, accent, 4.5).to_hex(),
                    border: ensure_contrast(accent, background, 3.0).to_hex(),
                    success: ansi[2].to_hex(),
                    warning: ansi[3].to_hex(),
                    error: ansi[1].to_hex(),
                },
                ui: UiColors {
                    card: card.to_hex(),
                    card_fg: foreground.to_hex(),
                    popover: popover.to_hex(),
                    popover_fg: foreground.to_hex(),
                    sidebar: card.to_hex(),
                    sidebar_fg: sidebar_fg.to_hex(),
                    headerbar: headerbar.to_hex(),
                    headerbar_fg: headerbar_fg.to_hex(),
                },
                palette: ansi.into_iter().map(Rgb::to_hex).collect(),
            },
        }
    }
}
