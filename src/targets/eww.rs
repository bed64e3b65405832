//! EWW widget theme generator (SCSS variables).

use std::path::Path;

use anyhow::Result;

use crate::patch::{write_generated, PatchOutcome};
use crate::theme::Theme;

pub const RELATIVE_PATH: &str = "eww/themes/hypaurora.scss";

pub fn render(theme: &Theme) -> String {
    let base = &theme.colors.base;
    let semantic = &theme.colors.semantic;
    let ui = &theme.colors.ui;
    let palette = &theme.colors.palette;

    let lines = [
        "// Background colors".to_string(),
        format!("$bg-base: {};          // Base background from theme", base.background),
        format!("$bg-popover: {};       // Popover background from theme", ui.popover),
        format!("$bg-active: {};        // Active/highlighted background", palette[10]),
        format!("$bg-hover: {};         // Hover state background", palette[8]),
        String::new(),
        "// Foreground/text colors".to_string(),
        format!("$fg-base: {};          // Base foreground text", base.foreground),
        format!("$fg-popover: {};       // Popover text from theme", ui.popover_fg),
        format!("$fg-sidebar: {};       // Sidebar text from theme", ui.sidebar_fg),
        format!("$fg-active: {};        // Text on active background", base.background),
        String::new(),
        "// Border colors".to_string(),
        format!("$border-base: {};      // Main border color", semantic.border),
        format!("$border-popup: {};     // Popup window borders", palette[6]),
        format!("$border-osd: {};       // On-screen display borders", palette[5]),
        String::new(),
        "// Accent and functional colors".to_string(),
        format!("$accent-color: {};     // General accent color", semantic.accent),
        format!("$accent-logo: {};      // Logo/brand color", palette[6]),
        format!("$accent-slider: {};    // Slider/progress color", semantic.warning),
    ];

    lines.join("\n")
}

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    write_generated(&base_dir.join(RELATIVE_PATH), &render(theme), dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::test_support;

    #[test]
    fn test_render_scss_variables() {
        let theme = test_support::theme();
        let out = render(&theme);
        assert!(out.contains(&format!("$bg-base: {}", theme.colors.base.background)));
        assert!(out.contains(&format!("$accent-color: {}", theme.colors.semantic.accent)));
        assert!(out.contains(&format!("$fg-sidebar: {}", theme.colors.ui.sidebar_fg)));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let theme = test_support::theme();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Patched);
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Unchanged);
    }
}
