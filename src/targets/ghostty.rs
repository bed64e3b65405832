//! Ghostty terminal theme generator (`key = value` format).

use std::path::Path;

use anyhow::Result;

use crate::patch::{write_generated, PatchOutcome};
use crate::theme::Theme;

pub const RELATIVE_PATH: &str = "ghostty/themes/hypaurora";

pub fn render(theme: &Theme) -> String {
    let base = &theme.colors.base;
    let mut lines: Vec<String> = theme
        .colors
        .palette
        .iter()
        .enumerate()
        .map(|(i, color)| format!("palette = {i}={color}"))
        .collect();

    lines.push(format!("background = {}", base.background));
    lines.push(format!("foreground = {}", base.foreground));
    lines.push(format!("cursor-color = {}", base.cursor));
    lines.push(format!("cursor-text = {}", base.cursor_text));
    lines.push(format!("selection-background = {}", base.selection_bg));
    lines.push(format!("selection-foreground = {}", base.selection_fg));

    lines.join("\n")
}

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    write_generated(&base_dir.join(RELATIVE_PATH), &render(theme), dry_run)
}
