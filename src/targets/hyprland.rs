//! Hyprland border color patcher for `look.conf`.
//!
//! Border values are gradients built from palette slots, written in
//! Hyprland's `rgb(hex6)`/`rgba(hex8)` syntax.

use std::path::Path;

use anyhow::Result;

use crate::patch::{patch_file, PatchOutcome, PatchRule};
use crate::targets::bare;
use crate::theme::Theme;

pub const RELATIVE_PATH: &str = "hypr/hyprland/look.conf";

/// Gradient and groupbar values derived from the palette.
pub struct BorderColors {
    pub active_border: String,
    pub inactive_border: String,
    pub group_active: String,
    pub group_inactive: String,
    pub groupbar_active: String,
    pub groupbar_inactive: String,
}

pub fn border_colors(theme: &Theme) -> BorderColors {
    let p = &theme.colors.palette;
    BorderColors {
        active_border: format!("rgb({}) rgb({}) 25deg", bare(&p[4]), bare(&p[2])),
        inactive_border: format!("rgb({}) rgb({}) 25deg", bare(&p[8]), bare(&p[0])),
        group_active: format!("rgb({}) rgb({}) 25deg", bare(&p[1]), bare(&p[5])),
        group_inactive: format!("rgb({}) rgb({}) 25deg", bare(&p[3]), bare(&p[8])),
        groupbar_active: format!("rgb({})", bare(&p[1])),
        groupbar_inactive: format!("rgba({}80)", bare(&p[0])),
    }
}

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    let colors = border_colors(theme);
    let rules = [
        PatchRule::new(
            r"col\.active_border\s*=\s*[^\n]+",
            format!("col.active_border = {}", colors.active_border),
        )?,
        PatchRule::new(
            r"col\.inactive_border\s*=\s*[^\n]+",
            format!("col.inactive_border = {}", colors.inactive_border),
        )?,
        PatchRule::new(
            r"col\.border_active\s*=\s*[^\n]+",
            format!("col.border_active = {}", colors.group_active),
        )?,
        PatchRule::new(
            r"col\.border_inactive\s*=\s*[^\n]+",
            format!("col.border_inactive = {}", colors.group_inactive),
        )?,
        // The groupbar block shares key names with the general block, so the
        // patterns anchor on the enclosing `groupbar {` and keep it captured.
        PatchRule::new(
            r"(groupbar\s*\{[^}]*col\.active\s*=\s*)[^\n]+",
            format!("${{1}}{}", colors.groupbar_active),
        )?,
        PatchRule::new(
            r"(groupbar\s*\{[^}]*col\.inactive\s*=\s*)[^\n]+",
            format!("${{1}}{}", colors.groupbar_inactive),
        )?,
    ];
    patch_file(&base_dir.join(RELATIVE_PATH), &rules, dry_run)
}
