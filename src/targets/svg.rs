//! SVG icon recolorer.
//!
//! Rewrites every `fill="#..."` attribute in the EWW icon set to the theme
//! foreground so the icons track the active palette.

use std::path::Path;

use anyhow::Result;

use crate::patch::{patch_file, PatchOutcome, PatchRule};
use crate::theme::Theme;

pub const ICONS_DIR: &str = "eww/icons";

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    let icons_dir = base_dir.join(ICONS_DIR);
    if !icons_dir.exists() {
        tracing::warn!("Icons directory not found, skipping: {}", icons_dir.display());
        return Ok(PatchOutcome::Missing);
    }

    let rules = [PatchRule::new(
        r##"fill="#[A-Fa-f0-9]{3,6}""##,
        format!("fill=\"{}\"", theme.colors.base.foreground),
    )?];

    let mut any_changed = false;
    let mut seen = false;
    for entry in std::fs::read_dir(&icons_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("svg") {
            continue;
        }
        seen = true;
        if patch_file(&path, &rules, dry_run)?.changed() {
            any_changed = true;
        }
    }

    Ok(if !seen {
        PatchOutcome::Unchanged
    } else if any_changed && dry_run {
        PatchOutcome::WouldPatch
    } else if any_changed {
        PatchOutcome::Patched
    } else {
        PatchOutcome::Unchanged
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::test_support;
    use std::fs;

    const SAMPLE_SVG: &str =
        r##"<svg><path fill="#FFF" d="M0 0"/><circle fill="#a6e3a1" r="4"/></svg>"##;

    #[test]
    fn test_all_fills_become_foreground() {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join(ICONS_DIR);
        fs::create_dir_all(&icons).unwrap();
        fs::write(icons.join("battery.svg"), SAMPLE_SVG).unwrap();
        fs::write(icons.join("wifi.svg"), SAMPLE_SVG).unwrap();

        let theme = test_support::theme();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Patched);

        let fg = &theme.colors.base.foreground;
        for name in ["battery.svg", "wifi.svg"] {
            let body = fs::read_to_string(icons.join(name)).unwrap();
            assert_eq!(body.matches(&format!("fill=\"{fg}\"")).count(), 2);
        }
    }

    #[test]
    fn test_non_svg_files_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join(ICONS_DIR);
        fs::create_dir_all(&icons).unwrap();
        fs::write(icons.join("readme.txt"), "fill=\"#fff\"").unwrap();

        let theme = test_support::theme();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Unchanged);
        assert_eq!(
            fs::read_to_string(icons.join("readme.txt")).unwrap(),
            "fill=\"#fff\""
        );
    }

    #[test]
    fn test_missing_directory_skips() {
        let dir = tempfile::tempdir().unwrap();
        let theme = test_support::theme();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Missing);
    }

    #[test]
    fn test_second_apply_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let icons = dir.path().join(ICONS_DIR);
        fs::create_dir_all(&icons).unwrap();
        fs::write(icons.join("icon.svg"), SAMPLE_SVG).unwrap();

        let theme = test_support::theme();
        apply(&theme, dir.path(), false).unwrap();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Unchanged);
    }
}
