//! GNOME Shell theme patcher and installer.
//!
//! Rewrites the SCSS color override variables, then compiles the shell theme
//! with `sassc` and installs the CSS under `~/.local/share/themes/hypaurora`.
//! A missing `sassc` downgrades the install to a warning so the rest of the
//! apply pass still runs.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};

use crate::error::ThemeError;
use crate::patch::{patch_file, PatchOutcome, PatchRule};
use crate::theme::Theme;

pub const SCSS_PATH: &str = "gnome-shell-theme/gnome-shell-sass/_colors-override.scss";
const SHELL_SCSS: &str = "gnome-shell-theme/gnome-shell-hypaurora.scss";
const SHELL_CSS: &str = "gnome-shell-theme/gnome-shell.css";

fn scss_rule(name: &str, value: &str) -> Result<PatchRule> {
    PatchRule::new(
        &format!(r"(?m)^\s*\${name}\s*:\s*[^;]+;"),
        format!("$${name}: {value};"),
    )
}

fn rules(theme: &Theme) -> Result<Vec<PatchRule>> {
    let base = &theme.colors.base;
    let semantic = &theme.colors.semantic;
    let ui = &theme.colors.ui;

    let pairs: &[(&str, &str)] = &[
        ("_base_color_dark", &base.background),
        ("_base_color_light", &base.foreground),
        ("base_color", &base.background),
        ("bg_color", &base.background),
        ("fg_color", &base.foreground),
        ("osd_bg_color", &base.background),
        ("osd_fg_color", &base.foreground),
        ("panel_bg_color", &ui.headerbar),
        ("panel_fg_color", &base.foreground),
        ("card_bg_color", &ui.card),
        ("system_base_color", &base.background),
        ("system_fg_color", &base.foreground),
        ("success_color", &semantic.success),
        ("warning_color", &semantic.warning),
        ("error_color", &semantic.error),
        ("destructive_color", &semantic.error),
        ("selected_bg_color", &base.selection_bg),
        ("selected_fg_color", &base.selection_fg),
    ];
    pairs.iter().map(|(name, value)| scss_rule(name, value)).collect()
}

pub fn apply_scss(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    patch_file(&base_dir.join(SCSS_PATH), &rules(theme)?, dry_run)
}

fn sassc_available() -> Result<(), ThemeError> {
    match Command::new("sassc").arg("--version").output() {
        Ok(_) => Ok(()),
        Err(_) => Err(ThemeError::ExternalToolMissing("sassc")),
    }
}

/// Compile the shell SCSS and copy the result into the user theme directory.
pub fn install(base_dir: &Path, dry_run: bool) -> Result<()> {
    if let Err(err) = sassc_available() {
        println!("  ⚠ {err}. Install it to build the GNOME Shell theme.");
        return Ok(());
    }

    let scss = base_dir.join(SHELL_SCSS);
    let css = base_dir.join(SHELL_CSS);
    if !scss.exists() {
        tracing::warn!("GNOME Shell SCSS entry point missing: {}", scss.display());
        return Ok(());
    }
    if dry_run {
        println!("  [DRY RUN] Would compile {} and install the shell theme", scss.display());
        return Ok(());
    }

    let output = Command::new("sassc")
        .arg("-a")
        .arg(&scss)
        .arg(&css)
        .output()
        .context("Failed to run sassc")?;
    if !output.status.success() {
        bail!(
            "sassc failed to build GNOME Shell CSS: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    let install_dir = install_dir()?;
    fs::create_dir_all(&install_dir)
        .with_context(|| format!("Failed to create {}", install_dir.display()))?;
    fs::copy(&css, install_dir.join("gnome-shell.css"))
        .with_context(|| format!("Failed to install shell CSS into {}", install_dir.display()))?;
    Ok(())
}

fn install_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".local/share/themes/hypaurora/gnome-shell"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::test_support;

    const SAMPLE_SCSS: &str = "\
$_base_color_dark: #241f31;
$_base_color_light: #ffffff;
$base_color: #241f31;
$bg_color: #241f31;
$fg_color: #ffffff;
$panel_bg_color: #000000;
$selected_bg_color: #3584e4;
$variant: 'dark';
";

    #[test]
    fn test_scss_variables_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let scss = dir.path().join(SCSS_PATH);
        fs::create_dir_all(scss.parent().unwrap()).unwrap();
        fs::write(&scss, SAMPLE_SCSS).unwrap();

        let theme = test_support::theme();
        assert_eq!(apply_scss(&theme, dir.path(), false).unwrap(), PatchOutcome::Patched);

        let patched = fs::read_to_string(&scss).unwrap();
        let base = &theme.colors.base;
        assert!(patched.contains(&format!("$bg_color: {};", base.background)));
        assert!(patched.contains(&format!("$fg_color: {};", base.foreground)));
        assert!(patched.contains(&format!("$panel_bg_color: {};", theme.colors.ui.headerbar)));
        assert!(patched.contains(&format!("$selected_bg_color: {};", base.selection_bg)));
        // Variables outside the table are left alone.
        assert!(patched.contains("$variant: 'dark';"));
    }

    #[test]
    fn test_base_color_rule_does_not_hit_prefixed_variants() {
        let dir = tempfile::tempdir().unwrap();
        let scss = dir.path().join(SCSS_PATH);
        fs::create_dir_all(scss.parent().unwrap()).unwrap();
        fs::write(&scss, SAMPLE_SCSS).unwrap();

        let theme = test_support::theme();
        apply_scss(&theme, dir.path(), false).unwrap();
        let patched = fs::read_to_string(&scss).unwrap();
        assert!(patched.contains(&format!(
            "$_base_color_light: {};",
            theme.colors.base.foreground
        )));
    }

    #[test]
    fn test_second_apply_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let scss = dir.path().join(SCSS_PATH);
        fs::create_dir_all(scss.parent().unwrap()).unwrap();
        fs::write(&scss, SAMPLE_SCSS).unwrap();

        let theme = test_support::theme();
        apply_scss(&theme, dir.path(), false).unwrap();
        assert_eq!(apply_scss(&theme, dir.path(), false).unwrap(), PatchOutcome::Unchanged);
    }
}
