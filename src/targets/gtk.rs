//! GTK 4 theme patchers.
//!
//! Rewrites the `@define-color` lines inside the shipped hypaurora.css and
//! the `alpha(...)` popover line inside the user's main gtk.css. Values are
//! replaced in place so any surrounding rules the user added survive.

use std::path::Path;

use anyhow::Result;

use crate::patch::{patch_file, PatchOutcome, PatchRule};
use crate::theme::Theme;

pub const THEME_CSS_PATH: &str = "gtk-4.0/themes/hypaurora.css";
pub const MAIN_CSS_PATH: &str = "gtk-4.0/gtk.css";

fn define_color_rule(name: &str, value: &str) -> Result<PatchRule> {
    PatchRule::new(
        &format!(r"(@define-color {name}\s+)[^;]+;"),
        format!("${{1}}{value};"),
    )
}

/// The full `@define-color` rule table for hypaurora.css.
fn theme_css_rules(theme: &Theme) -> Result<Vec<PatchRule>> {
    let base = &theme.colors.base;
    let semantic = &theme.colors.semantic;
    let ui = &theme.colors.ui;

    let mut rules = vec![
        // The alpha form must be rewritten before the bare-hex rule below
        // can safely match only plain values.
        PatchRule::new(
            r"(@define-color popover_bg_color\s+alpha\()[^)]+(\)[^;]*;)",
            format!("${{1}}{}, 0.6${{2}}", ui.popover),
        )?,
        PatchRule::new(
            r"(@define-color popover_bg_color\s+)#[0-9a-fA-F]{6};",
            format!("${{1}}{};", ui.popover),
        )?,
    ];

    let pairs: &[(&str, &str)] = &[
        ("destructive_bg_color", &semantic.error),
        ("destructive_fg_color", &base.background),
        ("destructive_color", &semantic.error),
        ("success_bg_color", &semantic.success),
        ("success_fg_color", &base.foreground),
        ("success_color", &semantic.success),
        ("warning_bg_color", &semantic.warning),
        ("warning_fg_color", &base.foreground),
        ("warning_color", &semantic.warning),
        ("error_bg_color", &semantic.error),
        ("error_fg_color", &base.foreground),
        ("error_color", &semantic.error),
        ("window_bg_color", &base.background),
        ("window_fg_color", &base.foreground),
        ("view_bg_color", &base.background),
        ("view_fg_color", &base.foreground),
        ("headerbar_bg_color", &ui.headerbar),
        ("headerbar_fg_color", &ui.headerbar_fg),
        ("headerbar_backdrop_color", &ui.headerbar),
        ("headerbar_shade_color", &ui.headerbar),
        ("card_bg_color", &ui.card),
        ("card_fg_color", &ui.card_fg),
        ("card_shade_color", &ui.card),
        ("popover_fg_color", &ui.popover_fg),
        ("sidebar_backdrop_color", &ui.sidebar),
        ("sidebar_bg_color", &ui.sidebar),
        ("sidebar_fg_color", &ui.sidebar_fg),
    ];
    for (name, value) in pairs {
        rules.push(define_color_rule(name, value)?);
    }

    Ok(rules)
}

pub fn apply_theme_css(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    patch_file(&base_dir.join(THEME_CSS_PATH), &theme_css_rules(theme)?, dry_run)
}

/// Point the main gtk.css popover background at the theme color, keeping the
/// translucent alpha form.
pub fn apply_main_css(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    let rules = [PatchRule::new(
        r"@define-color popover_bg_color alpha\([^)]+\);",
        format!(
            "@define-color popover_bg_color alpha({}, 0.6);",
            theme.colors.ui.popover
        ),
    )?];
    patch_file(&base_dir.join(MAIN_CSS_PATH), &rules, dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::test_support;
    use std::fs;

    const SAMPLE_CSS: &str = "\
@define-color window_bg_color #1e1e2e;
@define-color window_fg_color #cdd6f4;
@define-color headerbar_bg_color #11111b;
@define-color popover_bg_color #313244;
@define-color popover_bg_color alpha(#313244, 0.8);
@define-color popover_fg_color #cdd6f4;
@define-color error_color #f38ba8;
";

    #[test]
    fn test_theme_css_rewrites_values_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join(THEME_CSS_PATH);
        fs::create_dir_all(css.parent().unwrap()).unwrap();
        fs::write(&css, SAMPLE_CSS).unwrap();

        let theme = test_support::theme();
        assert_eq!(
            apply_theme_css(&theme, dir.path(), false).unwrap(),
            PatchOutcome::Patched
        );

        let patched = fs::read_to_string(&css).unwrap();
        assert!(patched.contains(&format!(
            "@define-color window_bg_color {};",
            theme.colors.base.background
        )));
        assert!(patched.contains(&format!(
            "@define-color popover_bg_color {};",
            theme.colors.ui.popover
        )));
        assert!(patched.contains(&format!(
            "@define-color popover_bg_color alpha({}, 0.6);",
            theme.colors.ui.popover
        )));
        assert!(patched.contains(&format!(
            "@define-color error_color {};",
            theme.colors.semantic.error
        )));
    }

    #[test]
    fn test_theme_css_second_apply_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join(THEME_CSS_PATH);
        fs::create_dir_all(css.parent().unwrap()).unwrap();
        fs::write(&css, SAMPLE_CSS).unwrap();

        let theme = test_support::theme();
        apply_theme_css(&theme, dir.path(), false).unwrap();
        assert_eq!(
            apply_theme_css(&theme, dir.path(), false).unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_main_css_alpha_line() {
        let dir = tempfile::tempdir().unwrap();
        let css = dir.path().join(MAIN_CSS_PATH);
        fs::create_dir_all(css.parent().unwrap()).unwrap();
        fs::write(&css, "@define-color popover_bg_color alpha(#000000, 0.5);\n").unwrap();

        let theme = test_support::theme();
        apply_main_css(&theme, dir.path(), false).unwrap();
        assert_eq!(
            fs::read_to_string(&css).unwrap(),
            format!(
                "@define-color popover_bg_color alpha({}, 0.6);\n",
                theme.colors.ui.popover
            )
        );
    }

    #[test]
    fn test_missing_files_skip() {
        let dir = tempfile::tempdir().unwrap();
        let theme = test_support::theme();
        assert_eq!(
            apply_theme_css(&theme, dir.path(), false).unwrap(),
            PatchOutcome::Missing
        );
        assert_eq!(
            apply_main_css(&theme, dir.path(), false).unwrap(),
            PatchOutcome::Missing
        );
    }
}
