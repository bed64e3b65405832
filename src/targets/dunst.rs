//! Dunst notification daemon patcher (INI-like dunstrc).
//!
//! Urgency sections keep their structure; only the quoted color values are
//! swapped. Backgrounds get an `80` alpha suffix for translucency.

use std::path::Path;

use anyhow::Result;

use crate::patch::{patch_file, PatchOutcome, PatchRule};
use crate::theme::Theme;

pub const RELATIVE_PATH: &str = "dunst/dunstrc";

// `[^\[]*?` scopes the match to one section: it cannot cross the next
// `[section]` header.
fn urgency_rule(section: &str, key: &str, value: &str) -> Result<PatchRule> {
    PatchRule::new(
        &format!(r#"(\[{section}\][^\[]*?{key}\s*=\s*)"[^"]+""#),
        format!("${{1}}\"{value}\""),
    )
}

fn rules(theme: &Theme) -> Result<Vec<PatchRule>> {
    let base = &theme.colors.base;
    let semantic = &theme.colors.semantic;

    let bg = format!("{}80", base.background);
    let mut rules = vec![
        PatchRule::new(
            r#"(frame_color\s*=\s*)"[^"]+""#,
            format!("${{1}}\"{}\"", semantic.border),
        )?,
        PatchRule::new(
            r#"(highlight\s*=\s*)"[^"]+""#,
            format!("${{1}}\"{}\"", semantic.warning),
        )?,
    ];

    for (section, frame) in [
        ("urgency_low", &semantic.success),
        ("urgency_normal", &semantic.warning),
        ("urgency_critical", &semantic.error),
    ] {
        rules.push(urgency_rule(section, "background", &bg)?);
        rules.push(urgency_rule(section, "foreground", &base.foreground)?);
        rules.push(urgency_rule(section, "frame_color", frame)?);
    }

    Ok(rules)
}

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    patch_file(&base_dir.join(RELATIVE_PATH), &rules(theme)?, dry_run)
}
