//! Rofi launcher theme generator (`.rasi` format).

use std::path::Path;

use anyhow::Result;

use crate::patch::{write_generated, PatchOutcome};
use crate::theme::Theme;

pub const RELATIVE_PATH: &str = "rofi/themes/hypaurora.rasi";

pub fn render(theme: &Theme) -> String {
    let base = &theme.colors.base;
    let semantic = &theme.colors.semantic;
    let palette = &theme.colors.palette;

    format!(
        r#"configuration {{
    show-icons: true;
    icon-theme: "Reversal-orange-dark";
}}

* {{
    bg0:    {bg}D4;
    bg1:    {p8}D4;
    bg2:    {p0}D4;
    bg3:    {p8}D4;
    fg0:    {fg};
    fg1:    {fg}E6;
    fg2:    {fg}CC;
    fg3:    {fg}B3;
    border: {p13};
    accent: {accent};

    font:   "Geist Medium 11";

    background-color:   transparent;
    text-color:         @fg0;

    margin:     0px;
    padding:    0px;
    spacing:    0px;
}}

window {{
    location:       north;
    y-offset:       calc(50% - 176px);
    width:          480;
    height:         416;

    border-radius:  8px;
    border-color: @accent;
    border: 2px;

    background-color:   @bg0;
}}

mainbox {{
    padding:    12px;
}}

inputbar {{
    background-color:   @bg1;
    border-color:       @border;

    border:         2px;
    border-radius:  6px;

    padding:    8px 16px;
    spacing:    8px;
    children:   [ prompt, entry ];
}}

prompt {{
    text-color: @accent;
}}

entry {{
    placeholder:        "Search";
    placeholder-color:  @fg3;
}}

message {{
    margin:             12px 0 0;
    border-radius:      16px;
    border-color:       @bg2;
    background-color:   @bg2;
}}

textbox {{
    padding:    8px 24px;
}}

listview {{
    background-color:   transparent;

    margin:     12px 0 0;
    lines:      8;
    columns:    1;

    fixed-height: false;
}}

element {{
    padding:        8px 16px;
    spacing:        8px;
    border-radius:  6px;
}}

element normal active {{
    text-color: @bg3;
}}

element alternate active {{
    text-color: @bg3;
}}

element selected normal, element selected active {{
    background-color:       @bg2;
}}

element-icon {{
    size:           2em;
    vertical-align: 0.5;
}}

element-text {{
    text-color: inherit;
    margin: 9px 0 0;
}}"#,
        bg = base.background,
        fg = base.foreground,
        p0 = palette[0],
        p8 = palette[8],
        p13 = palette[13],
        accent = semantic.accent,
    )
}

pub fn apply(theme: &Theme, base_dir: &Path, dry_run: bool) -> Result<PatchOutcome> {
    write_generated(&base_dir.join(RELATIVE_PATH), &render(theme), dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::test_support;

    #[test]
    fn test_render_alpha_suffixed_backgrounds() {
        let theme = test_support::theme();
        let out = render(&theme);
        assert!(out.contains(&format!("bg0:    {}D4;", theme.colors.base.background)));
        assert!(out.contains(&format!("fg3:    {}B3;", theme.colors.base.foreground)));
        assert!(out.contains(&format!("accent: {};", theme.colors.semantic.accent)));
        assert!(out.contains(&format!("border: {};", theme.colors.palette[13])));
    }

    #[test]
    fn test_apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let theme = test_support::theme();
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Patched);
        assert_eq!(apply(&theme, dir.path(), false).unwrap(), PatchOutcome::Unchanged);
    }
}
