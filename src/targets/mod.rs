//! Per-application theme targets.
//!
//! Generators build a complete config file from the theme; in-place patchers
//! rewrite color lines inside configs the user otherwise owns. All of them
//! resolve their paths relative to the registry base directory and report a
//! `PatchOutcome` so the apply pass can stay best-effort.

pub mod dunst;
pub mod eww;
pub mod ghostty;
pub mod gnome_shell;
pub mod gtk;
pub mod hyprland;
pub mod rofi;
pub mod svg;

/// Hex color without the leading `#`, for `rgb(...)`-style config syntaxes.
pub(crate) fn bare(hex: &str) -> &str {
    hex.trim_start_matches('#')
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::color::Rgb;
    use crate::theme::{Theme, Variant};

    /// A deterministic dark theme for target tests.
    pub fn theme() -> Theme {
        let colors: Vec<Rgb> = [
            "#101010", "#f5f5f5", "#ff5555", "#50fa7b", "#f1fa8c", "#bd93f9", "#ff79c6",
            "#8be9fd", "#6272a4", "#44475a", "#282a36", "#ffb86c",
        ]
        .iter()
        .map(|h| Rgb::from_hex(h).unwrap())
        .collect();
        Theme::from_image_colors("wallpaper", Variant::Dark, &colors)
    }
}
