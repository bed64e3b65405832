//! Theme registry: JSON theme documents on disk plus the current-theme
//! config pointer.
//!
//! The registry lives under a single base directory (`--base-dir`,
//! `HYPAURORA_DIR`, or `~/Documents/hypaurora`) alongside the application
//! config trees the patchers edit. Two default themes are embedded in the
//! binary and seeded on first use.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::ThemeError;
use crate::theme::Theme;

// Embedded default themes, written out when the themes directory is missing.
const DEFAULT_DARK_NAME: &str = "bearded_monokai_stone";
const DEFAULT_DARK: &str = include_str!("../defaults/themes/bearded_monokai_stone.json");
const DEFAULT_LIGHT_NAME: &str = "bearded_milkshake_blueberry";
const DEFAULT_LIGHT: &str = include_str!("../defaults/themes/bearded_milkshake_blueberry.json");

/// Persisted pointer to the active theme, mutated only by apply operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    pub current_theme: String,
    #[serde(default = "default_dark_theme")]
    pub preferred_dark_theme: String,
    #[serde(default = "default_light_theme")]
    pub preferred_light_theme: String,
}

fn default_dark_theme() -> String {
    DEFAULT_DARK_NAME.to_string()
}

fn default_light_theme() -> String {
    DEFAULT_LIGHT_NAME.to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            current_theme: DEFAULT_DARK_NAME.to_string(),
            preferred_dark_theme: default_dark_theme(),
            preferred_light_theme: default_light_theme(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    base_dir: PathBuf,
}

impl ThemeRegistry {
    pub fn new(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Resolve the registry base directory: explicit flag, then the
    /// `HYPAURORA_DIR` environment variable, then `~/Documents/hypaurora`.
    pub fn resolve_base_dir(override_dir: Option<PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = override_dir {
            return Ok(dir);
        }
        if let Ok(custom) = std::env::var("HYPAURORA_DIR") {
            return Ok(PathBuf::from(custom));
        }
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join("Documents/hypaurora"))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn themes_dir(&self) -> PathBuf {
        self.base_dir.join("themes")
    }

    fn config_file(&self) -> PathBuf {
        self.base_dir.join("theme-config.json")
    }

    fn theme_file(&self, name: &str) -> PathBuf {
        self.themes_dir().join(format!("{name}.json"))
    }

    /// Write the embedded default themes if the themes directory has none.
    pub fn ensure_defaults(&self) -> Result<()> {
        let dir = self.themes_dir();
        if dir.exists() && dir.read_dir()?.next().is_some() {
            return Ok(());
        }
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create themes directory {}", dir.display()))?;
        for (name, body) in [(DEFAULT_DARK_NAME, DEFAULT_DARK), (DEFAULT_LIGHT_NAME, DEFAULT_LIGHT)] {
            let path = self.theme_file(name);
            fs::write(&path, body)
                .with_context(|| format!("Failed to seed default theme {}", path.display()))?;
            tracing::info!("Seeded default theme {}", path.display());
        }
        Ok(())
    }

    pub fn load_theme(&self, name: &str) -> Result<Theme> {
        let path = self.theme_file(name);
        if !path.exists() {
            return Err(ThemeError::ThemeNotFound {
                name: name.to_string(),
                path,
            }
            .into());
        }
        let body = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read theme {}", path.display()))?;
        let theme: Theme = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse theme {}", path.display()))?;
        Ok(theme)
    }

    pub fn save_theme(&self, name: &str, theme: &Theme) -> Result<PathBuf> {
        fs::create_dir_all(self.themes_dir())?;
        let path = self.theme_file(name);
        let body = serde_json::to_string_pretty(theme)?;
        fs::write(&path, body)
            .with_context(|| format!("Failed to write theme {}", path.display()))?;
        Ok(path)
    }

    pub fn load_config(&self) -> Result<ThemeConfig> {
        let path = self.config_file();
        if !path.exists() {
            return Ok(ThemeConfig::default());
        }
        let body = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    pub fn save_config(&self, config: &ThemeConfig) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        let body = serde_json::to_string_pretty(config)?;
        fs::write(self.config_file(), body)
            .with_context(|| format!("Failed to write {}", self.config_file().display()))?;
        Ok(())
    }

    /// Sorted stems of every `themes/*.json` file.
    pub fn list_themes(&self) -> Result<Vec<String>> {
        let dir = self.themes_dir();
        let mut names = Vec::new();
        if dir.exists() {
            for entry in fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().and_then(|e| e.to_str()) == Some("json") {
                    if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                        names.push(stem.to_string());
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{Variant, PALETTE_SIZE};

    fn registry() -> (tempfile::TempDir, ThemeRegistry) {
        let dir = tempfile::tempdir().unwrap();
        let registry = ThemeRegistry::new(dir.path().to_path_buf());
        (dir, registry)
    }

    #[test]
    fn test_ensure_defaults_seeds_both_variants() {
        let (_dir, registry) = registry();
        registry.ensure_defaults().unwrap();
        let names = registry.list_themes().unwrap();
        assert_eq!(
            names,
            vec![DEFAULT_LIGHT_NAME.to_string(), DEFAULT_DARK_NAME.to_string()]
        );

        let dark = registry.load_theme(DEFAULT_DARK_NAME).unwrap();
        assert_eq!(dark.variant, Variant::Dark);
        dark.validate().unwrap();

        let light = registry.load_theme(DEFAULT_LIGHT_NAME).unwrap();
        assert_eq!(light.variant, Variant::Light);
        light.validate().unwrap();
    }

    #[test]
    fn test_ensure_defaults_does_not_clobber_existing_themes() {
        let (_dir, registry) = registry();
        fs::create_dir_all(registry.themes_dir()).unwrap();
        fs::write(registry.themes_dir().join("mine.json"), "{}").unwrap();
        registry.ensure_defaults().unwrap();
        assert_eq!(registry.list_themes().unwrap(), vec!["mine".to_string()]);
    }

    #[test]
    fn test_save_and_load_theme_round_trip() {
        let (_dir, registry) = registry();
        registry.ensure_defaults().unwrap();
        let mut theme = registry.load_theme(DEFAULT_DARK_NAME).unwrap();
        theme.name = "Copy".to_string();
        registry.save_theme("copy", &theme).unwrap();
        let back = registry.load_theme("copy").unwrap();
        assert_eq!(back.name, "Copy");
        assert_eq!(back.colors.palette.len(), PALETTE_SIZE);
    }

    #[test]
    fn test_missing_theme_is_typed_not_found() {
        let (_dir, registry) = registry();
        let err = registry.load_theme("nope").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ThemeError>(),
            Some(ThemeError::ThemeNotFound { .. })
        ));
    }

    #[test]
    fn test_config_defaults_when_missing() {
        let (_dir, registry) = registry();
        let config = registry.load_config().unwrap();
        assert_eq!(config.current_theme, DEFAULT_DARK_NAME);
        assert_eq!(config.preferred_light_theme, DEFAULT_LIGHT_NAME);
    }

    #[test]
    fn test_config_round_trip() {
        let (_dir, registry) = registry();
        let mut config = registry.load_config().unwrap();
        config.current_theme = "wallpaper".to_string();
        registry.save_config(&config).unwrap();
        assert_eq!(registry.load_config().unwrap().current_theme, "wallpaper");
    }
}
