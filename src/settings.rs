//! Desktop settings client.
//!
//! One injected `DesktopSettings` implementation serves the whole process:
//! the real client shells out to `gsettings`, the in-memory one backs tests
//! and non-GNOME sessions. Helpers normalize the wallpaper URI shapes GNOME
//! stores (`file://` prefixed, quote wrapped, or bare paths).

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Command;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::error::ThemeError;
use crate::theme::Variant;

pub const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
pub const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";
pub const A11Y_SCHEMA: &str = "org.gnome.desktop.a11y.interface";

pub const PICTURE_URI: &str = "picture-uri";
pub const PICTURE_URI_DARK: &str = "picture-uri-dark";
pub const COLOR_SCHEME: &str = "color-scheme";
pub const HIGH_CONTRAST: &str = "high-contrast";

/// Injected settings backend, constructed once and passed by reference.
pub trait DesktopSettings: Send + Sync {
    fn get(&self, schema: &str, key: &str) -> Result<String>;
    fn set(&self, schema: &str, key: &str, value: &str) -> Result<()>;
    fn set_flag(&self, schema: &str, key: &str, value: bool) -> Result<()>;

    /// Whether the desktop currently prefers dark mode. Defaults to dark when
    /// the setting cannot be read.
    fn prefers_dark(&self) -> bool {
        match self.get(INTERFACE_SCHEMA, COLOR_SCHEME) {
            Ok(scheme) => scheme == "prefer-dark",
            Err(_) => true,
        }
    }

    /// Current wallpaper path for the given mode, or `None` when unset.
    fn wallpaper_path(&self, dark: bool) -> Option<PathBuf> {
        let key = if dark { PICTURE_URI_DARK } else { PICTURE_URI };
        let uri = self.get(BACKGROUND_SCHEMA, key).ok()?;
        normalize_wallpaper_uri(&uri).map(PathBuf::from)
    }

    fn set_color_scheme(&self, variant: Variant) -> Result<()> {
        self.set(INTERFACE_SCHEMA, COLOR_SCHEME, variant.color_scheme())
    }

    /// Toggle high-contrast on and back off to force GTK to reload its CSS.
    fn pulse_high_contrast(&self) -> Result<()> {
        self.set_flag(A11Y_SCHEMA, HIGH_CONTRAST, true)?;
        std::thread::sleep(Duration::from_millis(100));
        self.set_flag(A11Y_SCHEMA, HIGH_CONTRAST, false)
    }
}

/// Strip the `file://` prefix and quote wrapping GNOME variously applies.
/// Empty values and the literal `none` mean "no wallpaper".
pub fn normalize_wallpaper_uri(uri: &str) -> Option<String> {
    let trimmed = uri.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('\'') && trimmed.ends_with('\'') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    let path = unquoted.strip_prefix("file://").unwrap_or(unquoted);
    if path.is_empty() || path == "none" {
        None
    } else {
        Some(path.to_string())
    }
}

/// Settings client backed by the `gsettings` CLI.
pub struct GsettingsClient;

impl GsettingsClient {
    pub fn new() -> Result<Self, ThemeError> {
        match Command::new("gsettings").arg("--version").output() {
            Ok(_) => Ok(Self),
            Err(_) => Err(ThemeError::ExternalToolMissing("gsettings")),
        }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("gsettings")
            .args(args)
            .output()
            .context("Failed to run gsettings")?;
        if !output.status.success() {
            bail!(
                "gsettings {:?} failed: {}",
                args,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl DesktopSettings for GsettingsClient {
    fn get(&self, schema: &str, key: &str) -> Result<String> {
        let raw = self.run(&["get", schema, key])?;
        // gsettings prints GVariant strings quoted.
        let value = raw
            .strip_prefix('\'')
            .and_then(|s| s.strip_suffix('\''))
            .unwrap_or(&raw);
        Ok(value.to_string())
    }

    fn set(&self, schema: &str, key: &str, value: &str) -> Result<()> {
        self.run(&["set", schema, key, value]).map(|_| ())
    }

    fn set_flag(&self, schema: &str, key: &str, value: bool) -> Result<()> {
        let value = if value { "true" } else { "false" };
        self.run(&["set", schema, key, value]).map(|_| ())
    }
}

/// In-memory settings store for tests and headless sessions.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<(String, String), String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str, &str)]) -> Self {
        let settings = Self::new();
        for (schema, key, value) in entries {
            settings.set(schema, key, value).expect("memory set");
        }
        settings
    }
}

impl DesktopSettings for MemorySettings {
    fn get(&self, schema: &str, key: &str) -> Result<String> {
        let values = self.values.lock().expect("settings lock");
        values
            .get(&(schema.to_string(), key.to_string()))
            .cloned()
            .with_context(|| format!("No value for {schema} {key}"))
    }

    fn set(&self, schema: &str, key: &str, value: &str) -> Result<()> {
        let mut values = self.values.lock().expect("settings lock");
        values.insert((schema.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn set_flag(&self, schema: &str, key: &str, value: bool) -> Result<()> {
        self.set(schema, key, if value { "true" } else { "false" })
    }
}
