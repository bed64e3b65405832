//! Long-running watch loops.
//!
//! `watch_wallpaper` re-synthesizes the wallpaper theme whenever the
//! wallpaper file settles on new content; `watch_dark_mode` follows the
//! desktop color scheme and swaps between the preferred dark and light
//! themes. Both loops poll on a fixed cadence; the wallpaper loop also takes
//! filesystem events so it reacts faster than the poll interval.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{recommended_watcher, RecursiveMode, Watcher};

use crate::manager::{ThemeManager, WALLPAPER_THEME};
use crate::theme::Variant;

pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Consecutive identical observations before a change counts as settled.
/// Wallpaper files are written incrementally by image tools, so acting on
/// the first event would read a half-written file.
pub const STABILITY_CHECKS: u32 = 3;

/// Hash of a file's content, `None` while the file is missing or unreadable.
pub(crate) fn content_fingerprint(path: &Path) -> Option<u64> {
    let bytes = std::fs::read(path).ok()?;
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    bytes.hash(&mut hasher);
    Some(hasher.finish())
}

/// Debounces a stream of content fingerprints sampled on the poll cadence.
///
/// A new fingerprint must repeat for `required` consecutive observations
/// before it is emitted; any flicker during that window restarts the count.
#[derive(Debug)]
pub struct Debouncer {
    required: u32,
    baseline: Option<u64>,
    pending: Option<(u64, u32)>,
}

impl Debouncer {
    pub fn new(required: u32) -> Self {
        Self {
            required,
            baseline: None,
            pending: None,
        }
    }

    /// Record the baseline without emitting, for startup state.
    pub fn prime(&mut self, fingerprint: Option<u64>) {
        self.baseline = fingerprint;
        self.pending = None;
    }

    pub fn observe(&mut self, fingerprint: u64) -> Option<u64> {
        if self.pending.is_none() && self.baseline == Some(fingerprint) {
            return None;
        }
        match self.pending {
            Some((pending, count)) if pending == fingerprint => {
                let count = count + 1;
                if count >= self.required {
                    self.baseline = Some(fingerprint);
                    self.pending = None;
                    Some(fingerprint)
                } else {
                    self.pending = Some((fingerprint, count));
                    None
                }
            }
            _ => {
                // Content flickered back to the baseline: the change undid
                // itself before settling.
                if self.baseline == Some(fingerprint) {
                    self.pending = None;
                } else {
                    self.pending = Some((fingerprint, 1));
                }
                None
            }
        }
    }
}

/// Last wallpaper content a theme was synthesized from, per variant.
#[derive(Debug, Default)]
struct AppliedFingerprints {
    dark: Option<u64>,
    light: Option<u64>,
}

impl AppliedFingerprints {
    fn get(&self, variant: Variant) -> Option<u64> {
        match variant {
            Variant::Dark => self.dark,
            Variant::Light => self.light,
        }
    }

    fn set(&mut self, variant: Variant, fingerprint: u64) {
        match variant {
            Variant::Dark => self.dark = Some(fingerprint),
            Variant::Light => self.light = Some(fingerprint),
        }
    }
}

fn timestamp() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

/// Re-synthesize the wallpaper theme whenever the wallpaper image changes.
pub fn watch_wallpaper(manager: &ThemeManager) -> Result<()> {
    let settings = manager.settings();
    let initial_variant = manager.resolve_variant(None);
    let initial = settings
        .wallpaper_path(initial_variant.is_dark())
        .context("No wallpaper is set; nothing to watch")?;

    let (tx, rx) = mpsc::channel::<notify::Result<notify::Event>>();
    let mut watcher = recommended_watcher(move |event: notify::Result<notify::Event>| {
        let _ = tx.send(event);
    })?;

    let mut watched_dir: Option<PathBuf> = None;
    let mut debouncer = Debouncer::new(STABILITY_CHECKS);
    debouncer.prime(content_fingerprint(&initial));
    let mut applied = AppliedFingerprints::default();
    if let Some(fp) = content_fingerprint(&initial) {
        applied.set(initial_variant, fp);
    }

    println!(
        "[{}] Watching wallpaper {} (poll every {}s)",
        timestamp(),
        initial.display(),
        POLL_INTERVAL.as_secs()
    );

    loop {
        let variant = manager.resolve_variant(None);
        if let Some(path) = settings.wallpaper_path(variant.is_dark()) {
            // Watch the containing directory; editors replace files rather
            // than writing in place.
            if let Some(dir) = path.parent() {
                if watched_dir.as_deref() != Some(dir) && dir.exists() {
                    if let Some(old) = watched_dir.take() {
                        let _ = watcher.unwatch(&old);
                    }
                    watcher.watch(dir, RecursiveMode::NonRecursive)?;
                    watched_dir = Some(dir.to_path_buf());
                }
            }

            if let Some(fingerprint) = content_fingerprint(&path) {
                if let Some(settled) = debouncer.observe(fingerprint) {
                    if applied.get(variant) == Some(settled) {
                        tracing::debug!("Wallpaper settled on already-applied content");
                    } else {
                        println!("[{}] Wallpaper changed, regenerating theme", timestamp());
                        match manager.apply(WALLPAPER_THEME, Some(variant), false) {
                            Ok(()) => applied.set(variant, settled),
                            Err(err) => {
                                println!("[{}] ✗ Theme regeneration failed: {err:#}", timestamp())
                            }
                        }
                    }
                }
            }
        }

        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(_) | Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    Ok(())
}

/// Theme the config prefers for the given color scheme.
fn preferred_theme(config: &crate::registry::ThemeConfig, dark: bool) -> &str {
    if dark {
        &config.preferred_dark_theme
    } else {
        &config.preferred_light_theme
    }
}

/// Follow the desktop color scheme and apply the preferred theme on flips.
pub fn watch_dark_mode(manager: &ThemeManager) -> Result<()> {
    manager.registry().ensure_defaults()?;
    let mut last_dark = manager.settings().prefers_dark();
    println!(
        "[{}] Watching color scheme (currently {})",
        timestamp(),
        if last_dark { "dark" } else { "light" }
    );

    loop {
        std::thread::sleep(POLL_INTERVAL);
        let dark = manager.settings().prefers_dark();
        if dark == last_dark {
            continue;
        }
        last_dark = dark;

        let variant = if dark { Variant::Dark } else { Variant::Light };
        let config = manager.registry().load_config()?;
        let desired = preferred_theme(&config, dark).to_string();
        if desired == config.current_theme {
            tracing::debug!("Preferred {variant} theme already active");
            continue;
        }

        println!("[{}] Color scheme flipped to {variant}, applying {desired}", timestamp());
        if let Err(err) = manager.apply(&desired, Some(variant), false) {
            println!("[{}] ✗ Failed to apply {desired}: {err:#}", timestamp());
        }
    }
}
