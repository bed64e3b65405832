//! Wallpaper variant pipeline.
//!
//! GNOME writes the picked wallpaper to `~/.config/background`. From that
//! source image we build a darkened and a brightened 1920x1080 variant, then
//! point `picture-uri` / `picture-uri-dark` at them so the wallpaper tracks
//! the color scheme. How hard each variant pushes depends on how bright the
//! source image already is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::RgbImage;

use crate::error::ThemeError;
use crate::settings::{DesktopSettings, BACKGROUND_SCHEMA, PICTURE_URI, PICTURE_URI_DARK};
use crate::watch::content_fingerprint;

pub const CANVAS_WIDTH: u32 = 1920;
pub const CANVAS_HEIGHT: u32 = 1080;

const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Mean brightness of an image on a 0-100 scale.
pub fn image_brightness(img: &RgbImage) -> f64 {
    let mut total = 0.0f64;
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        total += 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    }
    let pixels = (img.width() as f64) * (img.height() as f64);
    if pixels == 0.0 {
        return 0.0;
    }
    total / pixels / 255.0 * 100.0
}

/// Source image brightness class, used to pick variant factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrightnessClass {
    VeryDark,
    Dark,
    Medium,
    Bright,
    VeryBright,
}

impl BrightnessClass {
    pub fn classify(brightness: f64) -> Self {
        match brightness {
            b if b < 20.0 => BrightnessClass::VeryDark,
            b if b < 40.0 => BrightnessClass::Dark,
            b if b < 60.0 => BrightnessClass::Medium,
            b if b < 80.0 => BrightnessClass::Bright,
            _ => BrightnessClass::VeryBright,
        }
    }

    /// `(dark_factor, light_factor)` multipliers for this class. Already-dark
    /// images are left alone for the dark variant; already-bright ones for
    /// the light variant.
    pub fn variant_factors(self) -> (f64, f64) {
        match self {
            BrightnessClass::VeryDark => (1.0, 1.5),
            BrightnessClass::Dark => (0.8, 1.35),
            BrightnessClass::Medium => (0.77, 1.2),
            BrightnessClass::Bright => (0.75, 1.1),
            BrightnessClass::VeryBright => (0.5, 1.0),
        }
    }
}

/// Center-crop to 16:9 and resize to the canvas resolution.
pub fn fit_canvas(img: &RgbImage) -> RgbImage {
    let (w, h) = img.dimensions();
    let target_ratio = f64::from(CANVAS_WIDTH) / f64::from(CANVAS_HEIGHT);
    let ratio = f64::from(w) / f64::from(h);

    let (crop_w, crop_h) = if ratio > target_ratio {
        ((f64::from(h) * target_ratio) as u32, h)
    } else {
        (w, (f64::from(w) / target_ratio) as u32)
    };
    let x = (w - crop_w) / 2;
    let y = (h - crop_h) / 2;

    let cropped = image::imageops::crop_imm(img, x, y, crop_w.max(1), crop_h.max(1)).to_image();
    image::imageops::resize(&cropped, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
}

/// Scale every channel by `factor` (clamped) and write the result as JPEG.
pub fn write_variant(img: &RgbImage, factor: f64, path: &Path) -> Result<()> {
    let mut out = img.clone();
    for pixel in out.pixels_mut() {
        for channel in &mut pixel.0 {
            *channel = (f64::from(*channel) * factor).min(255.0) as u8;
        }
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    out.save(path)
        .with_context(|| format!("Failed to write wallpaper variant {}", path.display()))?;
    Ok(())
}

/// Build both variants from `source` and point the background URIs at them.
///
/// Returns `false` without touching anything when the two URIs already
/// diverge, which means the variants from a previous pass are still active
/// and this change was our own write.
pub fn update_backgrounds(
    settings: &dyn DesktopSettings,
    source: &Path,
    output_dir: &Path,
) -> Result<bool> {
    let light_uri = settings.get(BACKGROUND_SCHEMA, PICTURE_URI).unwrap_or_default();
    let dark_uri = settings
        .get(BACKGROUND_SCHEMA, PICTURE_URI_DARK)
        .unwrap_or_default();
    if !light_uri.is_empty() && light_uri != dark_uri {
        tracing::debug!("Background URIs already diverge, skipping variant build");
        return Ok(false);
    }

    let img = image::open(source)
        .map_err(|source_err| ThemeError::ImageDecode {
            path: source.to_path_buf(),
            source: source_err,
        })?
        .to_rgb8();
    let canvas = fit_canvas(&img);

    let brightness = image_brightness(&canvas);
    let class = BrightnessClass::classify(brightness);
    let (dark_factor, light_factor) = class.variant_factors();
    tracing::info!("Source brightness {brightness:.1} ({class:?}): dark x{dark_factor}, light x{light_factor}");

    let dark_path = output_dir.join("dark.jpg");
    let light_path = output_dir.join("light.jpg");
    write_variant(&canvas, dark_factor, &dark_path)?;
    write_variant(&canvas, light_factor, &light_path)?;

    settings.set(
        BACKGROUND_SCHEMA,
        PICTURE_URI,
        &format!("file://{}", light_path.display()),
    )?;
    settings.set(
        BACKGROUND_SCHEMA,
        PICTURE_URI_DARK,
        &format!("file://{}", dark_path.display()),
    )?;
    Ok(true)
}

fn source_path() -> Result<PathBuf> {
    let config = dirs::config_dir().context("Could not find config directory")?;
    Ok(config.join("background"))
}

fn output_dir() -> Result<PathBuf> {
    let data = dirs::data_dir().context("Could not find data directory")?;
    Ok(data.join("backgrounds/hypaurora"))
}

/// Run the variant pipeline once, or keep polling the source image for
/// changes until interrupted.
pub fn run(settings: &dyn DesktopSettings, once: bool) -> Result<()> {
    let source = source_path()?;
    let output = output_dir()?;

    if once {
        if !source.exists() {
            anyhow::bail!("No wallpaper source at {}", source.display());
        }
        if update_backgrounds(settings, &source, &output)? {
            println!("✓ Background variants updated");
        } else {
            println!("✓ Background variants already current");
        }
        return Ok(());
    }

    println!("Watching {} for wallpaper changes...", source.display());
    let mut last_seen = content_fingerprint(&source);
    if last_seen.is_some() {
        if let Err(err) = update_backgrounds(settings, &source, &output) {
            tracing::warn!("Initial background pass failed: {err:#}");
        }
    }
    loop {
        std::thread::sleep(POLL_INTERVAL);
        let current = content_fingerprint(&source);
        if current.is_some() && current != last_seen {
            last_seen = current;
            match update_backgrounds(settings, &source, &output) {
                Ok(true) => println!("✓ Background variants updated"),
                Ok(false) => {}
                Err(err) => tracing::warn!("Background pass failed: {err:#}"),
            }
        }
    }
}

/// Screen brightness (10-100) for a measured room brightness, per mode.
/// The curves were fitted against manual adjustments; dark mode ramps much
/// more gently.
pub fn screen_brightness_for_room(room: f64, dark_mode: bool) -> u32 {
    let value = if dark_mode {
        103.9079 + (30.1668 - 103.9079) / (1.0 + (room / 18.80933).powf(3.021715))
    } else {
        3087726.0 + (20.65669 - 3087726.0) / (1.0 + (room / 7224040.0).powf(0.9656249))
    };
    value.clamp(10.0, 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;

    fn solid(width: u32, height: u32, value: u8) -> RgbImage {
        RgbImage::from_pixel(width, height, image::Rgb([value, value, value]))
    }

    #[test]
    fn test_brightness_of_solid_images() {
        assert!(image_brightness(&solid(4, 4, 0)) < 1.0);
        assert!((image_brightness(&solid(4, 4, 255)) - 100.0).abs() < 1.0);
        let mid = image_brightness(&solid(4, 4, 128));
        assert!((45.0..55.0).contains(&mid), "mid gray was {mid}");
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(BrightnessClass::classify(0.0), BrightnessClass::VeryDark);
        assert_eq!(BrightnessClass::classify(19.9), BrightnessClass::VeryDark);
        assert_eq!(BrightnessClass::classify(20.0), BrightnessClass::Dark);
        assert_eq!(BrightnessClass::classify(40.0), BrightnessClass::Medium);
        assert_eq!(BrightnessClass::classify(60.0), BrightnessClass::Bright);
        assert_eq!(BrightnessClass::classify(80.0), BrightnessClass::VeryBright);
    }

    #[test]
    fn test_variant_factors_never_invert() {
        for class in [
            BrightnessClass::VeryDark,
            BrightnessClass::Dark,
            BrightnessClass::Medium,
            BrightnessClass::Bright,
            BrightnessClass::VeryBright,
        ] {
            let (dark, light) = class.variant_factors();
            assert!(dark <= 1.0);
            assert!(light >= 1.0);
        }
    }

    #[test]
    fn test_fit_canvas_output_resolution() {
        for (w, h) in [(3000, 2000), (2000, 3000), (1920, 1080), (100, 100)] {
            let fitted = fit_canvas(&solid(w, h, 100));
            assert_eq!(fitted.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        }
    }

    #[test]
    fn test_write_variant_darkens_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dark.jpg");
        write_variant(&solid(32, 32, 200), 0.5, &path).unwrap();

        let back = image::open(&path).unwrap().to_rgb8();
        // JPEG is lossy; just check it landed near half brightness.
        let value = f64::from(back.get_pixel(16, 16).0[0]);
        assert!((90.0..110.0).contains(&value), "value was {value}");
    }

    #[test]
    fn test_update_backgrounds_sets_both_uris() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("background");
        solid(320, 180, 128).save_with_format(&source, image::ImageFormat::Png).unwrap();

        let settings = MemorySettings::new();
        let changed = update_backgrounds(&settings, &source, dir.path()).unwrap();
        assert!(changed);

        let light = settings.get(BACKGROUND_SCHEMA, PICTURE_URI).unwrap();
        let dark = settings.get(BACKGROUND_SCHEMA, PICTURE_URI_DARK).unwrap();
        assert!(light.ends_with("light.jpg"));
        assert!(dark.ends_with("dark.jpg"));
        assert!(dir.path().join("light.jpg").exists());
        assert!(dir.path().join("dark.jpg").exists());
    }

    #[test]
    fn test_update_backgrounds_skips_when_uris_diverge() {
        let dir = tempfile::tempdir().unwrap();
        let settings = MemorySettings::with(&[
            (BACKGROUND_SCHEMA, PICTURE_URI, "file:///light.jpg"),
            (BACKGROUND_SCHEMA, PICTURE_URI_DARK, "file:///dark.jpg"),
        ]);
        // Source does not even need to exist when the pass short-circuits.
        let changed =
            update_backgrounds(&settings, &dir.path().join("missing"), dir.path()).unwrap();
        assert!(!changed);
    }

    #[test]
    fn test_screen_brightness_clamps_and_orders() {
        assert!(screen_brightness_for_room(0.0, true) >= 10);
        assert!(screen_brightness_for_room(1000.0, true) <= 100);
        assert!(screen_brightness_for_room(0.0, false) >= 10);
        assert!(screen_brightness_for_room(1000.0, false) <= 100);
        // Dark mode stays dimmer than light mode in a normally lit room.
        assert!(screen_brightness_for_room(50.0, true) <= screen_brightness_for_room(50.0, false));
    }
}
