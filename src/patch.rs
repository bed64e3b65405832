//! Shared config-file patching routine.
//!
//! Every per-application target is either a generator (emit a whole file) or
//! an in-place patcher (an ordered rule table of regex replacements applied
//! through `patch_file`). Missing files and unmatched patterns are deliberate
//! no-ops so one drifted config cannot abort a whole apply pass, and writes
//! only happen when content actually changed, which makes a second apply of
//! the same theme byte-identical.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

/// One replacement rule: a compiled pattern and a `$1`-style replacement that
/// preserves the captured key prefix.
#[derive(Debug)]
pub struct PatchRule {
    pub pattern: Regex,
    pub replacement: String,
}

impl PatchRule {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)
                .with_context(|| format!("Invalid patch pattern {pattern:?}"))?,
            replacement: replacement.into(),
        })
    }
}

/// What a single target did during an apply pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// Target file does not exist; warned and skipped.
    Missing,
    /// File exists but the content was already up to date.
    Unchanged,
    /// File rewritten with new content.
    Patched,
    /// Dry run: a write would have happened.
    WouldPatch,
}

impl PatchOutcome {
    pub fn changed(self) -> bool {
        matches!(self, PatchOutcome::Patched | PatchOutcome::WouldPatch)
    }
}

/// Apply an ordered rule table to an existing file.
///
/// Rules whose pattern finds no match are silently skipped; the file is
/// written back only when the combined result differs from the original.
pub fn patch_file(path: &Path, rules: &[PatchRule], dry_run: bool) -> Result<PatchOutcome> {
    if !path.exists() {
        tracing::warn!("File not found, skipping: {}", path.display());
        return Ok(PatchOutcome::Missing);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut updated = content.clone();
    for rule in rules {
        updated = rule
            .pattern
            .replace_all(&updated, rule.replacement.as_str())
            .into_owned();
    }

    if updated == content {
        return Ok(PatchOutcome::Unchanged);
    }
    if dry_run {
        println!("  [DRY RUN] Would update {}", path.display());
        return Ok(PatchOutcome::WouldPatch);
    }

    fs::write(path, updated).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(PatchOutcome::Patched)
}

/// Write a fully generated config file, creating parent directories. Skips
/// the write when the target already holds identical content.
pub fn write_generated(path: &Path, content: &str, dry_run: bool) -> Result<PatchOutcome> {
    if let Ok(existing) = fs::read_to_string(path) {
        if existing == content {
            return Ok(PatchOutcome::Unchanged);
        }
    }
    if dry_run {
        println!("  [DRY RUN] Would write {}", path.display());
        return Ok(PatchOutcome::WouldPatch);
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(PatchOutcome::Patched)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, replacement: &str) -> PatchRule {
        PatchRule::new(pattern, replacement).unwrap()
    }

    #[test]
    fn test_patch_preserves_captured_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.css");
        fs::write(&path, "@define-color window_bg_color #000000;\n").unwrap();

        let rules = [rule(
            r"(@define-color window_bg_color\s+)[^;]+;",
            "${1}#101010;",
        )];
        let outcome = patch_file(&path, &rules, false).unwrap();
        assert_eq!(outcome, PatchOutcome::Patched);
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "@define-color window_bg_color #101010;\n"
        );
    }

    #[test]
    fn test_second_apply_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("look.conf");
        fs::write(&path, "col.active_border = rgb(ffffff)\n").unwrap();

        let rules = [rule(
            r"col\.active_border\s*=\s*[^\n]+",
            "col.active_border = rgb(101010)",
        )];
        assert_eq!(patch_file(&path, &rules, false).unwrap(), PatchOutcome::Patched);
        let first = fs::read_to_string(&path).unwrap();
        assert_eq!(patch_file(&path, &rules, false).unwrap(), PatchOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), first);
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.conf");
        let outcome = patch_file(&path, &[], false).unwrap();
        assert_eq!(outcome, PatchOutcome::Missing);
    }

    #[test]
    fn test_unmatched_pattern_is_silent_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf");
        fs::write(&path, "unrelated = 1\n").unwrap();
        let rules = [rule(r"never_matches\s*=\s*\d+", "never_matches = 2")];
        assert_eq!(patch_file(&path, &rules, false).unwrap(), PatchOutcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).unwrap(), "unrelated = 1\n");
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf");
        fs::write(&path, "key = old\n").unwrap();
        let rules = [rule(r"key\s*=\s*\w+", "key = new")];
        assert_eq!(patch_file(&path, &rules, true).unwrap(), PatchOutcome::WouldPatch);
        assert_eq!(fs::read_to_string(&path).unwrap(), "key = old\n");
    }

    #[test]
    fn test_write_generated_creates_parents_and_skips_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/themes/out");
        assert_eq!(
            write_generated(&path, "body\n", false).unwrap(),
            PatchOutcome::Patched
        );
        assert_eq!(
            write_generated(&path, "body\n", false).unwrap(),
            PatchOutcome::Unchanged
        );
    }

    #[test]
    fn test_write_generated_dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out");
        assert_eq!(
            write_generated(&path, "body\n", true).unwrap(),
            PatchOutcome::WouldPatch
        );
        assert!(!path.exists());
    }
}
