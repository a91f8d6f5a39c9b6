//! Per-run output tree and file writers.
//!
//! One `RunContext` is constructed per invocation and threaded explicitly
//! through the resolver and artifact writer; there is no process-wide
//! output state. Runs for different region/year pairs therefore never
//! interact; two runs for the same pair race on the output files with no
//! locking, last writer wins.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;

/// Filesystem-safe slug for a region query.
///
/// Collapses whitespace, strips anything that is not a word character,
/// hyphen or space, then joins with underscores. Falls back to `"region"`
/// for queries that slug away to nothing.
pub fn slugify_region(region_query: &str) -> String {
    let spaces = Regex::new(r"\s+").expect("valid regex");
    let disallowed = Regex::new(r"[^\w\-\s]").expect("valid regex");

    let cleaned = spaces.replace_all(region_query.trim(), " ");
    let cleaned = disallowed.replace_all(&cleaned, "");
    let slug = cleaned.replace(' ', "_");
    if slug.is_empty() {
        "region".to_string()
    } else {
        slug
    }
}

/// Directory layout for one region/year run.
///
/// The layout is shared with the downstream changeset-download and
/// statistics stages, which is why directories those stages own are
/// created here too.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub region_slug: String,
    pub base_dir: PathBuf,
    pub meta_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub download_dir: PathBuf,
    pub stats_dir: PathBuf,
    pub figures_dir: PathBuf,
    pub logs_dir: PathBuf,
}

impl RunContext {
    /// Build `{out_dir}/{slug}/{year}` and its subtree.
    pub fn create(out_dir: &Path, region_slug: &str, year: i32) -> Result<Self> {
        let base_dir = out_dir.join(region_slug).join(year.to_string());
        let ctx = Self {
            region_slug: region_slug.to_string(),
            meta_dir: base_dir.join("meta"),
            raw_dir: base_dir.join("raw"),
            download_dir: base_dir.join("raw").join("changeset_download"),
            stats_dir: base_dir.join("stats"),
            figures_dir: base_dir.join("figures"),
            logs_dir: base_dir.join("logs"),
            base_dir,
        };
        for dir in [
            &ctx.meta_dir,
            &ctx.raw_dir,
            &ctx.download_dir,
            &ctx.stats_dir,
            &ctx.figures_dir,
            &ctx.logs_dir,
        ] {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
        Ok(ctx)
    }

    pub fn region_json_path(&self) -> PathBuf {
        self.meta_dir.join("region.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.logs_dir.join("run.log")
    }

    /// Append one lifecycle line to the run log, prefixed with an ISO-8601
    /// UTC timestamp.
    pub fn log_line(&self, message: &str) -> Result<()> {
        let stamp = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        append_log(&self.log_path(), &format!("[{}] {}", stamp, message))
    }
}

/// Write a value as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value).context("Failed to serialize JSON")?;
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Append one line to a log file, creating parent directories.
pub fn append_log(path: &Path, message: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    writeln!(file, "{}", message.trim_end())?;
    Ok(())
}
