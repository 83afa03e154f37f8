// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Video combiner
//!
//! Groups the clips of an export folder by camera, orders each group by the
//! timestamp embedded in the file name and joins groups of two or more clips
//! into one `... - combined.<ext>` file.

use crate::error::CombineError;
use chrono::NaiveDateTime;
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use upem_adapters::{concat::manifest_contents, ConcatAdapter};

/// Extensions treated as video, compared case-insensitively
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "mov", "avi", "ts"];

const COMBINED_SUFFIX: &str = " - combined";

/// Format of the `<date> - <time>` part of a clip name
const CLIP_TIMESTAMP_FORMAT: &str = "%Y-%m-%d - %H.%M.%S";

// `<camera> - <date> - <time>-<suffix>.<ext>`
#[allow(clippy::expect_used)]
static CLIP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<camera>.+?) - (?P<date>\d{4}-\d{2}-\d{2}) - (?P<time>\d{2}\.\d{2}\.\d{2})-(?P<suffix>[^.]+)\.(?P<ext>[^.]+)$",
    )
    .expect("constant regex pattern is valid")
});

/// Camera and recording time parsed from a clip file name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipName {
    pub camera: String,
    pub recorded_at: NaiveDateTime,
}

/// Parse `<camera> - <date> - <time>-<suffix>.<ext>`
pub fn parse_clip_name(name: &str) -> Option<ClipName> {
    let caps = CLIP_PATTERN.captures(name)?;
    let stamp = format!("{} - {}", &caps["date"], &caps["time"]);
    let recorded_at = NaiveDateTime::parse_from_str(&stamp, CLIP_TIMESTAMP_FORMAT).ok()?;
    Some(ClipName {
        camera: caps["camera"].to_string(),
        recorded_at,
    })
}

/// Output name for a group whose earliest clip is `first`
///
/// `Front - 2024-01-01 - 10.00.00-0001.mp4` becomes
/// `Front - 2024-01-01 - 10.00.00-0001 - combined.mp4`.
pub fn combined_name(first: &str) -> String {
    match first.rsplit_once('.') {
        Some((stem, ext)) => format!("{}{}.{}", stem, COMBINED_SUFFIX, ext),
        None => format!("{}{}", first, COMBINED_SUFFIX),
    }
}

fn is_video(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            VIDEO_EXTENSIONS
                .iter()
                .any(|v| v.eq_ignore_ascii_case(ext))
        })
}

fn is_combined_output(name: &str) -> bool {
    Path::new(name)
        .file_stem()
        .and_then(|s| s.to_str())
        .is_some_and(|stem| stem.ends_with(COMBINED_SUFFIX))
}

/// What [`VideoCombiner::process`] did to a folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombineReport {
    /// Combined files written
    pub combined: Vec<PathBuf>,
    /// Video files whose name does not follow the clip pattern
    pub skipped: Vec<PathBuf>,
    /// Cameras whose concatenation failed; their clips are kept
    pub failed: Vec<String>,
    /// Original clips removed after a successful concatenation
    pub deleted: Vec<PathBuf>,
}

/// Concat manifest that is removed when dropped
struct Manifest {
    path: PathBuf,
}

impl Drop for Manifest {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(manifest = %self.path.display(), error = %e, "failed to remove manifest");
            }
        }
    }
}

struct Clip {
    path: PathBuf,
    recorded_at: NaiveDateTime,
}

/// Joins per-camera clips of an export folder
#[derive(Clone)]
pub struct VideoCombiner<K> {
    concat: K,
    keep_split_files: bool,
}

impl<K: ConcatAdapter> VideoCombiner<K> {
    pub fn new(concat: K, keep_split_files: bool) -> Self {
        Self {
            concat,
            keep_split_files,
        }
    }

    /// Combine the clips found directly in `folder`
    ///
    /// Groups with a single clip are left alone. Originals are deleted only
    /// when splits are not kept and the concatenation succeeded.
    pub async fn process(&self, folder: &Path) -> Result<CombineReport, CombineError> {
        let mut report = CombineReport::default();
        let (names, unreadable) = list_files(folder).await?;
        report.skipped.extend(unreadable);

        let mut groups: BTreeMap<String, Vec<Clip>> = BTreeMap::new();
        for name in names {
            if !is_video(&name) || is_combined_output(&name) {
                continue;
            }
            let path = folder.join(&name);
            match parse_clip_name(&name) {
                Some(clip) => groups.entry(clip.camera).or_default().push(Clip {
                    path,
                    recorded_at: clip.recorded_at,
                }),
                None => {
                    tracing::warn!(file = %name, "file name does not match clip pattern, skipping");
                    report.skipped.push(path);
                }
            }
        }

        if groups.is_empty() {
            tracing::info!(folder = %folder.display(), "no clips to combine");
            return Ok(report);
        }

        for (index, (camera, mut clips)) in groups.into_iter().enumerate() {
            if clips.len() < 2 {
                tracing::debug!(camera = %camera, "single clip, nothing to combine");
                continue;
            }
            // Stable: equal timestamps keep listing order
            clips.sort_by_key(|c| c.recorded_at);
            self.combine_group(folder, index, &camera, &clips, &mut report)
                .await;
        }

        Ok(report)
    }

    async fn combine_group(
        &self,
        folder: &Path,
        index: usize,
        camera: &str,
        clips: &[Clip],
        report: &mut CombineReport,
    ) {
        let inputs: Vec<PathBuf> = clips.iter().map(|c| c.path.clone()).collect();
        let Some(first) = inputs
            .first()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
        else {
            return;
        };
        let output = folder.join(combined_name(first));

        let manifest = Manifest {
            path: folder.join(format!(".concat-{}.txt", index)),
        };
        if let Err(e) = tokio::fs::write(&manifest.path, manifest_contents(&inputs)).await {
            tracing::error!(camera, error = %e, "failed to write manifest");
            report.failed.push(camera.to_string());
            return;
        }

        tracing::info!(camera, clips = inputs.len(), output = %output.display(), "combining clips");
        if let Err(e) = self.concat.concat(&manifest.path, &output).await {
            tracing::error!(camera, error = %e, "combining failed, keeping original clips");
            report.failed.push(camera.to_string());
            return;
        }
        report.combined.push(output);

        if self.keep_split_files {
            return;
        }
        for path in inputs {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::info!(file = %path.display(), "deleted split file");
                    report.deleted.push(path);
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "failed to delete split file")
                }
            }
        }
    }
}

/// Names of the regular files directly in `folder`, sorted
///
/// Files whose names are not valid UTF-8 cannot be matched against the clip
/// pattern; their paths are returned separately.
async fn list_files(folder: &Path) -> Result<(Vec<String>, Vec<PathBuf>), CombineError> {
    let read_err = |source| CombineError::ReadDir {
        path: folder.to_path_buf(),
        source,
    };

    let mut entries = tokio::fs::read_dir(folder).await.map_err(read_err)?;
    let mut names = Vec::new();
    let mut unreadable = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(read_err)? {
        let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => {
                tracing::warn!(
                    file = %entry.file_name().to_string_lossy(),
                    "file name is not valid UTF-8, skipping"
                );
                unreadable.push(entry.path());
            }
        }
    }
    names.sort();
    unreadable.sort();
    Ok((names, unreadable))
}

#[cfg(test)]
#[path = "combine_tests.rs"]
mod tests;
