//! Chart discovery and version tagging of the chart descriptors.
//!
//! The descriptors are edited line by line so comments, ordering and any
//! unrelated values survive untouched.

use crate::ReleaseError;
use semver::Version;
use std::path::{Path, PathBuf};
use tagship_core::Coordinates;

pub const CHART_FILE: &str = "Chart.yaml";
pub const VALUES_FILE: &str = "values.yaml";

/// The application's chart, present only when `<charts_dir>/<application>`
/// exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartContext {
    dir: PathBuf,
    /// `registry/organisation/application`, written to `image.repository`
    repository: String,
}

impl ChartContext {
    /// Look for the application's chart directory.
    pub fn probe(
        project_dir: &Path,
        charts_dir: &str,
        coords: &Coordinates,
    ) -> Result<Option<Self>, ReleaseError> {
        let dir = project_dir.join(charts_dir).join(coords.application());
        let exists = dir.try_exists().map_err(|e| ReleaseError::ChartProbe {
            path: dir.clone(),
            source: e,
        })?;

        if !exists || !dir.is_dir() {
            return Ok(None);
        }

        Ok(Some(Self {
            dir,
            repository: coords.repository(),
        }))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the release version into `Chart.yaml` and the image repository
    /// and tag into `values.yaml`.
    pub fn tag(&self, version: &Version) -> Result<(), ReleaseError> {
        let tag = version.to_string();
        rewrite(&self.dir.join(CHART_FILE), |c| set_chart_version(c, &tag))?;
        rewrite(&self.dir.join(VALUES_FILE), |c| {
            set_image_values(c, &self.repository, &tag)
        })?;
        tracing::info!(chart = %self.dir.display(), version = %tag, "tagged chart");
        Ok(())
    }
}

fn rewrite(path: &Path, edit: impl FnOnce(&str) -> String) -> Result<(), ReleaseError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::ChartDescriptor {
        path: path.to_path_buf(),
        source: e,
    })?;
    std::fs::write(path, edit(&content)).map_err(|e| ReleaseError::ChartDescriptor {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Set the top-level `version:` of a `Chart.yaml`, appending one if absent.
pub fn set_chart_version(content: &str, version: &str) -> String {
    let mut found = false;
    let mut lines: Vec<String> = content
        .lines()
        .map(|line| {
            if top_level_key(line) == Some("version") {
                found = true;
                format!("version: {version}")
            } else {
                line.to_owned()
            }
        })
        .collect();

    if !found {
        lines.push(format!("version: {version}"));
    }
    join_lines(lines)
}

/// Set `image.repository` and `image.tag` in a `values.yaml`.
///
/// Only direct children of the top-level `image:` mapping are touched;
/// missing keys (or a missing `image:` block) are added.
pub fn set_image_values(content: &str, repository: &str, tag: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut image_line: Option<usize> = None;
    let mut in_image = false;
    let mut child_indent: Option<String> = None;
    let mut wrote_repository = false;
    let mut wrote_tag = false;

    for line in content.lines() {
        if let Some(key) = top_level_key(line) {
            in_image = key == "image";
            if !in_image {
                lines.push(line.to_owned());
                continue;
            }
            image_line = Some(lines.len());
            match inline_value(line) {
                None => lines.push(line.to_owned()),
                Some(value) => {
                    // `image: {...}` or `image: scalar` becomes a block mapping
                    lines.push("image:".to_owned());
                    in_image = false;
                    for (k, v) in flow_entries(value) {
                        let v = match k {
                            "repository" => {
                                wrote_repository = true;
                                repository
                            }
                            "tag" => {
                                wrote_tag = true;
                                tag
                            }
                            _ => v,
                        };
                        lines.push(format!("  {k}: {v}"));
                    }
                }
            }
            continue;
        }

        if in_image && !is_blank_or_comment(line) {
            let indent: String = line.chars().take_while(|c| *c == ' ').collect();
            let indent = child_indent.get_or_insert(indent).clone();
            if let Some(rest) = line.strip_prefix(indent.as_str())
                && !rest.starts_with(' ')
            {
                if key_of(rest) == Some("repository") {
                    lines.push(format!("{indent}repository: {repository}"));
                    wrote_repository = true;
                    continue;
                }
                if key_of(rest) == Some("tag") {
                    lines.push(format!("{indent}tag: {tag}"));
                    wrote_tag = true;
                    continue;
                }
            }
        }
        lines.push(line.to_owned());
    }

    match image_line {
        Some(idx) => {
            let indent = child_indent.unwrap_or_else(|| "  ".to_owned());
            let mut missing = Vec::new();
            if !wrote_repository {
                missing.push(format!("{indent}repository: {repository}"));
            }
            if !wrote_tag {
                missing.push(format!("{indent}tag: {tag}"));
            }
            lines.splice(idx + 1..idx + 1, missing);
        }
        None => {
            lines.push("image:".to_owned());
            lines.push(format!("  repository: {repository}"));
            lines.push(format!("  tag: {tag}"));
        }
    }
    join_lines(lines)
}

/// Key of an unindented `key:` line.
fn top_level_key(line: &str) -> Option<&str> {
    if line.starts_with([' ', '\t', '#', '-']) {
        return None;
    }
    key_of(line)
}

fn key_of(line: &str) -> Option<&str> {
    let (key, rest) = line.split_once(':')?;
    let valid = !key.is_empty()
        && !key.contains(' ')
        && (rest.is_empty() || rest.starts_with([' ', '\t']));
    valid.then_some(key)
}

/// Value written on the same line as a `key:`, ignoring trailing comments.
fn inline_value(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(':')?;
    let rest = rest.trim();
    let value = match rest.strip_prefix('#') {
        Some(_) => "",
        None => rest.split(" #").next().unwrap_or(rest).trim(),
    };
    (!value.is_empty()).then_some(value)
}

/// `key: value` pairs of a single-line flow mapping. Anything else yields
/// nothing.
fn flow_entries(value: &str) -> Vec<(&str, &str)> {
    let Some(inner) = value
        .strip_prefix('{')
        .and_then(|v| v.strip_suffix('}'))
    else {
        return Vec::new();
    };
    inner
        .split(',')
        .filter_map(|entry| {
            let (k, v) = entry.split_once(':')?;
            let k = k.trim();
            (!k.is_empty()).then_some((k, v.trim()))
        })
        .collect()
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn join_lines(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}
