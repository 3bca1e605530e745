//! Artifact I/O boundary.
//!
//! All file reads and writes happen here, once per artifact, never
//! interleaved with traversal. Every error carries the identity of the
//! file that produced it. Tree writes are atomic: a temp file in the
//! destination directory is renamed into place, so a failed run never
//! leaves a partial artifact behind.

use crate::error::ArtifactError;
use crate::tree::{FlatRow, HierarchyNode};
use serde_json::Value;
use std::path::Path;

/// Load a hierarchy tree artifact (JSON).
pub fn load_tree(path: &Path) -> Result<HierarchyNode, ArtifactError> {
    let raw = read(path)?;
    serde_json::from_str(&raw).map_err(|e| ArtifactError::malformed(path, e.to_string()))
}

/// Load flat rows: a JSON list of maps for `.json` files, otherwise
/// tab-delimited text with a header line naming the columns.
pub fn load_rows(path: &Path) -> Result<Vec<FlatRow>, ArtifactError> {
    let raw = read(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw).map_err(|e| ArtifactError::malformed(path, e.to_string()))
    } else {
        parse_delimited_rows(path, &raw)
    }
}

/// Load an arbitrary nested cache artifact for link extraction.
pub fn load_value(path: &Path) -> Result<Value, ArtifactError> {
    let raw = read(path)?;
    serde_json::from_str(&raw).map_err(|e| ArtifactError::malformed(path, e.to_string()))
}

/// Write a tree artifact atomically (temp file + rename).
pub fn write_tree(path: &Path, tree: &HierarchyNode) -> Result<(), ArtifactError> {
    let rendered = serde_json::to_string_pretty(tree)
        .map_err(|e| ArtifactError::malformed(path, e.to_string()))?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, rendered.as_bytes()).map_err(|e| ArtifactError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| ArtifactError::io(path, e))
}

fn read(path: &Path) -> Result<String, ArtifactError> {
    if !path.is_file() {
        return Err(ArtifactError::missing(path));
    }
    std::fs::read_to_string(path).map_err(|e| ArtifactError::io(path, e))
}

fn parse_delimited_rows(path: &Path, raw: &str) -> Result<Vec<FlatRow>, ArtifactError> {
    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| ArtifactError::malformed(path, "empty row file"))?;
    let columns: Vec<&str> = header.split('\t').map(str::trim).collect();

    let column_index = |name: &str| columns.iter().position(|c| *c == name);
    let path_col = column_index("path")
        .ok_or_else(|| ArtifactError::malformed(path, "missing required column: path"))?;
    let title_col = column_index("title")
        .ok_or_else(|| ArtifactError::malformed(path, "missing required column: title"))?;
    let image_col = column_index("imageUrl");
    let link_col = column_index("linkURL");
    let text_col = column_index("text");
    let type_col = column_index("type");

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let cells: Vec<&str> = line.split('\t').collect();
        let cell = |index: Option<usize>| -> Option<String> {
            index
                .and_then(|i| cells.get(i))
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        let row_path = cell(Some(path_col)).ok_or_else(|| {
            ArtifactError::malformed(path, format!("row {}: empty path cell", line_no + 2))
        })?;
        rows.push(FlatRow {
            path: row_path,
            title: cell(Some(title_col)).unwrap_or_default(),
            image_url: cell(image_col),
            link_url: cell(link_col),
            text: cell(text_col),
            node_type: cell(type_col),
        });
    }
    Ok(rows)
}
