//! Parsing of the custom metadata Ultralytics writes into exported ONNX models.
//!
//! The exporter stores Python literals as strings, for example
//! `names = "{0: 'person', 1: 'bicycle'}"` and `imgsz = "[640, 640]"`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Metadata read from an exported detector.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelMetadata {
    /// Class names ordered by class index.
    pub names: Option<Vec<String>>,
    /// Input size as (height, width).
    pub imgsz: Option<(u32, u32)>,
    /// Task the model was exported for, e.g. `detect`.
    pub task: Option<String>,
}

static NAMES_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(\d+)\s*:\s*(?:'((?:[^'\\]|\\.)*)'|"((?:[^"\\]|\\.)*)")"#)
        .expect("Failed to compile names regex")
});

/// Parses a `names` dict literal into a list ordered by index.
///
/// Returns `None` when the string holds no entries or the indices are not
/// contiguous from zero.
pub fn parse_names(raw: &str) -> Option<Vec<String>> {
    let mut entries: Vec<(usize, String)> = NAMES_REGEX
        .captures_iter(raw)
        .filter_map(|caps| {
            let idx = caps.get(1)?.as_str().parse::<usize>().ok()?;
            let name = caps.get(2).or_else(|| caps.get(3))?.as_str();
            Some((idx, name.replace("\\'", "'").replace("\\\"", "\"")))
        })
        .collect();

    if entries.is_empty() {
        return None;
    }
    entries.sort_by_key(|(idx, _)| *idx);
    let contiguous = entries.iter().enumerate().all(|(pos, (idx, _))| pos == *idx);
    if !contiguous {
        return None;
    }
    Some(entries.into_iter().map(|(_, name)| name).collect())
}

/// Parses an `imgsz` literal such as `[640, 640]` or `640`.
pub fn parse_imgsz(raw: &str) -> Option<(u32, u32)> {
    let dims: Vec<u32> = raw
        .trim_matches(|c: char| c == '[' || c == ']' || c == '(' || c == ')' || c.is_whitespace())
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().parse::<u32>())
        .collect::<Result<_, _>>()
        .ok()?;

    match dims.as_slice() {
        [size] if *size > 0 => Some((*size, *size)),
        [h, w] if *h > 0 && *w > 0 => Some((*h, *w)),
        _ => None,
    }
}
