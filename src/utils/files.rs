// entry classification and display formatting

use std::fmt;
use std::fs;
use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};

/// placeholder shown in the size column for anything that is not a file
pub const NO_SIZE: &str = "-";

/// extension token used for files without a dotted suffix
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// kind of a directory child, as shown in listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File { extension: String },
    Symlink,
    Unknown,
}

impl EntryKind {
    pub fn is_dir(&self) -> bool {
        matches!(self, EntryKind::Directory)
    }

    pub fn is_file(&self) -> bool {
        matches!(self, EntryKind::File { .. })
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => f.write_str("DIR"),
            EntryKind::File { extension } => f.write_str(extension),
            EntryKind::Symlink => f.write_str("SYMLINK"),
            EntryKind::Unknown => f.write_str(UNKNOWN_EXTENSION),
        }
    }
}

/// classify a local path.
///
/// directories and files are checked through symlinks first, so a link to a
/// file is a file; only links that resolve to neither are `Symlink`.
pub fn classify(path: &Path) -> EntryKind {
    if let Ok(metadata) = fs::metadata(path) {
        if metadata.is_dir() {
            return EntryKind::Directory;
        }
        if metadata.is_file() {
            let extension = file_name_of(path)
                .map(|name| split_extension(name).1)
                .filter(|ext| !ext.is_empty())
                .unwrap_or(UNKNOWN_EXTENSION)
                .to_string();
            return EntryKind::File { extension };
        }
    }

    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.file_type().is_symlink() => EntryKind::Symlink,
        _ => EntryKind::Unknown,
    }
}

/// split a file name into stem and dotted extension.
///
/// leading dots belong to the stem, so `.bashrc` has no extension.
pub fn split_extension(name: &str) -> (&str, &str) {
    let first_non_dot = name.len() - name.trim_start_matches('.').len();
    match name[first_non_dot..].rfind('.') {
        Some(idx) => name.split_at(first_non_dot + idx),
        None => (name, ""),
    }
}

fn file_name_of(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

/// human-readable size for files, `-` for everything else
pub fn size_display(path: &Path, kind: &EntryKind) -> String {
    if !kind.is_file() {
        return NO_SIZE.to_string();
    }

    match fs::metadata(path) {
        Ok(metadata) => format_file_size(metadata.len()),
        Err(_) => NO_SIZE.to_string(),
    }
}

/// format a byte count with 3 decimals, capping the unit at GB
pub fn format_file_size(size: u64) -> String {
    const UNITS: &[&str] = &["Byte", "KB", "MB", "GB"];
    const THRESHOLD: f64 = 1024.0;

    let mut size_f = size as f64;
    let mut unit_index = 0;

    while size_f >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size_f /= THRESHOLD;
        unit_index += 1;
    }

    format!("{:.3} {}", size_f, UNITS[unit_index])
}

/// local modification time of `path`, empty when unavailable
pub fn modified_display(path: &Path) -> String {
    fs::metadata(path)
        .or_else(|_| fs::symlink_metadata(path))
        .and_then(|metadata| metadata.modified())
        .map(format_timestamp)
        .unwrap_or_default()
}

/// format a timestamp as `yy-mm-dd HH:MM:SS` in local time
pub fn format_timestamp(timestamp: SystemTime) -> String {
    let datetime: DateTime<Local> = timestamp.into();
    datetime.format("%y-%m-%d %H:%M:%S").to_string()
}

/// escape html special characters
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
