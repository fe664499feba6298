// url path <-> local path mapping

use std::borrow::Cow;
use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

/// characters left as-is when escaping a name for an href: rfc 3986 unreserved
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Error, Debug)]
pub enum PathError {
    #[error("root directory is not absolute: {0:?}")]
    RelativeRoot(PathBuf),

    #[error("root directory is not fully resolved: {0:?}")]
    UnresolvedRoot(PathBuf),

    #[error("root directory is not valid unicode: {0:?}")]
    NonUnicodeRoot(PathBuf),

    #[error("invalid encoding in path")]
    InvalidEncoding,

    #[error("parent directory components are not allowed")]
    Traversal,
}

/// check that `root` is an absolute, fully resolved, unicode path
pub fn ensure_resolved_root(root: &Path) -> Result<&str, PathError> {
    if !root.is_absolute() {
        return Err(PathError::RelativeRoot(root.to_path_buf()));
    }

    let unresolved = root
        .components()
        .any(|c| matches!(c, Component::CurDir | Component::ParentDir));
    if unresolved {
        return Err(PathError::UnresolvedRoot(root.to_path_buf()));
    }

    root.to_str()
        .ok_or_else(|| PathError::NonUnicodeRoot(root.to_path_buf()))
}

/// percent-decode a raw request path; `+` stays literal unless `plus_as_space`
pub fn decode_uri_path(uri_path: &str, plus_as_space: bool) -> Result<String, PathError> {
    let input: Cow<'_, str> = if plus_as_space {
        Cow::Owned(uri_path.replace('+', " "))
    } else {
        Cow::Borrowed(uri_path)
    };

    percent_decode_str(&input)
        .decode_utf8()
        .map(Cow::into_owned)
        .map_err(|_| PathError::InvalidEncoding)
}

/// map a raw request path onto the served root.
///
/// the decoded path is appended to the root as a string rather than joined,
/// so an absolute-looking request can never replace the root.
pub fn resolve_local_path(
    uri_path: &str,
    root_dir: &Path,
    plus_as_space: bool,
) -> Result<PathBuf, PathError> {
    let root = ensure_resolved_root(root_dir)?;

    if uri_path == "/" {
        return Ok(root_dir.to_path_buf());
    }

    let decoded = decode_uri_path(uri_path, plus_as_space)?;
    if decoded.split(['/', '\\']).any(|segment| segment == "..") {
        return Err(PathError::Traversal);
    }

    if decoded.is_empty() {
        return Ok(root_dir.to_path_buf());
    }

    let mut local = root.trim_end_matches(MAIN_SEPARATOR).to_string();
    if !decoded.starts_with('/') {
        local.push(MAIN_SEPARATOR);
    }
    if MAIN_SEPARATOR == '/' {
        local.push_str(&decoded);
    } else {
        local.push_str(&decoded.replace('/', &MAIN_SEPARATOR.to_string()));
    }

    Ok(PathBuf::from(local))
}

/// percent-encode an entry name for safe inclusion in an href
pub fn escape_segment(name: &str) -> String {
    utf8_percent_encode(name, SEGMENT).to_string()
}

/// url of a child entry below the listing at `parent_uri`
pub fn child_uri(parent_uri: &str, name: &str, is_dir: bool) -> String {
    let mut uri = String::with_capacity(parent_uri.len() + name.len() + 2);
    uri.push_str(parent_uri);
    if !uri.ends_with('/') {
        uri.push('/');
    }
    uri.push_str(&escape_segment(name));
    if is_dir {
        uri.push('/');
    }
    uri
}
