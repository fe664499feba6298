// cached directory listing state, rebuilt when the directory changes

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::config::ListingConfig;
use crate::utils::{
    files::{classify, modified_display, size_display, EntryKind},
    paths::child_uri,
};

/// one child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// original, unescaped name
    pub name: String,
    /// escaped url of the entry, with a trailing slash for directories
    pub uri_path: String,
    pub kind: EntryKind,
    pub modified_at: String,
    pub size_display: String,
}

impl DirectoryEntry {
    fn describe(dir: &Path, name: String, parent_uri: &str) -> Self {
        let local = dir.join(&name);
        let kind = classify(&local);
        let uri_path = child_uri(parent_uri, &name, kind.is_dir());

        Self {
            modified_at: modified_display(&local),
            size_display: size_display(&local, &kind),
            name,
            uri_path,
            kind,
        }
    }
}

/// snapshot of one directory's contents, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListingState {
    pub uri_path: String,
    pub parent_uri_path: String,
    pub entries: Vec<DirectoryEntry>,
    pub total_count: usize,
    pub folder_count: usize,
    pub max_page_id: usize,
    pub items_per_page: usize,
    pub last_known_mtime: Option<SystemTime>,
    /// set when the directory could not be read; entries are then empty
    pub scan_error: Option<String>,
}

impl Default for DirectoryListingState {
    fn default() -> Self {
        Self {
            uri_path: String::new(),
            parent_uri_path: "/".to_string(),
            entries: Vec::new(),
            total_count: 0,
            folder_count: 0,
            max_page_id: 1,
            items_per_page: 1,
            last_known_mtime: None,
            scan_error: None,
        }
    }
}

impl DirectoryListingState {
    /// scan `local_dir` and build the listing served at `uri_path`
    pub fn build(
        uri_path: &str,
        local_dir: &Path,
        items_per_page: usize,
        sort_case_insensitive: bool,
    ) -> Self {
        info!("rebuilding listing for {}", uri_path);

        let mut state = Self {
            uri_path: uri_path.to_string(),
            parent_uri_path: parent_uri_path(uri_path),
            items_per_page,
            last_known_mtime: directory_mtime(local_dir),
            ..Default::default()
        };

        let mut names = match read_names(local_dir) {
            Ok(names) => names,
            Err(err) => {
                error!("failed to read directory {}: {}", local_dir.display(), err);
                state.scan_error = Some(err.to_string());
                return state;
            }
        };

        if sort_case_insensitive {
            names.sort_by_cached_key(|name| name.to_lowercase());
        }

        state.entries = names
            .into_iter()
            .map(|name| DirectoryEntry::describe(local_dir, name, uri_path))
            .collect();
        state.total_count = state.entries.len();
        state.folder_count = state.entries.iter().filter(|e| e.kind.is_dir()).count();
        state.max_page_id = max_page_id(state.total_count, items_per_page);

        state
    }

    pub fn file_count(&self) -> usize {
        self.total_count - self.folder_count
    }

    /// whether a request for `uri_path` must trigger a rebuild
    pub fn is_stale(&self, uri_path: &str, current_mtime: Option<SystemTime>) -> bool {
        self.uri_path != uri_path
            || current_mtime.is_none()
            || self.last_known_mtime != current_mtime
    }
}

fn read_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry in {}: {}", dir.display(), err);
                continue;
            }
        };
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => warn!("skipping non-unicode entry name: {:?}", raw),
        }
    }
    Ok(names)
}

fn directory_mtime(dir: &Path) -> Option<SystemTime> {
    fs::metadata(dir).and_then(|m| m.modified()).ok()
}

/// ceil(total / per_page), never below 1
pub fn max_page_id(total: usize, items_per_page: usize) -> usize {
    total.div_ceil(items_per_page.max(1)).max(1)
}

/// parent url of a listing: the root is its own parent
pub fn parent_uri_path(request_path: &str) -> String {
    if request_path.is_empty() || request_path == "/" {
        return request_path.to_string();
    }

    let trimmed = request_path.strip_suffix('/').unwrap_or(request_path);
    match trimmed.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => trimmed[..idx].to_string(),
    }
}

/// single-slot listing cache shared by the directory handler.
///
/// the state is swapped whole; readers keep the `Arc` they were handed, so a
/// rebuild never mutates a listing that is being rendered.
#[derive(Debug)]
pub struct DirectoryCache {
    state: RwLock<Arc<DirectoryListingState>>,
    items_per_page: usize,
    sort_case_insensitive: bool,
}

impl DirectoryCache {
    pub fn new(listing: &ListingConfig) -> Self {
        Self::with_state(listing, DirectoryListingState::default())
    }

    /// cache already populated with the listing of the served root
    pub fn primed(listing: &ListingConfig, root: &Path) -> Self {
        let state = DirectoryListingState::build(
            "/",
            root,
            listing.items_per_page,
            listing.sort_case_insensitive,
        );
        Self::with_state(listing, state)
    }

    fn with_state(listing: &ListingConfig, state: DirectoryListingState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
            items_per_page: listing.items_per_page,
            sort_case_insensitive: listing.sort_case_insensitive,
        }
    }

    /// current listing for `uri_path`, rebuilding it first when stale
    pub async fn snapshot(&self, uri_path: &str, local_dir: &Path) -> Arc<DirectoryListingState> {
        let current_mtime = {
            let dir = local_dir.to_path_buf();
            tokio::task::spawn_blocking(move || directory_mtime(&dir))
                .await
                .unwrap_or(None)
        };

        {
            let state = self.state.read().await;
            if !state.is_stale(uri_path, current_mtime) {
                debug!("listing cache hit for {}", uri_path);
                return Arc::clone(&state);
            }
        }

        debug!("listing cache miss for {}", uri_path);
        let rebuilt = Arc::new(self.rebuild(uri_path, local_dir.to_path_buf()).await);

        *self.state.write().await = Arc::clone(&rebuilt);
        rebuilt
    }

    async fn rebuild(&self, uri_path: &str, local_dir: PathBuf) -> DirectoryListingState {
        let uri = uri_path.to_string();
        let items_per_page = self.items_per_page;
        let sort = self.sort_case_insensitive;

        match tokio::task::spawn_blocking(move || {
            DirectoryListingState::build(&uri, &local_dir, items_per_page, sort)
        })
        .await
        {
            Ok(state) => state,
            Err(err) => {
                error!("listing rebuild task failed: {}", err);
                DirectoryListingState {
                    uri_path: uri_path.to_string(),
                    parent_uri_path: parent_uri_path(uri_path),
                    items_per_page,
                    scan_error: Some(err.to_string()),
                    ..Default::default()
                }
            }
        }
    }
}
