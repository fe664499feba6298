// rule-based request classification: file, folder or not found

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::utils::paths::resolve_local_path;

/// where a request is dispatched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    StaticFile(PathBuf),
    Folder(PathBuf),
    NotFound,
}

/// dispatch rules, evaluated in order; the first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    File,
    Folder,
    Default,
}

pub const RULES: [Rule; 3] = [Rule::File, Rule::Folder, Rule::Default];

impl Rule {
    fn matches(self, metadata: Option<&Metadata>) -> bool {
        match self {
            Rule::File => metadata.is_some_and(|m| m.is_file()),
            Rule::Folder => metadata.is_some_and(|m| m.is_dir()),
            Rule::Default => true,
        }
    }

    fn target(self, local_path: PathBuf) -> RouteTarget {
        match self {
            Rule::File => RouteTarget::StaticFile(local_path),
            Rule::Folder => RouteTarget::Folder(local_path),
            Rule::Default => RouteTarget::NotFound,
        }
    }
}

/// classify a raw request path with a single filesystem stat
pub async fn route(uri_path: &str, root_dir: &Path, plus_as_space: bool) -> RouteTarget {
    let local_path = match resolve_local_path(uri_path, root_dir, plus_as_space) {
        Ok(path) => path,
        Err(err) => {
            warn!("cannot resolve {}: {}", uri_path, err);
            return RouteTarget::NotFound;
        }
    };

    let metadata = fs::metadata(&local_path).await.ok();

    for rule in RULES {
        if rule.matches(metadata.as_ref()) {
            debug!("{} matched {:?} rule", uri_path, rule);
            return rule.target(local_path);
        }
    }

    RouteTarget::NotFound
}
