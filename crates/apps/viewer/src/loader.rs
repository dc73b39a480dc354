//! Startup loading of the administrative GeoJSON files.
//!
//! The four levels are read concurrently and each one is installed into the
//! atlas as soon as it is parsed. A level that fails to load is logged and
//! left empty; the rest of the map keeps working.

use std::path::{Path, PathBuf};

use formats::{FeatureCollection, GeoJsonError};
use layers::group_for_level;
use scene::{AdminAtlas, AdminLevel};
use tokio::task::JoinSet;
use tracing::{info, warn};

#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: GeoJsonError,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            LoadError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
        }
    }
}

/// Which levels made it into the atlas.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: Vec<AdminLevel>,
    pub failed: Vec<AdminLevel>,
}

pub fn level_path(root: &Path, level: AdminLevel) -> PathBuf {
    root.join(group_for_level(level).source_file)
}

pub async fn load_level(path: &Path) -> Result<FeatureCollection, LoadError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    FeatureCollection::from_geojson_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads every level under `root` into `atlas`, in completion order.
pub async fn load_atlas(root: &Path, atlas: &mut AdminAtlas) -> LoadSummary {
    let mut tasks = JoinSet::new();
    for level in AdminLevel::ALL {
        let path = level_path(root, level);
        tasks.spawn(async move { (level, load_level(&path).await) });
    }

    let mut summary = LoadSummary::default();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((level, Ok(collection))) => {
                let features = collection.len();
                if atlas.install(level, collection) {
                    info!(%level, features, "level loaded");
                    summary.loaded.push(level);
                }
            }
            Ok((level, Err(err))) => {
                warn!(%level, "level unavailable: {err}");
                summary.failed.push(level);
            }
            Err(err) => warn!("load task failed: {err}"),
        }
    }
    summary.loaded.sort();
    summary.failed.sort();
    summary
}
