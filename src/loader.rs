//! Memoized loading of canonical tables keyed by source identity.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info};

use crate::{
    error::LoadError,
    normalize::normalize,
    record::PlayerTable,
    source::{self, LoadOptions},
};

/// Owns the cache of normalized tables for the lifetime of the process.
///
/// Each distinct source is read and normalized once; later calls with the
/// same identity return the shared table without touching the file again.
/// Failed loads are not cached.
#[derive(Debug, Default)]
pub struct TableLoader {
    options: LoadOptions,
    cache: HashMap<PathBuf, Arc<PlayerTable>>,
}

impl TableLoader {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, path: &Path) -> Result<Arc<PlayerTable>, LoadError> {
        let identity = source_identity(path);
        if let Some(table) = self.cache.get(&identity) {
            debug!("Using cached table for {:?}", identity);
            return Ok(Arc::clone(table));
        }

        let raw = source::read_source(path, &self.options)?;
        let mut table = normalize(&raw.table)?;
        info!(
            "Loaded {} player row(s) and {} column(s) from {:?} (sha256 {})",
            table.len(),
            table.headers().len(),
            path,
            &raw.fingerprint[..12]
        );
        table.fingerprint = Some(raw.fingerprint);

        let table = Arc::new(table);
        self.cache.insert(identity, Arc::clone(&table));
        Ok(table)
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.cache.contains_key(&source_identity(path))
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Canonical path when it resolves, otherwise the path as given.
fn source_identity(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
