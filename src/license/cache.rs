// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::fs::{create_dir_all, read, write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bincode::{config, Decode, Encode};
use directories::ProjectDirs;
use error_stack::{Report, Result, ResultExt};
use log::{debug, info};
use miniz_oxide::deflate::compress_to_vec;
use miniz_oxide::inflate::decompress_to_vec;
use thiserror::Error;

use crate::error::CPath;

const CACHE_FILE_NAME: &str = "license-texts.bincode.deflate";

#[derive(Debug, Clone, Copy, Error)]
pub enum CacheError {
    #[error("Failed to infer the users cache directory.")]
    CacheDir,
    #[error("Cache was not able to be found or is invalid.")]
    Invalid,
    #[error("Failed to read cache.")]
    ReadError,
    #[error("Failed to write cache.")]
    WriteError,
}

/// License texts of previous runs by url.
#[derive(Debug, Default, Clone, PartialEq, Eq, Encode, Decode)]
pub struct LicenseCache {
    texts: BTreeMap<String, String>,
}

/// Location of the cache in the users cache directory.
pub fn global_cache_path() -> Result<PathBuf, CacheError> {
    let project_dirs = ProjectDirs::from("eu", "mckellar", "notice-fetcher")
        .ok_or_else(|| Report::new(CacheError::CacheDir))?;
    Ok(project_dirs.cache_dir().join(CACHE_FILE_NAME))
}

impl LicenseCache {
    /// Reads the cache from the path. A file that does not exist yields an empty cache.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path
            .try_exists()
            .change_context(CacheError::ReadError)
            .attach_printable_lazy(|| CPath::from(path))?
        {
            debug!("No license cache at {:?}", path);
            return Ok(Self::default());
        }

        let compressed = read(path)
            .change_context(CacheError::ReadError)
            .attach_printable_lazy(|| CPath::from(path))?;
        let data = decompress_to_vec(&compressed).map_err(|e| {
            Report::new(CacheError::Invalid)
                .attach_printable(format!("Decompression failed: {:?}", e.status))
                .attach_printable(CPath::from(path))
        })?;
        let (cache, _) = bincode::decode_from_slice(&data, config::standard())
            .change_context(CacheError::Invalid)
            .attach_printable_lazy(|| CPath::from(path))?;

        Ok(cache)
    }

    /// Writes the cache to the path, creating missing parent directories.
    pub fn save(&self, path: &Path) -> Result<(), CacheError> {
        let data = bincode::encode_to_vec(self, config::standard())
            .change_context(CacheError::WriteError)?;

        let instant_before_compression = Instant::now();
        let compressed = compress_to_vec(&data, 10);
        info!(
            "Compressed license cache from {} to {} Bytes in {}ms",
            data.len(),
            compressed.len(),
            instant_before_compression.elapsed().as_millis()
        );

        if let Some(parent) = path.parent() {
            create_dir_all(parent)
                .change_context(CacheError::WriteError)
                .attach_printable_lazy(|| CPath::from(parent))?;
        }
        write(path, compressed)
            .change_context(CacheError::WriteError)
            .attach_printable_lazy(|| CPath::from(path))
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.texts.get(url).map(String::as_str)
    }

    pub fn insert(&mut self, url: String, text: String) {
        self.texts.insert(url, text);
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
