// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::hash_map::Entry;
use std::path::PathBuf;
use std::time::Duration;

use error_stack::{Result, ResultExt};
use fnv::FnvHashMap;
use log::{debug, info, warn};
use reqwest::blocking::Client;
use thiserror::Error;

use super::cache::{CacheError, LicenseCache};
use crate::error::{CPath, CUrl};

#[derive(Debug, Clone, Copy, Error)]
pub enum FetchError {
    #[error("Failed to build the http client.")]
    Client,
    #[error("Failed to send the request.")]
    Request,
    #[error("Server responded with an error status.")]
    Status,
    #[error("Failed to read the response body.")]
    Body,
}

#[derive(Debug, Clone, Copy, Error)]
pub enum LicenseFetchError {
    #[error("Failed fetching license text.")]
    Fetch,
}

/// Source of raw license texts.
pub trait FetchLicense {
    /// Fetches the raw bytes behind the url.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: FetchLicense + ?Sized> FetchLicense for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// Fetches license texts with blocking http requests.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .change_context(FetchError::Client)?;

        Ok(Self { client })
    }
}

impl FetchLicense for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .change_context(FetchError::Request)
            .attach_printable_lazy(|| CUrl::from(url))?
            .error_for_status()
            .change_context(FetchError::Status)
            .attach_printable_lazy(|| CUrl::from(url))?;

        Ok(response
            .bytes()
            .change_context(FetchError::Body)
            .attach_printable_lazy(|| CUrl::from(url))?
            .to_vec())
    }
}

/// Removes every character that is neither printable ascii, nor a newline or tab.
///
/// ```
/// # use notice_fetcher::license::clean;
/// assert_eq!(clean("Copyright \u{a9} 2024\r\n\tAll rights reserved."), "Copyright  2024\n\tAll rights reserved.");
/// ```
pub fn clean(text: &str) -> String {
    text.chars()
        .filter(|c| matches!(c, '\n' | '\t' | ' '..='~'))
        .collect()
}

/// License texts of a single run.
///
/// Every url is fetched at most once. If a persistent cache is attached, it is consulted
/// before fetching and filled with every text that had to be fetched.
pub struct LicenseTexts<F> {
    fetcher: F,
    texts: FnvHashMap<String, String>,
    cache: Option<AttachedCache>,
    fetch_count: usize,
}

struct AttachedCache {
    path: PathBuf,
    cache: LicenseCache,
    modified: bool,
}

impl<F: FetchLicense> LicenseTexts<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            texts: FnvHashMap::default(),
            cache: None,
            fetch_count: 0,
        }
    }

    /// Attaches the persistent cache at the given path.
    ///
    /// A missing cache starts out empty. An unreadable one is ignored and overwritten on [persist](Self::persist).
    pub fn with_cache(mut self, path: PathBuf) -> Self {
        let cache = match LicenseCache::load(&path) {
            Ok(cache) => {
                debug!("Loaded {} license texts from cache.", cache.len());
                cache
            }
            Err(report) => {
                warn!("Ignoring license cache: {:?}", report);
                LicenseCache::default()
            }
        };

        self.cache = Some(AttachedCache {
            path,
            cache,
            modified: false,
        });
        self
    }

    /// Cleaned license text behind the url.
    pub fn get(&mut self, url: &str) -> Result<&str, LicenseFetchError> {
        match self.texts.entry(url.to_owned()) {
            Entry::Occupied(entry) => Ok(entry.into_mut().as_str()),
            Entry::Vacant(entry) => {
                let cached = self
                    .cache
                    .as_ref()
                    .and_then(|attached| attached.cache.get(url));

                let text = match cached {
                    Some(text) => {
                        debug!("Restored license text from cache: {}", url);
                        text.to_owned()
                    }
                    None => {
                        info!("... fetching {}", url);
                        let raw = self
                            .fetcher
                            .fetch(url)
                            .change_context(LicenseFetchError::Fetch)?;
                        self.fetch_count += 1;

                        let text = clean(&String::from_utf8_lossy(&raw));
                        if let Some(attached) = self.cache.as_mut() {
                            attached.cache.insert(url.to_owned(), text.clone());
                            attached.modified = true;
                        }
                        text
                    }
                };

                Ok(entry.insert(text).as_str())
            }
        }
    }

    /// Number of texts that were actually fetched, not restored from memory or cache.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }

    /// Writes the persistent cache, if one is attached and new texts were fetched.
    pub fn persist(&self) -> Result<(), CacheError> {
        match &self.cache {
            Some(attached) if attached.modified => {
                info!("Writing license cache: {:?}", &attached.path);
                attached
                    .cache
                    .save(&attached.path)
                    .attach_printable_lazy(|| CPath::from(&attached.path))
            }
            _ => Ok(()),
        }
    }
}
