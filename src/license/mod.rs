// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};

use log::debug;

use crate::{Dependency, Pom};

mod cache;
mod fetch;

pub use cache::{global_cache_path, CacheError, LicenseCache};
pub use fetch::{clean, FetchError, FetchLicense, HttpFetcher, LicenseFetchError, LicenseTexts};

/// License urls that replace the urls found in POMs.
///
/// Keys are either `groupId/artifactId` or just `groupId`. The former takes precedence.
/// Values are url templates that may contain `{groupId}`, `{artifactId}` and `{version}`.
///
/// The default table holds overrides for packages whose POMs either link to the project
/// front-page or to generic license text without copyrights:
/// ```
/// # use notice_fetcher::{Dependency, license::LicenseOverrides};
/// let overrides = LicenseOverrides::default();
/// let dependency = Dependency::new("com.github.jnr", "jnr-x86asm", "1.0.2");
/// assert_eq!(
///     overrides.resolve(&dependency).unwrap(),
///     "https://raw.githubusercontent.com/jnr/jnr-x86asm/1.0.2/LICENSE"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseOverrides(pub BTreeMap<String, String>);

impl Deref for LicenseOverrides {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for LicenseOverrides {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Default for LicenseOverrides {
    fn default() -> Self {
        Self(BTreeMap::from([
            (
                "org.ow2.asm".to_owned(),
                "https://raw.githubusercontent.com/llbit/ow2-asm/master/LICENSE.txt".to_owned(),
            ),
            (
                "com.github.jnr/jnr-posix".to_owned(),
                "https://raw.githubusercontent.com/jnr/jnr-posix/jnr-posix-{version}/LICENSE.txt"
                    .to_owned(),
            ),
            (
                "com.github.jnr/jnr-x86asm".to_owned(),
                "https://raw.githubusercontent.com/jnr/jnr-x86asm/{version}/LICENSE".to_owned(),
            ),
        ]))
    }
}

impl LicenseOverrides {
    /// Table without any overrides.
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Expanded override url for a dependency, if there is one.
    pub fn resolve(&self, dependency: &Dependency) -> Option<String> {
        let template = self
            .get(&format!("{}/{}", dependency.group_id, dependency.artifact_id))
            .or_else(|| self.get(&dependency.group_id))?;

        Some(expand_template(template, dependency))
    }
}

impl From<BTreeMap<String, String>> for LicenseOverrides {
    fn from(value: BTreeMap<String, String>) -> Self {
        LicenseOverrides(value)
    }
}

fn expand_template(template: &str, dependency: &Dependency) -> String {
    template
        .replace("{groupId}", &dependency.group_id)
        .replace("{artifactId}", &dependency.artifact_id)
        .replace("{version}", &dependency.version)
}

/// Url the license text of a dependency is fetched from.
///
/// An override takes precedence over the url of the POM. `None` means, that the license is missing.
pub fn resolve_license_url(
    overrides: &LicenseOverrides,
    dependency: &Dependency,
    pom: &Pom,
) -> Option<String> {
    if let Some(url) = overrides.resolve(dependency) {
        debug!("Using license override for {}: {}", dependency, &url);
        return Some(url);
    }

    pom.license_url().map(str::to_owned)
}
