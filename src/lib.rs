// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generate third-party license information for binary distributions of Maven projects.
//!
//! `notice-fetcher` inspects the compile scope dependencies of a Maven build, unpacks them,
//! finds the directories holding their class files, reads the license information from their
//! POMs and fetches the actual license texts. The result are two files:
//!
//! * a `NOTICE` file that is shipped with the binary distribution (for example inside of a
//!   `jar-with-dependencies`) and holds the full license text for every dependency,
//! * a `THIRDPARTY.md` file, that gives a short overview in form of a markdown table.
//!
//! ## Example
//!
//! ```no_run
//! use notice_fetcher::config::ConfigBuilder;
//! use notice_fetcher::generate::generate;
//!
//! let config = ConfigBuilder::default()
//!     .project_dir(".")
//!     .build()
//!     .expect("Failed validating config build.");
//!
//! let report = generate(&config).expect("Failed generating license notices.");
//!
//! if let Some(dependency) = report.missing_license {
//!     eprintln!("License is missing for {}", dependency);
//! }
//! ```
//!
//! When using this crate to update license information, verify that the sources that are
//! unpacked into the dependency directory (`target/dependency` by default) match the license.
//!
//! ## Feature Flags
//! | Feature            | Description                                                    |
//! | ------------------ | -------------------------------------------------------------- |
//! | `config_from_path` | Enables reading the configuration from `notice-fetcher.toml`.  |

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Configuration structs and builders.
pub mod config;
#[cfg(test)]
mod debug;
/// Attachments for error reports.
pub mod error;
/// The driver writing `NOTICE` and `THIRDPARTY.md`.
pub mod generate;
/// Resolving, fetching and caching license texts.
pub mod license;
/// Listing and unpacking dependencies with `mvn`.
pub mod maven;
/// Rendering of `NOTICE` sections and `THIRDPARTY.md` rows.
pub mod output;
/// Parsing of package descriptors.
pub mod pom;
/// Scanning unpacked archives for class directories.
pub mod scan;

pub use pom::{Pom, PomLicense};
pub use scan::ClassDirectories;

/// Coordinate of a Maven dependency.
///
/// The ordering is the ordering of group id, artifact id and version as strings.
/// Dependencies are processed and written out in this order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Path of this dependency in a repository layout, separated by `/`.
    ///
    /// ```
    /// # use notice_fetcher::Dependency;
    /// let dependency = Dependency::new("org.ow2.asm", "asm", "9.1");
    /// assert_eq!(dependency.repository_path(), "org/ow2/asm/asm/9.1");
    /// ```
    pub fn repository_path(&self) -> String {
        self.group_id
            .split('.')
            .chain([self.artifact_id.as_str(), self.version.as_str()])
            .collect::<Vec<&str>>()
            .join("/")
    }

    /// Directory this dependency was unpacked into, given the dependency directory.
    pub fn unpacked_dir(&self, dependency_dir: impl AsRef<Path>) -> PathBuf {
        let mut path = dependency_dir.as_ref().to_path_buf();
        path.extend(self.group_id.split('.'));
        path.push(&self.artifact_id);
        path.push(&self.version);
        path
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A dependency that was written to both `NOTICE` and `THIRDPARTY.md`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeEntry {
    pub dependency: Dependency,
    pub class_dirs: ClassDirectories,
    pub pom: Pom,
    pub license_url: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationReport {
    /// Written dependencies in the order they were written.
    pub entries: Vec<NoticeEntry>,
    /// Dependency without license url, that stopped the processing of all following dependencies.
    pub missing_license: Option<Dependency>,
}

impl GenerationReport {
    /// `true` if every listed dependency was written.
    pub fn is_complete(&self) -> bool {
        self.missing_license.is_none()
    }
}
