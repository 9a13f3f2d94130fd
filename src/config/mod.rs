// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! This module holds the structs and enums to configure the generation of license notices.
//!
//! The only required value is the project directory, the directory holding the `pom.xml`.
//! Every other path is resolved relative to it, if it is not absolute.
//!
//! ```
//! use notice_fetcher::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::default()
//!     .project_dir("/home/user/my-project")
//!     .notice_path("NOTICE")
//!     .build()
//!     .expect("Failed validating config build.");
//!
//! assert_eq!(config.scope, "compile");
//! ```

use std::{
    collections::BTreeSet,
    ops::{Deref, DerefMut},
    path::{Path, PathBuf},
    time::Duration,
};

use derive_builder::{Builder, UninitializedFieldError};
use error_stack::Report;
use thiserror::Error;

use crate::license::LicenseOverrides;
use maven_home::maven_executable;

#[cfg(feature = "config_from_path")]
pub mod from_path;

mod maven_home;

/// Directory Maven unpacks dependencies into, relative to the project directory.
pub const DEFAULT_DEPENDENCY_DIR: &str = "target/dependency";
/// Location of the `NOTICE` file, relative to the project directory.
pub const DEFAULT_NOTICE_PATH: &str = "src/main/resources/META-INF/NOTICE";
/// Location of the `THIRDPARTY.md` file, relative to the project directory.
pub const DEFAULT_LISTING_PATH: &str = "THIRDPARTY.md";
/// Repository the sources of dependencies are available at.
pub const DEFAULT_SOURCE_REPOSITORY_URL: &str = "https://repo.maven.apache.org/maven2";

/// Configure where fetched license texts are cached between runs.
///
/// License texts are always cached in memory for the duration of a single run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CacheSaveLocation {
    /// Disables the persistent cache.
    #[default]
    None,
    /// Save the cache in the users cache directory.
    ///
    /// Uses [ProjectDirs::cache_dir](directories::ProjectDirs::cache_dir) for the location.
    Global,
    /// Save the cache to the given file.
    ///
    /// Relative paths are resolved against the project directory.
    Path(PathBuf),
}

/// Struct to configure the generation of `NOTICE` and `THIRDPARTY.md`.
///
/// It is recommended to create this struct via [ConfigBuilder]:
/// ```
/// use notice_fetcher::config::ConfigBuilder;
///
/// let config = ConfigBuilder::default()
///     .project_dir(".")
///     .scope("runtime")
///     .build()
///     .expect("Failed validating config build.");
///
/// assert!(config.ignored_class_files.contains("module-info.class"));
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned")]
#[builder(build_fn(error = "ConfigBuildReport", validate = "Self::validate"))]
#[builder(derive(Debug, Clone))]
pub struct Config {
    /// Path to the directory that holds the `pom.xml` of the project.
    #[builder(setter(into))]
    pub project_dir: PathBuf,
    /// Path to the `mvn` executable.
    ///
    /// By default the executable is taken from `MAVEN_HOME`, or if not set, `mvn` is searched in `PATH`.
    #[builder(setter(into), default = maven_executable())]
    pub mvn_path: PathBuf,
    /// Directory the dependencies are copied and unpacked into.
    #[builder(setter(into), default = PathBuf::from(DEFAULT_DEPENDENCY_DIR))]
    pub dependency_dir: PathBuf,
    /// Output path of the `NOTICE` file.
    #[builder(setter(into), default = PathBuf::from(DEFAULT_NOTICE_PATH))]
    pub notice_path: PathBuf,
    /// Output path of the `THIRDPARTY.md` file.
    #[builder(setter(into), default = PathBuf::from(DEFAULT_LISTING_PATH))]
    pub listing_path: PathBuf,
    /// Maven scope of the dependencies that are distributed.
    #[builder(setter(into), default = String::from("compile"))]
    pub scope: String,
    /// Names of class files that are not covered by a license.
    #[builder(default = BTreeSet::from(["module-info.class".to_owned()]))]
    pub ignored_class_files: BTreeSet<String>,
    /// Base url of the repository that serves the sources of dependencies.
    #[builder(setter(into), default = DEFAULT_SOURCE_REPOSITORY_URL.to_owned())]
    pub source_repository_url: String,
    /// License urls that are used instead of the ones found in the POMs.
    #[builder(default)]
    pub license_overrides: LicenseOverrides,
    /// Timeout for a single license text fetch.
    #[builder(default = Duration::from_secs(30))]
    pub fetch_timeout: Duration,
    /// Set the location where fetched license texts are saved to.
    #[builder(default)]
    pub cache_save_location: CacheSaveLocation,
}

impl ConfigBuilder {
    fn validate(&self) -> Result<(), ConfigBuildReport> {
        if let Some(scope) = &self.scope {
            if scope.trim().is_empty() {
                return Err(Report::new(ConfigBuildError::ValidationError)
                    .attach_printable("Maven scope must not be empty.")
                    .into());
            }
        }
        if let Some(url) = &self.source_repository_url {
            if url.trim().is_empty() {
                return Err(Report::new(ConfigBuildError::ValidationError)
                    .attach_printable("Source repository url must not be empty.")
                    .into());
            }
        }
        Ok(())
    }
}

impl Config {
    /// Resolves a path relative to the project directory.
    pub fn project_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.project_dir.join(path)
    }

    /// Absolute or project relative dependency directory.
    pub fn resolved_dependency_dir(&self) -> PathBuf {
        self.project_path(&self.dependency_dir)
    }

    /// Absolute or project relative path of the `NOTICE` file.
    pub fn resolved_notice_path(&self) -> PathBuf {
        self.project_path(&self.notice_path)
    }

    /// Absolute or project relative path of the `THIRDPARTY.md` file.
    pub fn resolved_listing_path(&self) -> PathBuf {
        self.project_path(&self.listing_path)
    }

    /// Link to the `NOTICE` file from within `THIRDPARTY.md`.
    ///
    /// Relative to the directory of the listing with `/` separators if the notice lies below it,
    /// the absolute notice path otherwise.
    pub fn notice_link(&self) -> String {
        let notice_path = self.resolved_notice_path();
        let listing_path = self.resolved_listing_path();

        match listing_path
            .parent()
            .and_then(|dir| notice_path.strip_prefix(dir).ok())
        {
            Some(relative) => relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            None => notice_path.display().to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigBuildError {
    #[error("Required field in builder is not initialized.")]
    UninitializedField,
    #[error("Validation of input failed.")]
    ValidationError,
    #[error("Failed fetching fields from configuration file.")]
    FailedFromPath,
}

#[derive(Debug)]
pub struct ConfigBuildReport(pub Report<ConfigBuildError>);

impl Deref for ConfigBuildReport {
    type Target = Report<ConfigBuildError>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ConfigBuildReport {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<UninitializedFieldError> for ConfigBuildReport {
    fn from(value: UninitializedFieldError) -> Self {
        Report::new(value)
            .change_context(ConfigBuildError::UninitializedField)
            .into()
    }
}

impl From<Report<ConfigBuildError>> for ConfigBuildReport {
    fn from(value: Report<ConfigBuildError>) -> Self {
        ConfigBuildReport(value)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::debug::setup_test;

    use super::*;

    #[test]
    fn test_config_defaults() {
        setup_test();
        let config = ConfigBuilder::default()
            .project_dir("/tmp/project")
            .build()
            .unwrap();

        assert_eq!(config.scope, "compile");
        assert_eq!(config.dependency_dir, PathBuf::from("target/dependency"));
        assert_eq!(
            config.resolved_notice_path(),
            PathBuf::from("/tmp/project/src/main/resources/META-INF/NOTICE")
        );
        assert_eq!(
            config.resolved_listing_path(),
            PathBuf::from("/tmp/project/THIRDPARTY.md")
        );
        assert_eq!(config.cache_save_location, CacheSaveLocation::None);
        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert!(config.license_overrides.get("org.ow2.asm").is_some());
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        setup_test();
        let config = ConfigBuilder::default()
            .project_dir("/tmp/project")
            .listing_path("/srv/out/THIRDPARTY.md")
            .build()
            .unwrap();

        assert_eq!(
            config.resolved_listing_path(),
            PathBuf::from("/srv/out/THIRDPARTY.md")
        );
    }

    #[test]
    fn test_notice_link() {
        setup_test();
        let config = ConfigBuilder::default()
            .project_dir("/tmp/project")
            .build()
            .unwrap();
        assert_eq!(config.notice_link(), "src/main/resources/META-INF/NOTICE");

        let config = ConfigBuilder::default()
            .project_dir("/tmp/project")
            .notice_path("dist/NOTICE")
            .listing_path("dist/THIRDPARTY.md")
            .build()
            .unwrap();
        assert_eq!(config.notice_link(), "NOTICE");

        let config = ConfigBuilder::default()
            .project_dir("/tmp/project")
            .notice_path("/srv/NOTICE")
            .build()
            .unwrap();
        assert_eq!(config.notice_link(), "/srv/NOTICE");
    }

    #[test]
    fn test_missing_project_dir() {
        setup_test();
        let err = ConfigBuilder::default().build().unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConfigBuildError::UninitializedField
        ));
    }

    #[test]
    fn test_empty_scope_is_rejected() {
        setup_test();
        let err = ConfigBuilder::default()
            .project_dir(".")
            .scope("  ")
            .build()
            .unwrap_err();
        assert!(matches!(
            err.current_context(),
            ConfigBuildError::ValidationError
        ));
    }
}
