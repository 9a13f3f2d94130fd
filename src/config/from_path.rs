// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{BTreeMap, BTreeSet};
use std::fs::read_to_string;
use std::path::PathBuf;
use std::time::Duration;

use error_stack::{ensure, Result, ResultExt};
use serde::Deserialize;
use thiserror::Error;

use super::*;
use crate::error::CPath;

/// File name of the configuration file searched for in directories.
pub const CONFIG_FILE_NAME: &str = "notice-fetcher.toml";

/// Error that appears during failed build of config via [ConfigBuilder::from_path()].
#[derive(Debug, Error)]
pub enum FromPathError {
    #[error("The requested path does not exist or this program does not have the permission to access it.")]
    PathDoesNotExist,
    #[error("Configuration file not found.")]
    ConfigNotFound,
    #[error("Io error.")]
    Io,
    #[error("Failure parsing 'notice-fetcher.toml'.")]
    TomlParseError,
    #[error("Configuration file found but parent path not.")]
    ConfigParentPathNotFound,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    project_dir: Option<PathBuf>,
    mvn_path: Option<PathBuf>,
    dependency_dir: Option<PathBuf>,
    notice_path: Option<PathBuf>,
    listing_path: Option<PathBuf>,
    scope: Option<String>,
    ignored_class_files: Option<BTreeSet<String>>,
    source_repository_url: Option<String>,
    fetch_timeout_secs: Option<u64>,
    cache: Option<String>,
    #[serde(default)]
    license_overrides: BTreeMap<String, String>,
}

fn cache_save_location(value: &str) -> CacheSaveLocation {
    match value {
        "none" => CacheSaveLocation::None,
        "global" => CacheSaveLocation::Global,
        path => CacheSaveLocation::Path(PathBuf::from(path)),
    }
}

fn config_file_path(uncertain_path: PathBuf) -> Result<PathBuf, FromPathError> {
    if uncertain_path.is_file() {
        return Ok(uncertain_path);
    }

    let path = uncertain_path.join(CONFIG_FILE_NAME);
    ensure!(
        path.is_file(),
        Report::new(FromPathError::ConfigNotFound).attach_printable(CPath::from(&path))
    );

    Ok(path)
}

impl ConfigBuilder {
    /// New builder with values being filled from a configuration file (`notice-fetcher.toml`).
    ///
    /// Expects either a path directly to the configuration file or to it's parent directory.
    /// The project directory defaults to the directory of the configuration file.
    /// Relative project directories are resolved against it, too.
    ///
    /// ```toml
    /// scope = "compile"
    /// notice_path = "src/main/resources/META-INF/NOTICE"
    /// cache = "global"
    ///
    /// [license_overrides]
    /// "org.ow2.asm" = "https://raw.githubusercontent.com/llbit/ow2-asm/master/LICENSE.txt"
    /// ```
    pub fn from_path(config_path: impl Into<PathBuf>) -> Result<Self, FromPathError> {
        let config_path: PathBuf = config_path.into();

        ensure!(
            config_path.try_exists().change_context(FromPathError::Io)?,
            Report::new(FromPathError::PathDoesNotExist).attach_printable(CPath::from(&config_path))
        );

        let config_file_path = config_file_path(config_path)?;

        let config_toml: ConfigToml = toml::from_str(
            &read_to_string(&config_file_path)
                .change_context(FromPathError::Io)
                .attach_printable_lazy(|| CPath::from(&config_file_path))?,
        )
        .change_context(FromPathError::TomlParseError)
        .attach_printable_lazy(|| CPath::from(&config_file_path))?;

        let config_dir = config_file_path
            .parent()
            .ok_or_else(|| Report::new(FromPathError::ConfigParentPathNotFound))?;

        let project_dir = match config_toml.project_dir {
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };

        let mut builder = ConfigBuilder::default().project_dir(project_dir);

        if let Some(mvn_path) = config_toml.mvn_path {
            builder = builder.mvn_path(mvn_path);
        }
        if let Some(dependency_dir) = config_toml.dependency_dir {
            builder = builder.dependency_dir(dependency_dir);
        }
        if let Some(notice_path) = config_toml.notice_path {
            builder = builder.notice_path(notice_path);
        }
        if let Some(listing_path) = config_toml.listing_path {
            builder = builder.listing_path(listing_path);
        }
        if let Some(scope) = config_toml.scope {
            builder = builder.scope(scope);
        }
        if let Some(ignored) = config_toml.ignored_class_files {
            builder = builder.ignored_class_files(ignored);
        }
        if let Some(url) = config_toml.source_repository_url {
            builder = builder.source_repository_url(url);
        }
        if let Some(secs) = config_toml.fetch_timeout_secs {
            builder = builder.fetch_timeout(Duration::from_secs(secs));
        }
        if let Some(cache) = config_toml.cache {
            builder = builder.cache_save_location(cache_save_location(&cache));
        }
        if !config_toml.license_overrides.is_empty() {
            let mut overrides = LicenseOverrides::default();
            overrides.extend(config_toml.license_overrides);
            builder = builder.license_overrides(overrides);
        }

        Ok(builder)
    }
}

#[cfg(test)]
mod test {
    use std::fs::write;

    use pretty_assertions::assert_eq;

    use crate::debug::setup_test;

    use super::*;

    const CONFIG: &str = r#"
scope = "runtime"
notice_path = "NOTICE"
fetch_timeout_secs = 5
cache = ".cache/licenses.bin"

[license_overrides]
"org.example/lib" = "https://example.org/{version}/LICENSE"
"#;

    #[test]
    fn test_from_path_with_dir_path() -> Result<(), FromPathError> {
        setup_test();
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join(CONFIG_FILE_NAME), CONFIG).unwrap();

        let conf = ConfigBuilder::from_path(dir.path())?
            .mvn_path("mvn")
            .build()
            .unwrap();

        assert_eq!(conf.project_dir, dir.path());
        assert_eq!(conf.scope, "runtime");
        assert_eq!(conf.resolved_notice_path(), dir.path().join("NOTICE"));
        assert_eq!(conf.fetch_timeout, Duration::from_secs(5));
        assert_eq!(
            conf.cache_save_location,
            CacheSaveLocation::Path(PathBuf::from(".cache/licenses.bin"))
        );
        assert!(conf.license_overrides.contains_key("org.example/lib"));
        assert!(conf.license_overrides.contains_key("org.ow2.asm"));

        Ok(())
    }

    #[test]
    fn test_from_path_with_file_path() -> Result<(), FromPathError> {
        setup_test();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("licenses.toml");
        write(&path, "project_dir = \"app\"\ncache = \"global\"\n").unwrap();

        let conf = ConfigBuilder::from_path(&path)?.build().unwrap();

        assert_eq!(conf.project_dir, dir.path().join("app"));
        assert_eq!(conf.cache_save_location, CacheSaveLocation::Global);
        assert_eq!(conf.license_overrides, LicenseOverrides::default());

        Ok(())
    }

    #[test]
    fn test_from_path_errors() {
        setup_test();
        let dir = tempfile::tempdir().unwrap();

        let err = ConfigBuilder::from_path(dir.path().join("missing")).unwrap_err();
        assert!(matches!(
            err.current_context(),
            FromPathError::PathDoesNotExist
        ));

        let err = ConfigBuilder::from_path(dir.path()).unwrap_err();
        assert!(matches!(err.current_context(), FromPathError::ConfigNotFound));

        write(dir.path().join(CONFIG_FILE_NAME), "scope = [").unwrap();
        let err = ConfigBuilder::from_path(dir.path()).unwrap_err();
        assert!(matches!(err.current_context(), FromPathError::TomlParseError));
    }
}
