// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;

use error_stack::{Result, ResultExt};
use log::{debug, info, warn};
use regex_lite::Regex;
use thiserror::Error;

use crate::config::Config;
use crate::error::CPath;
use crate::Dependency;

mod command;

pub use command::{exec_mvn, ExecMvnError};

#[derive(Debug, Clone, Copy, Error)]
pub enum ListDependenciesError {
    #[error("Failed to execute `mvn dependency:list`.")]
    ExecMvn,
    #[error("Failed to build the pattern matching dependency lines.")]
    Pattern,
}

#[derive(Debug, Clone, Copy, Error)]
pub enum UnpackError {
    #[error("Failed to copy dependencies.")]
    Copy,
    #[error("Failed to unpack dependencies.")]
    Unpack,
}

fn dependency_line_regex(scope: &str) -> Result<Regex, ListDependenciesError> {
    Regex::new(&format!(
        r"^.* (?P<group_id>[^:]+):(?P<artifact_id>[^:]+):jar:(?P<version>[^:]+):{}",
        regex_lite::escape(scope)
    ))
    .change_context(ListDependenciesError::Pattern)
    .attach_printable_lazy(|| format!("scope: {}", scope))
}

/// Parses the output of `mvn dependency:list`.
///
/// Only jar dependencies of the given scope are listed. Every other line is ignored.
///
/// ```
/// # use notice_fetcher::{Dependency, maven::parse_dependency_list};
/// let output = "[INFO]    org.ow2.asm:asm:jar:9.1:compile -- module org.objectweb.asm\n\
///               [INFO]    junit:junit:jar:4.13.2:test";
/// let dependencies = parse_dependency_list(output, "compile").unwrap();
/// assert_eq!(dependencies.len(), 1);
/// assert!(dependencies.contains(&Dependency::new("org.ow2.asm", "asm", "9.1")));
/// ```
pub fn parse_dependency_list(
    output: &str,
    scope: &str,
) -> Result<BTreeSet<Dependency>, ListDependenciesError> {
    let regex = dependency_line_regex(scope)?;

    Ok(output
        .lines()
        .filter_map(|line| regex.captures(line))
        .map(|captures| Dependency::new(&captures["group_id"], &captures["artifact_id"], &captures["version"]))
        .collect())
}

/// Lists the jar dependencies of the project in the configured scope via `mvn dependency:list`.
pub fn list_dependencies(config: &Config) -> Result<BTreeSet<Dependency>, ListDependenciesError> {
    let output = exec_mvn(config, ["-Dstyle.color=never", "dependency:list"])
        .change_context(ListDependenciesError::ExecMvn)?;

    let dependencies = parse_dependency_list(&String::from_utf8_lossy(&output.stdout), &config.scope)?;
    info!("Found {} dependencies in scope {}.", dependencies.len(), &config.scope);

    Ok(dependencies)
}

/// Copies dependencies with their POMs into the dependency directory and unpacks them.
///
/// Does nothing if the dependency directory already exists. Returns whether Maven was called.
///
/// Besides the binary archives, the source archives are unpacked as well. As many libraries do
/// not publish sources, a failure to unpack them is only logged.
pub fn unpack_dependencies(config: &Config) -> Result<bool, UnpackError> {
    let dependency_dir = config.resolved_dependency_dir();

    if dependency_dir.is_dir() {
        debug!("Dependencies are already unpacked: {:?}", &dependency_dir);
        return Ok(false);
    }

    info!("Unpacking dependencies into {:?}", &dependency_dir);

    let output_directory = format!("-DoutputDirectory={}", dependency_dir.display());
    let include_scope = format!("-DincludeScope={}", &config.scope);

    exec_mvn(
        config,
        [
            "dependency:copy-dependencies",
            "-Dmdep.copyPom",
            "-Dmdep.useRepositoryLayout",
            output_directory.as_str(),
        ],
    )
    .change_context(UnpackError::Copy)
    .attach_printable_lazy(|| CPath::from(&dependency_dir))?;

    exec_mvn(
        config,
        [
            "dependency:unpack-dependencies",
            include_scope.as_str(),
            "-Dmdep.useRepositoryLayout",
            output_directory.as_str(),
        ],
    )
    .change_context(UnpackError::Unpack)
    .attach_printable_lazy(|| CPath::from(&dependency_dir))?;

    if let Err(report) = exec_mvn(
        config,
        [
            "dependency:unpack-dependencies",
            "-Dclassifier=sources",
            include_scope.as_str(),
            "-Dmdep.useRepositoryLayout",
            output_directory.as_str(),
        ],
    ) {
        warn!("Failed unpacking sources of dependencies: {:?}", report);
    }

    Ok(true)
}
