// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{env::var_os, path::PathBuf};

use error_stack::{ensure, Report, Result};
use log::{debug, warn};
use thiserror::Error;

use crate::error::CPath;

#[cfg(windows)]
const MVN_EXECUTABLE: &str = "mvn.cmd";
#[cfg(not(windows))]
const MVN_EXECUTABLE: &str = "mvn";

#[derive(Debug, Clone, Copy, Error)]
pub enum MavenHomeError {
    #[error("Given maven home folder location does not exist.")]
    DoesNotExist,
    #[error("Given maven home path is not a folder.")]
    IsNotDir,
    #[error("Maven home does not contain a `mvn` executable.")]
    MissingExecutable,
}

/// Maven home directory from `MAVEN_HOME` or the legacy `M2_HOME`.
fn maven_home() -> Result<Option<PathBuf>, MavenHomeError> {
    let Some(maven_home) = var_os("MAVEN_HOME")
        .or_else(|| var_os("M2_HOME"))
        .map(PathBuf::from)
    else {
        return Ok(None);
    };

    ensure!(
        maven_home.exists(),
        Report::new(MavenHomeError::DoesNotExist).attach_printable(CPath::from(&maven_home))
    );
    ensure!(
        maven_home.is_dir(),
        Report::new(MavenHomeError::IsNotDir).attach_printable(CPath::from(&maven_home))
    );

    Ok(Some(maven_home))
}

fn mvn_in_maven_home() -> Result<Option<PathBuf>, MavenHomeError> {
    let Some(maven_home) = maven_home()? else {
        return Ok(None);
    };

    let mvn = maven_home.join("bin").join(MVN_EXECUTABLE);
    ensure!(
        mvn.is_file(),
        Report::new(MavenHomeError::MissingExecutable).attach_printable(CPath::from(&mvn))
    );

    Ok(Some(mvn))
}

/// Path to `mvn`.
///
/// Prefers the executable in the maven home directory and falls back to searching `PATH`.
pub(crate) fn maven_executable() -> PathBuf {
    match mvn_in_maven_home() {
        Ok(Some(mvn)) => {
            debug!("Using mvn from maven home: {:?}", &mvn);
            mvn
        }
        Ok(None) => PathBuf::from(MVN_EXECUTABLE),
        Err(report) => {
            warn!("Ignoring maven home: {:?}", report);
            PathBuf::from(MVN_EXECUTABLE)
        }
    }
}
