// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{
    ffi::OsStr,
    process::{Command, Output},
};

use error_stack::{Report, Result, ResultExt};
use log::debug;
use thiserror::Error;

use crate::config::Config;
use crate::error::CPath;

#[derive(Debug, Clone, Copy, Error)]
pub enum ExecMvnError {
    #[error("`mvn` did not execute successfully.")]
    FailedExecution,
    #[error("Failed to execute `mvn`.")]
    FailedToExecute,
}

/// Runs `mvn` in batch mode in the project directory.
pub fn exec_mvn<I, S>(config: &Config, arguments: I) -> Result<Output, ExecMvnError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(&config.mvn_path);
    command
        .current_dir(&config.project_dir)
        .arg("--batch-mode")
        .args(arguments);

    let command_line = format!("{:?}", &command);
    debug!("Executing: {}", &command_line);

    let output = command
        .output()
        .change_context(ExecMvnError::FailedToExecute)
        .attach_printable_lazy(|| CPath::from(&config.mvn_path))
        .attach_printable_lazy(|| command_line.clone())?;

    if output.status.success() {
        Ok(output)
    } else {
        Err(Report::new(ExecMvnError::FailedExecution)
            .attach_printable(command_line)
            .attach_printable(format!("status: {}", output.status))
            .attach_printable(String::from_utf8_lossy(&output.stdout).into_owned())
            .attach_printable(String::from_utf8_lossy(&output.stderr).into_owned()))
    }
}
