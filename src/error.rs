// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::{ffi::OsStr, fmt, path::PathBuf};

use crate::Dependency;

/// Path attached to an error report.
#[derive(Debug, Clone)]
pub struct CPath(pub PathBuf);

impl<T: AsRef<OsStr>> From<T> for CPath {
    fn from(value: T) -> Self {
        Self(value.as_ref().into())
    }
}

impl fmt::Display for CPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path: {}", self.0.to_string_lossy())
    }
}

/// Dependency coordinate attached to an error report.
#[derive(Debug, Clone)]
pub struct CDependency(pub Dependency);

impl From<&Dependency> for CDependency {
    fn from(value: &Dependency) -> Self {
        Self(value.clone())
    }
}

impl fmt::Display for CDependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Dependency: {}", self.0)
    }
}

/// Url attached to an error report.
#[derive(Debug, Clone)]
pub struct CUrl(pub String);

impl<T: AsRef<str>> From<T> for CUrl {
    fn from(value: T) -> Self {
        Self(value.as_ref().to_owned())
    }
}

impl fmt::Display for CUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Url: {}", self.0)
    }
}
