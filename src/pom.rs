// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use error_stack::{Result, ResultExt};
use log::trace;
use roxmltree::{Document, Node};
use serde::Serialize;
use thiserror::Error;

use crate::error::{CDependency, CPath};
use crate::Dependency;

/// Namespace of `pom.xml` files with model version 4.0.0.
pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";

#[derive(Debug, Clone, Copy, Error)]
pub enum PomError {
    #[error("Failed to read the POM.")]
    Read,
    #[error("Failed to parse the POM.")]
    Parse,
}

/// First license declared in a POM.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PomLicense {
    pub name: Option<String>,
    pub url: Option<String>,
}

/// Information of a package descriptor that ends up in the license listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Pom {
    /// Developer names in document order.
    pub developers: Vec<String>,
    pub license: Option<PomLicense>,
}

// Older POMs do not declare a namespace.
fn is_pom_element(node: &Node, name: &str) -> bool {
    node.is_element()
        && node.tag_name().name() == name
        && matches!(node.tag_name().namespace(), None | Some(POM_NAMESPACE))
}

fn children<'a, 'input>(
    node: Node<'a, 'input>,
    name: &'static str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |c| is_pom_element(c, name))
}

fn child_text(node: Node, name: &'static str) -> Option<String> {
    children(node, name)
        .next()
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_owned)
}

impl Pom {
    /// Parses the developers and the first license of a POM.
    ///
    /// ```
    /// # use notice_fetcher::Pom;
    /// let pom = Pom::from_xml(r#"
    ///     <project xmlns="http://maven.apache.org/POM/4.0.0">
    ///       <licenses>
    ///         <license>
    ///           <name>BSD-3-Clause</name>
    ///           <url>https://asm.ow2.io/license.html</url>
    ///         </license>
    ///       </licenses>
    ///       <developers>
    ///         <developer><name>Eric Bruneton</name></developer>
    ///         <developer><name>Eugene Kuleshov</name></developer>
    ///       </developers>
    ///     </project>
    /// "#).unwrap();
    ///
    /// assert_eq!(pom.authors(), "Eric Bruneton, Eugene Kuleshov");
    /// assert_eq!(pom.license_url(), Some("https://asm.ow2.io/license.html"));
    /// ```
    pub fn from_xml(xml: &str) -> Result<Self, PomError> {
        let document = Document::parse(xml).change_context(PomError::Parse)?;

        let developers = document
            .descendants()
            .filter(|n| is_pom_element(n, "developers"))
            .flat_map(|n| children(n, "developer"))
            .flat_map(|n| children(n, "name"))
            .map(|n| n.text().map(str::trim).unwrap_or_default().to_owned())
            .collect();

        let license = document
            .descendants()
            .filter(|n| is_pom_element(n, "licenses"))
            .flat_map(|n| children(n, "license"))
            .next()
            .map(|n| PomLicense {
                name: child_text(n, "name"),
                url: child_text(n, "url"),
            });

        Ok(Pom {
            developers,
            license,
        })
    }

    /// Developer names joined by `, `.
    pub fn authors(&self) -> String {
        self.developers.join(", ")
    }

    pub fn license_name(&self) -> Option<&str> {
        self.license.as_ref().and_then(|l| l.name.as_deref())
    }

    pub fn license_url(&self) -> Option<&str> {
        self.license.as_ref().and_then(|l| l.url.as_deref())
    }
}

/// Path of the POM that Maven copied next to the unpacked archive.
pub fn pom_path(dependency_dir: &Path, dependency: &Dependency) -> PathBuf {
    dependency
        .unpacked_dir(dependency_dir)
        .join(format!("{}-{}.pom", dependency.artifact_id, dependency.version))
}

/// Reads the POM of a dependency from the dependency directory.
pub fn read_pom(dependency_dir: &Path, dependency: &Dependency) -> Result<Pom, PomError> {
    let path = pom_path(dependency_dir, dependency);
    trace!("Reading POM: {:?}", &path);

    let xml = read_to_string(&path)
        .change_context(PomError::Read)
        .attach_printable_lazy(|| CPath::from(&path))
        .attach_printable_lazy(|| CDependency::from(dependency))?;

    Pom::from_xml(&xml)
        .attach_printable_lazy(|| CPath::from(&path))
        .attach_printable_lazy(|| CDependency::from(dependency))
}
