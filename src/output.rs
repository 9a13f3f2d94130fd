// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::fmt;

use crate::{ClassDirectories, Dependency, Pom};

/// Preamble and table header of `THIRDPARTY.md`.
///
/// `notice_link` is the markdown link target of the `NOTICE` file, see [Config::notice_link].
///
/// [Config::notice_link]: crate::config::Config::notice_link
pub struct ListingHeader<'a> {
    pub notice_link: &'a str,
}

impl fmt::Display for ListingHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\
This file lists third-party software included in
'jar-with-dependencies' binary distribution. Where multiple licenses
are available, we choose the most permissive license to apply to the
corresponding part of the binary distribution.

For full license text and copyrights (where applicable) please refer
to the [NOTICE]({}) file.

| Group | Artifact | Version | Developers | License | License URL |
|-|-|-|-|-|-|
",
            self.notice_link
        )
    }
}

/// Section of the `NOTICE` file, that is included in the binary distribution and fulfills
/// third-party license requirements.
pub struct NoticeSection<'a> {
    pub dependency: &'a Dependency,
    pub class_dirs: &'a ClassDirectories,
    pub license_text: &'a str,
    /// Base url of the repository serving the sources, without trailing slash.
    pub source_repository_url: &'a str,
}

impl fmt::Display for NoticeSection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dependency = self.dependency;
        let header = format!(
            "{} {} {}",
            dependency.group_id, dependency.artifact_id, dependency.version
        );

        writeln!(f, "{}", header)?;
        writeln!(f, "{}", "-".repeat(header.chars().count()))?;
        writeln!(
            f,
            "Sources are available at {}/{}/\n",
            self.source_repository_url.trim_end_matches('/'),
            dependency.repository_path()
        )?;
        writeln!(
            f,
            "Files in the following directories: {}",
            self.class_dirs
                .iter()
                .map(String::as_str)
                .collect::<Vec<&str>>()
                .join(" ")
        )?;
        writeln!(f, "are distributed under the terms of the following license:\n")?;
        writeln!(f, "{}", self.license_text)?;
        writeln!(f, "\n")
    }
}

/// Row of the `THIRDPARTY.md` table.
///
/// The license url is always the one of the POM, even if the license text was fetched from an override.
pub struct ListingRow<'a> {
    pub dependency: &'a Dependency,
    pub pom: &'a Pom,
}

impl fmt::Display for ListingRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "| {} | {} | {} | {} | {} | {} |",
            self.dependency.group_id,
            self.dependency.artifact_id,
            self.dependency.version,
            self.pom.authors(),
            self.pom.license_name().unwrap_or_default(),
            self.pom.license_url().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::PomLicense;

    use super::*;

    #[test]
    fn test_listing_header_links_notice() {
        let header = ListingHeader {
            notice_link: "dist/NOTICE",
        }
        .to_string();

        assert!(header.starts_with("This file lists third-party software included in\n"));
        assert!(header.contains("\nto the [NOTICE](dist/NOTICE) file.\n"));
        assert!(header.ends_with("\n\n| Group | Artifact | Version | Developers | License | License URL |\n|-|-|-|-|-|-|\n"));
    }

    #[test]
    fn test_notice_section() {
        let dependency = Dependency::new("org.ow2.asm", "asm", "9.1");
        let class_dirs = ClassDirectories::from([
            "org/objectweb/asm/signature".to_owned(),
            "org/objectweb/asm".to_owned(),
        ]);
        let section = NoticeSection {
            dependency: &dependency,
            class_dirs: &class_dirs,
            license_text: "BSD License\n\nCopyright (c) 2000-2011 INRIA, France Telecom",
            source_repository_url: "https://repo.maven.apache.org/maven2/",
        };

        assert_eq!(
            section.to_string(),
            "org.ow2.asm asm 9.1\n\
             -------------------\n\
             Sources are available at https://repo.maven.apache.org/maven2/org/ow2/asm/asm/9.1/\n\
             \n\
             Files in the following directories: org/objectweb/asm org/objectweb/asm/signature\n\
             are distributed under the terms of the following license:\n\
             \n\
             BSD License\n\
             \n\
             Copyright (c) 2000-2011 INRIA, France Telecom\n\
             \n\
             \n"
        );
    }

    #[test]
    fn test_notice_section_without_class_dirs() {
        let dependency = Dependency::new("org.example", "resources", "1.0");
        let class_dirs = ClassDirectories::new();
        let section = NoticeSection {
            dependency: &dependency,
            class_dirs: &class_dirs,
            license_text: "",
            source_repository_url: "https://repo.example.org",
        };

        assert!(section
            .to_string()
            .contains("\nFiles in the following directories: \nare distributed"));
    }

    #[test]
    fn test_listing_row() {
        let dependency = Dependency::new("com.github.jnr", "jnr-posix", "3.1.15");
        let pom = Pom {
            developers: vec!["Wayne Meissner".to_owned(), "Charles Oliver Nutter".to_owned()],
            license: Some(PomLicense {
                name: Some("Eclipse Public License - v 2.0".to_owned()),
                url: Some("https://www.eclipse.org/legal/epl-2.0/".to_owned()),
            }),
        };

        assert_eq!(
            ListingRow {
                dependency: &dependency,
                pom: &pom
            }
            .to_string(),
            "| com.github.jnr | jnr-posix | 3.1.15 | Wayne Meissner, Charles Oliver Nutter \
             | Eclipse Public License - v 2.0 | https://www.eclipse.org/legal/epl-2.0/ |\n"
        );
    }

    #[test]
    fn test_listing_row_without_license() {
        let dependency = Dependency::new("org.example", "lib", "1.0");
        let pom = Pom::default();

        assert_eq!(
            ListingRow {
                dependency: &dependency,
                pom: &pom
            }
            .to_string(),
            "| org.example | lib | 1.0 |  |  |  |\n"
        );
    }
}
