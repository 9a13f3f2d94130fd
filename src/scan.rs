// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::path::{Component, Path};

use error_stack::{bail, Report, Result, ResultExt};
use log::{trace, warn};
use thiserror::Error;
use walkdir::WalkDir;

use crate::error::{CDependency, CPath};
use crate::Dependency;

/// Directories inside of an unpacked archive, that hold licensable files.
///
/// Paths are relative to the unpacked archive and separated by `/`.
pub type ClassDirectories = BTreeSet<String>;

#[derive(Debug, Clone, Copy, Error)]
pub enum ScanError {
    #[error("Failed walking the unpacked archive.")]
    Walk,
    #[error("Found a class file in the root of the unpacked archive.")]
    ClassAtRoot,
}

fn relative_dir(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(segment) => Some(segment.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Collects the directories containing class files of an unpacked dependency.
///
/// Class files with a name in `ignored` (like `module-info.class`) are skipped. The result is
/// reduced with [unify_paths].
pub fn scan_unpacked(
    dependency_dir: &Path,
    dependency: &Dependency,
    ignored: &BTreeSet<String>,
) -> Result<ClassDirectories, ScanError> {
    let prefix = dependency.unpacked_dir(dependency_dir);
    trace!("Scanning for class files in: {:?}", &prefix);

    if !prefix.is_dir() {
        warn!("Dependency {} was not unpacked to {:?}", dependency, &prefix);
        return Ok(ClassDirectories::new());
    }

    let mut class_dirs = BTreeSet::new();

    for entry in WalkDir::new(&prefix).sort_by_file_name() {
        let entry = entry
            .change_context(ScanError::Walk)
            .attach_printable_lazy(|| CDependency::from(dependency))?;

        if !entry.file_type().is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy();
        if !file_name.ends_with(".class") || ignored.contains(&*file_name) {
            continue;
        }

        let relative = entry
            .path()
            .parent()
            .and_then(|parent| parent.strip_prefix(&prefix).ok())
            .map(relative_dir)
            .unwrap_or_default();

        if relative.is_empty() {
            bail!(Report::new(ScanError::ClassAtRoot)
                .attach_printable(CPath::from(entry.path()))
                .attach_printable(CDependency::from(dependency)));
        }

        class_dirs.insert(relative);
    }

    Ok(unify_paths(class_dirs))
}

fn covers(parent: &str, path: &str) -> bool {
    path == parent
        || path
            .strip_prefix(parent)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Removes every path that lies within another path of the set.
///
/// Paths are compared by whole components, not as plain string prefixes: `org/objectweb/asmx`
/// does not lie within `org/objectweb/asm`.
///
/// ```
/// # use std::collections::BTreeSet;
/// # use notice_fetcher::scan::unify_paths;
/// let paths = BTreeSet::from(["org/objectweb/asm", "org/objectweb/asm/signature", "org/objectweb/asmx"].map(String::from));
/// assert_eq!(
///     unify_paths(paths),
///     BTreeSet::from(["org/objectweb/asm", "org/objectweb/asmx"].map(String::from))
/// );
/// ```
pub fn unify_paths(paths: impl IntoIterator<Item = String>) -> ClassDirectories {
    let sorted: BTreeSet<String> = paths.into_iter().collect();
    let mut unified = ClassDirectories::new();

    for path in sorted {
        if !unified.iter().any(|kept| covers(kept, &path)) {
            unified.insert(path);
        }
    }

    unified
}

#[cfg(test)]
mod test {
    use std::fs::{create_dir_all, write};

    use pretty_assertions::assert_eq;

    use crate::debug::setup_test;

    use super::*;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        create_dir_all(path.parent().unwrap()).unwrap();
        write(path, b"\xca\xfe\xba\xbe").unwrap();
    }

    fn set(paths: &[&str]) -> ClassDirectories {
        paths.iter().map(|p| p.to_string()).collect()
    }

    fn ignored() -> BTreeSet<String> {
        BTreeSet::from(["module-info.class".to_owned()])
    }

    #[test]
    fn test_unify_paths() {
        assert_eq!(
            unify_paths(set(&["b/c", "a", "a/b", "a/b/c", "b", "ab"])),
            set(&["a", "ab", "b"])
        );
        assert_eq!(unify_paths(set(&[])), set(&[]));
    }

    #[test]
    fn test_scan_unpacked() -> Result<(), ScanError> {
        setup_test();
        let dir = tempfile::tempdir().unwrap();
        let dependency = Dependency::new("org.ow2.asm", "asm-util", "9.1");
        let root = dependency.unpacked_dir(dir.path());

        touch(&root, "module-info.class");
        touch(&root, "asm-util-9.1.pom");
        touch(&root, "asm-util-9.1.jar");
        touch(&root, "META-INF/MANIFEST.MF");
        touch(&root, "org/objectweb/asm/util/Printer.class");
        touch(&root, "org/objectweb/asm/util/Printer.java");
        touch(&root, "org/objectweb/asm/util/sub/Inner.class");
        touch(&root, "org/objectweb/asmx/Other.class");
        touch(&root, "META-INF/versions/9/module-info.class");

        let class_dirs = scan_unpacked(dir.path(), &dependency, &ignored())?;
        assert_eq!(
            class_dirs,
            set(&["org/objectweb/asm/util", "org/objectweb/asmx"])
        );

        Ok(())
    }

    #[test]
    fn test_class_at_root() {
        setup_test();
        let dir = tempfile::tempdir().unwrap();
        let dependency = Dependency::new("org.example", "flat", "1.0");
        touch(&dependency.unpacked_dir(dir.path()), "Main.class");

        let err = scan_unpacked(dir.path(), &dependency, &ignored()).unwrap_err();
        assert!(matches!(err.current_context(), ScanError::ClassAtRoot));
    }

    #[test]
    fn test_not_unpacked() -> Result<(), ScanError> {
        setup_test();
        let dir = tempfile::tempdir().unwrap();
        let dependency = Dependency::new("org.example", "absent", "1.0");

        assert!(scan_unpacked(dir.path(), &dependency, &ignored())?.is_empty());

        Ok(())
    }
}
