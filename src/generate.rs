// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::BTreeSet;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use error_stack::{Result, ResultExt};
use log::{error, info};
use thiserror::Error;

use crate::config::{CacheSaveLocation, Config};
use crate::error::{CDependency, CPath};
use crate::license::{global_cache_path, resolve_license_url, FetchLicense, HttpFetcher, LicenseTexts};
use crate::maven::{list_dependencies, unpack_dependencies};
use crate::output::{ListingHeader, ListingRow, NoticeSection};
use crate::pom::read_pom;
use crate::scan::scan_unpacked;
use crate::{Dependency, GenerationReport, NoticeEntry};

#[derive(Debug, Clone, Copy, Error)]
pub enum GenerateError {
    #[error("Failed listing dependencies.")]
    ListDependencies,
    #[error("Failed unpacking dependencies.")]
    Unpack,
    #[error("Failed scanning an unpacked dependency.")]
    Scan,
    #[error("Failed reading the POM of a dependency.")]
    Pom,
    #[error("Failed fetching a license text.")]
    Fetch,
    #[error("Failed setting up the license cache.")]
    Cache,
    #[error("Failed writing output.")]
    Write,
}

/// Writes `NOTICE` sections and `THIRDPARTY.md` rows for the given dependencies.
///
/// Dependencies are processed in their sorted order. Processing stops at the first dependency
/// without license url. That dependency is reported in [GenerationReport::missing_license] and
/// everything written up to that point is kept. Every other failure is returned as error.
pub fn write_notice_and_listing<F, N, L>(
    config: &Config,
    dependencies: &BTreeSet<Dependency>,
    license_texts: &mut LicenseTexts<F>,
    notice: &mut N,
    listing: &mut L,
) -> Result<GenerationReport, GenerateError>
where
    F: FetchLicense,
    N: Write,
    L: Write,
{
    let dependency_dir = config.resolved_dependency_dir();
    let mut report = GenerationReport::default();

    write!(
        listing,
        "{}",
        ListingHeader {
            notice_link: &config.notice_link(),
        }
    )
    .change_context(GenerateError::Write)?;

    for dependency in dependencies {
        let class_dirs = scan_unpacked(&dependency_dir, dependency, &config.ignored_class_files)
            .change_context(GenerateError::Scan)?;
        let pom = read_pom(&dependency_dir, dependency).change_context(GenerateError::Pom)?;

        let Some(license_url) = resolve_license_url(&config.license_overrides, dependency, &pom)
        else {
            error!(dependency:display; "License is missing for {}", dependency);
            report.missing_license = Some(dependency.clone());
            break;
        };

        let license_text = license_texts
            .get(&license_url)
            .change_context(GenerateError::Fetch)
            .attach_printable_lazy(|| CDependency::from(dependency))?;

        write!(
            notice,
            "{}",
            NoticeSection {
                dependency,
                class_dirs: &class_dirs,
                license_text,
                source_repository_url: &config.source_repository_url,
            }
        )
        .change_context(GenerateError::Write)?;
        write!(
            listing,
            "{}",
            ListingRow {
                dependency,
                pom: &pom,
            }
        )
        .change_context(GenerateError::Write)?;

        report.entries.push(NoticeEntry {
            dependency: dependency.clone(),
            class_dirs,
            pom,
            license_url,
        });
    }

    Ok(report)
}

fn create_output(path: &Path) -> Result<BufWriter<File>, GenerateError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)
            .change_context(GenerateError::Write)
            .attach_printable_lazy(|| CPath::from(parent))?;
    }
    let file = File::create(path)
        .change_context(GenerateError::Write)
        .attach_printable_lazy(|| CPath::from(path))?;
    Ok(BufWriter::new(file))
}

/// Lists and unpacks the dependencies of the project and writes `NOTICE` and `THIRDPARTY.md`.
///
/// License texts are fetched via http and, if configured, cached between runs.
pub fn generate(config: &Config) -> Result<GenerationReport, GenerateError> {
    let instant_before_generation = Instant::now();

    let dependencies = list_dependencies(config).change_context(GenerateError::ListDependencies)?;
    unpack_dependencies(config).change_context(GenerateError::Unpack)?;

    let fetcher = HttpFetcher::new(config.fetch_timeout).change_context(GenerateError::Fetch)?;
    let mut license_texts = match &config.cache_save_location {
        CacheSaveLocation::None => LicenseTexts::new(fetcher),
        CacheSaveLocation::Global => LicenseTexts::new(fetcher)
            .with_cache(global_cache_path().change_context(GenerateError::Cache)?),
        CacheSaveLocation::Path(path) => {
            LicenseTexts::new(fetcher).with_cache(config.project_path(path))
        }
    };

    let notice_path = config.resolved_notice_path();
    let listing_path = config.resolved_listing_path();
    let mut notice = create_output(&notice_path)?;
    let mut listing = create_output(&listing_path)?;

    let report = write_notice_and_listing(
        config,
        &dependencies,
        &mut license_texts,
        &mut notice,
        &mut listing,
    )?;

    notice
        .flush()
        .change_context(GenerateError::Write)
        .attach_printable_lazy(|| CPath::from(&notice_path))?;
    listing
        .flush()
        .change_context(GenerateError::Write)
        .attach_printable_lazy(|| CPath::from(&listing_path))?;

    license_texts
        .persist()
        .change_context(GenerateError::Cache)?;

    info!(
        "Wrote {} of {} dependencies with {} fetched license texts in {}ms",
        report.entries.len(),
        dependencies.len(),
        license_texts.fetch_count(),
        instant_before_generation.elapsed().as_millis()
    );

    Ok(report)
}
