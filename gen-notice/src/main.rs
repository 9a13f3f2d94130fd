// Copyright Adam McKellar 2025
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::env::current_dir;
use std::path::{absolute, PathBuf};

use clap::{ArgAction, Parser};
use color_eyre::eyre::{eyre, Result};
use colored::Colorize;
use log::LevelFilter;
use serde_json::to_string_pretty;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use notice_fetcher::config::{CacheSaveLocation, ConfigBuilder};
use notice_fetcher::generate::generate;

/// Generate NOTICE and THIRDPARTY.md for the binary distribution of a Maven project.
///
/// Maven needs to be installed and be in the PATH or MAVEN_HOME.
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Optional path to the project dir (where pom.xml is). Defaults to current dir.
    project_dir: Option<PathBuf>,

    /// Read configuration from a notice-fetcher.toml file or a dir containing one.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the mvn executable.
    #[arg(long)]
    mvn: Option<PathBuf>,

    /// Directory dependencies are unpacked into.
    #[arg(long)]
    dependency_dir: Option<PathBuf>,

    /// Output path of the NOTICE file.
    #[arg(long)]
    notice: Option<PathBuf>,

    /// Output path of the THIRDPARTY.md file.
    #[arg(long)]
    listing: Option<PathBuf>,

    /// Maven scope of the distributed dependencies.
    #[arg(long)]
    scope: Option<String>,

    /// Cache fetched license texts in the users cache dir.
    #[arg(long)]
    cache: bool,

    /// Output the written entries as json.
    #[arg(short, long)]
    json: bool,

    /// Increase log output. Can be repeated.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Logs go to stderr, stdout is reserved for the summary or json output.
fn setup_logger(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_logger(cli.verbose)?;

    let mut builder = match &cli.config {
        Some(path) => ConfigBuilder::from_path(path).map_err(|report| eyre!("{:?}", report))?,
        None => ConfigBuilder::default().project_dir(current_dir()?),
    };

    if let Some(project_dir) = cli.project_dir {
        if !project_dir.try_exists()? {
            return Err(eyre!("{}", "Error: Path does not exist!".red()));
        }
        builder = builder.project_dir(absolute(project_dir)?);
    }
    if let Some(mvn) = cli.mvn {
        builder = builder.mvn_path(mvn);
    }
    if let Some(dependency_dir) = cli.dependency_dir {
        builder = builder.dependency_dir(dependency_dir);
    }
    if let Some(notice) = cli.notice {
        builder = builder.notice_path(notice);
    }
    if let Some(listing) = cli.listing {
        builder = builder.listing_path(listing);
    }
    if let Some(scope) = cli.scope {
        builder = builder.scope(scope);
    }
    if cli.cache {
        builder = builder.cache_save_location(CacheSaveLocation::Global);
    }

    let config = builder.build().map_err(|report| eyre!("{:?}", report.0))?;
    let report = generate(&config).map_err(|report| eyre!("{:?}", report))?;

    if cli.json {
        println!("{}", to_string_pretty(&report)?);
    } else {
        println!(
            "{} {} dependencies to {} and {}",
            "Wrote".green(),
            report.entries.len(),
            config.resolved_notice_path().display(),
            config.resolved_listing_path().display()
        );
    }

    Ok(())
}
