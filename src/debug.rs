use std::sync::Once;

static LOGGER_ONCE: Once = Once::new();

pub(crate) fn setup_logger() {
    use simplelog::Config;

    LOGGER_ONCE.call_once(|| {
        let _ = simplelog::TermLogger::init(
            log::LevelFilter::Debug,
            Config::default(),
            simplelog::TerminalMode::Mixed,
            simplelog::ColorChoice::Auto,
        );
    });
}

pub(crate) fn setup_test() {
    setup_logger();
}

/// Writes an executable `mvn` stand-in into `dir`.
///
/// Every call appends its arguments as one line to `dir/mvn-calls`. A call whose arguments
/// contain `fail_on` prints to stderr and exits with status 1.
#[cfg(unix)]
pub(crate) fn fake_mvn(dir: &std::path::Path, fail_on: Option<&str>) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let failure = match fail_on {
        Some(pattern) => format!(
            "case \"$*\" in\n  *\"{0}\"*) echo \"fake mvn failing on {0}\" >&2; exit 1;;\nesac\n",
            pattern
        ),
        None => String::new(),
    };
    let script = format!(
        "#!/bin/sh\necho \"$*\" >> \"{}\"\n{}exit 0\n",
        dir.join("mvn-calls").display(),
        failure
    );

    let path = dir.join("mvn");
    std::fs::write(&path, script).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
pub(crate) fn fake_mvn_calls(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("mvn-calls"))
        .unwrap_or_default()
        .lines()
        .map(str::to_owned)
        .collect()
}
