//! Whole invocations through `hooksync::run` with a fake resolver.

use clap::Parser;
use hooksync::cli::Cli;
use hooksync::{DependencyResolver, ResolutionError, run};
use hooksync_uv::{check_version, parse_version_output};
use std::cell::Cell;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

const CONFIG: &str = "repos:\n  - repo: local\n    hooks:\n      - id: mypy\n        pass_filenames: no\n";

struct FakeResolver<'a> {
    calls: &'a Cell<usize>,
}

impl DependencyResolver for FakeResolver<'_> {
    fn compile(&self, _manifest_path: &Path, _groups: &[String]) -> Result<String, ResolutionError> {
        self.calls.set(self.calls.get() + 1);
        Ok("attrs==23.2.0\n".to_string())
    }
}

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn setup() -> (TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".pre-commit-config.yaml");
    std::fs::write(&config_path, CONFIG).unwrap();
    (dir, config_path)
}

fn cli(config_path: &Path, extra: &[&str]) -> Cli {
    let config = config_path.to_str().unwrap();
    Cli::try_parse_from(
        ["update-mypy-hook", "-c", config]
            .into_iter()
            .chain(extra.iter().copied()),
    )
    .unwrap()
}

#[test]
fn test_old_uv_fails_before_touching_files() {
    let (_dir, config_path) = setup();
    let calls = Cell::new(0);
    let mut out = Vec::new();

    let code = run(
        &cli(&config_path, &[]),
        || {
            let version = parse_version_output("uv 0.5.9 (Homebrew 2024-12-13)")?;
            check_version(&version)?;
            Ok(FakeResolver { calls: &calls })
        },
        &mut out,
    );

    assert_eq!(code, ExitCode::FAILURE);
    assert_eq!(calls.get(), 0);
    assert!(out.is_empty());
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), CONFIG);
}

#[test]
fn test_old_uv_fails_with_missing_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("missing.yaml");

    let code = run(
        &cli(&config_path, &[]),
        || -> hooksync_uv::Result<FakeResolver<'static>> {
            check_version(&parse_version_output("uv 0.5.9")?)?;
            unreachable!("0.5.9 is below the minimum")
        },
        &mut Vec::new(),
    );

    assert_eq!(code, ExitCode::FAILURE);
    assert!(!config_path.exists());
}

#[test]
fn test_supported_uv_writes_config() {
    let (_dir, config_path) = setup();
    let calls = Cell::new(0);

    let code = run(
        &cli(&config_path, &[]),
        || {
            check_version(&parse_version_output("uv 0.6.0")?)?;
            Ok(FakeResolver { calls: &calls })
        },
        &mut Vec::new(),
    );

    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(calls.get(), 1);
    assert_eq!(
        std::fs::read_to_string(&config_path).unwrap(),
        "repos:\n- repo: local\n  hooks:\n  - id: mypy\n    pass_filenames: false\n    additional_dependencies:\n    - attrs==23.2.0\n"
    );
}

#[test]
fn test_dry_run_prints_without_writing() {
    let (_dir, config_path) = setup();
    let calls = Cell::new(0);
    let mut out = Vec::new();

    let code = run(
        &cli(&config_path, &["--dry-run"]),
        || Ok(FakeResolver { calls: &calls }),
        &mut out,
    );

    assert_eq!(code, ExitCode::SUCCESS);
    assert!(String::from_utf8(out).unwrap().contains("- attrs==23.2.0\n"));
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), CONFIG);
}

#[test]
fn test_dry_run_output_failure_exits_nonzero() {
    let (_dir, config_path) = setup();
    let calls = Cell::new(0);

    let code = run(
        &cli(&config_path, &["--dry-run"]),
        || Ok(FakeResolver { calls: &calls }),
        &mut BrokenPipe,
    );

    assert_eq!(code, ExitCode::FAILURE);
    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), CONFIG);
}
