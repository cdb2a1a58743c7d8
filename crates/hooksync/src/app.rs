//! One invocation of `update-mypy-hook`: preflight, then sync or dry run.

use crate::cli::Cli;
use crate::sync::{render_updated_config, sync_hook};
use hooksync_core::DependencyResolver;
use hooksync_uv::PreflightError;
use std::io::Write;
use std::process::ExitCode;

/// Runs the tool for parsed arguments and returns the process exit code.
///
/// `preflight` yields the resolver and runs before any file is touched; when
/// it fails, neither the manifest nor the pre-commit config is read. A dry
/// run writes the rendered config to `out`. Errors go to stderr.
pub fn run<R, P>(cli: &Cli, preflight: P, out: &mut dyn Write) -> ExitCode
where
    R: DependencyResolver,
    P: FnOnce() -> hooksync_uv::Result<R>,
{
    let resolver = match preflight() {
        Ok(resolver) => resolver,
        Err(e) => {
            eprintln!("{e}");
            if matches!(e, PreflightError::NotFound { .. }) {
                eprintln!("Please install uv and try again.");
            }
            return ExitCode::FAILURE;
        }
    };

    let options = cli.sync_options();
    if !cli.dry_run {
        return match sync_hook(&resolver, &options) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    let outcome = match render_updated_config(&resolver, &options) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    match out
        .write_all(outcome.rendered.as_bytes())
        .and_then(|()| out.flush())
    {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Failed to write updated config: {e}");
            ExitCode::FAILURE
        }
    }
}
