use clap::Parser;
use hooksync::UvResolver;
use hooksync::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    hooksync::run(&cli, preflight, &mut std::io::stdout().lock())
}

/// Locates `uv` and rejects versions that cannot compile dependency groups.
fn preflight() -> hooksync_uv::Result<UvResolver> {
    let resolver = UvResolver::locate()?;
    resolver.ensure_supported()?;
    Ok(resolver)
}
