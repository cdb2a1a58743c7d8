//! Command line surface of `update-mypy-hook`.
//!
//! All defaults live here; the library never falls back to them on its own.

use crate::sync::SyncOptions;
use clap::{ArgAction, Parser};
use hooksync_core::EmitSettings;
use std::path::PathBuf;

pub const DEFAULT_GROUPS: &[&str] = &["mypy"];
pub const DEFAULT_PYPROJECT_PATH: &str = "pyproject.toml";
pub const DEFAULT_CONFIG_PATH: &str = ".pre-commit-config.yaml";
pub const DEFAULT_YAML_WIDTH: usize = 120;
pub const DEFAULT_YAML_INDENT: u8 = 2;
pub const DEFAULT_YAML_FLOW_STYLE: bool = false;
pub const DEFAULT_YAML_SORT_KEYS: bool = false;

#[derive(Parser, Debug)]
#[command(name = "update-mypy-hook")]
#[command(
    about = "Update `mypy` hook in .pre-commit-config.yaml with dependencies resolved by uv. uv must be installed."
)]
#[command(version)]
pub struct Cli {
    /// Dependency group to include. Can be used multiple times [default: mypy]
    #[arg(short = 'g', long = "group", value_name = "GROUP", action = ArgAction::Append)]
    pub groups: Vec<String>,

    /// Path to pyproject.toml
    #[arg(short = 'p', long, value_name = "PATH", default_value = DEFAULT_PYPROJECT_PATH)]
    pub pyproject_path: PathBuf,

    /// Path to .pre-commit-config.yaml
    #[arg(short = 'c', long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub pre_commit_config_path: PathBuf,

    /// Maximum width of yaml output
    #[arg(long, value_name = "N", default_value_t = DEFAULT_YAML_WIDTH)]
    pub yaml_width: usize,

    /// Number of spaces to indent
    #[arg(
        long,
        value_name = "N",
        default_value_t = DEFAULT_YAML_INDENT,
        value_parser = clap::value_parser!(u8).range(2..=9)
    )]
    pub yaml_indent: u8,

    /// Use flow style for all collections
    #[arg(long, overrides_with = "no_yaml_default_flow_style")]
    yaml_default_flow_style: bool,

    #[arg(long, overrides_with = "yaml_default_flow_style", hide = true)]
    no_yaml_default_flow_style: bool,

    /// Sort keys in yaml output
    #[arg(long, overrides_with = "no_yaml_sort_keys")]
    yaml_sort_keys: bool,

    #[arg(long, overrides_with = "yaml_sort_keys", hide = true)]
    no_yaml_sort_keys: bool,

    /// Print the updated config instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Requested groups, or [`DEFAULT_GROUPS`] when none were given.
    pub fn groups(&self) -> Vec<String> {
        if self.groups.is_empty() {
            DEFAULT_GROUPS.iter().map(|g| (*g).to_string()).collect()
        } else {
            self.groups.clone()
        }
    }

    pub fn flow_style(&self) -> bool {
        resolve_flag(
            self.yaml_default_flow_style,
            self.no_yaml_default_flow_style,
            DEFAULT_YAML_FLOW_STYLE,
        )
    }

    pub fn sort_keys(&self) -> bool {
        resolve_flag(
            self.yaml_sort_keys,
            self.no_yaml_sort_keys,
            DEFAULT_YAML_SORT_KEYS,
        )
    }

    pub fn emit_settings(&self) -> EmitSettings {
        EmitSettings {
            width: self.yaml_width,
            indent: usize::from(self.yaml_indent),
            flow_style: self.flow_style(),
            sort_keys: self.sort_keys(),
        }
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            manifest_path: self.pyproject_path.clone(),
            config_path: self.pre_commit_config_path.clone(),
            groups: self.groups(),
            emit: self.emit_settings(),
        }
    }
}

/// `--flag` / `--no-flag` pair; the two override each other, so at most one
/// is set.
fn resolve_flag(enabled: bool, disabled: bool, default: bool) -> bool {
    match (enabled, disabled) {
        (true, _) => true,
        (_, true) => false,
        _ => default,
    }
}
