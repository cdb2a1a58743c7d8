//! Typed view of `.pre-commit-config.yaml`.
//!
//! Only the keys the updater needs are lifted into fields (`repos`, `hooks`,
//! `id`, `additional_dependencies`). Every mapping also keeps its original
//! entries so that unrelated keys are written back unchanged and in their
//! original order.

use crate::emitter::{EmitSettings, emit_yaml};
use crate::error::{ConfigError, Result};
use crate::loader::load_documents;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::{Array, Hash};

/// Id of the hook whose dependencies are synchronized.
pub const TARGET_HOOK_ID: &str = "mypy";

const REPOS_KEY: &str = "repos";
const HOOKS_KEY: &str = "hooks";
const ID_KEY: &str = "id";
const ADDITIONAL_DEPENDENCIES_KEY: &str = "additional_dependencies";

/// Parsed pre-commit configuration.
#[derive(Debug, Clone)]
pub struct PreCommitConfig {
    pub repos: Vec<RepoEntry>,
    fields: Hash,
}

/// One entry of the top-level `repos` sequence.
#[derive(Debug, Clone)]
pub struct RepoEntry {
    /// Hooks of this repo; empty when the repo has no `hooks` key.
    pub hooks: Vec<HookEntry>,
    fields: Hash,
}

/// One entry of a repo's `hooks` sequence.
#[derive(Debug, Clone)]
pub struct HookEntry {
    pub id: String,
    pub additional_dependencies: Option<Vec<String>>,
    fields: Hash,
}

impl PreCommitConfig {
    /// Parses and validates a pre-commit config.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the YAML is malformed ([`ConfigError::Parse`])
    /// - the stream is empty or holds more than one document
    /// - `repos`, `hooks`, `id` or `additional_dependencies` have the wrong shape
    pub fn parse(content: &str) -> Result<Self> {
        let docs = load_documents(content)?;

        match docs.as_slice() {
            [root] => Self::from_yaml(root),
            [] => Err(ConfigError::invalid_structure("document is empty")),
            _ => Err(ConfigError::invalid_structure(format!(
                "expected a single YAML document, found {}",
                docs.len()
            ))),
        }
    }

    /// Builds the typed view from an already loaded YAML tree.
    pub fn from_yaml(root: &Yaml) -> Result<Self> {
        let Yaml::Hash(fields) = root else {
            return Err(ConfigError::invalid_structure(
                "top level must be a mapping",
            ));
        };

        let repos = match fields.get(&key(REPOS_KEY)) {
            Some(Yaml::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| RepoEntry::from_yaml(item, &format!("{REPOS_KEY}[{idx}]")))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(ConfigError::invalid_structure(format!(
                    "'{REPOS_KEY}' must be a sequence"
                )));
            }
            None => {
                return Err(ConfigError::invalid_structure(format!(
                    "missing '{REPOS_KEY}'"
                )));
            }
        };

        Ok(Self {
            repos,
            fields: fields.clone(),
        })
    }

    /// Converts back into a YAML tree, keeping the original key order.
    pub fn to_yaml(&self) -> Yaml {
        let mut out = Hash::new();
        for (k, v) in &self.fields {
            if is_key(k, REPOS_KEY) {
                let repos = self.repos.iter().map(RepoEntry::to_yaml).collect();
                out.insert(k.clone(), Yaml::Array(repos));
            } else {
                out.insert(k.clone(), v.clone());
            }
        }
        Yaml::Hash(out)
    }

    /// Serializes the config with the given emission settings.
    pub fn render(&self, settings: &EmitSettings) -> Result<String> {
        emit_yaml(&self.to_yaml(), settings)
    }

    /// All hooks in document order (repo order, then hook order).
    pub fn hooks(&self) -> impl Iterator<Item = &HookEntry> {
        self.repos.iter().flat_map(|repo| repo.hooks.iter())
    }

    /// First hook with the given id.
    pub fn find_hook(&self, hook_id: &str) -> Option<&HookEntry> {
        self.hooks().find(|hook| hook.id == hook_id)
    }

    pub fn find_hook_mut(&mut self, hook_id: &str) -> Option<&mut HookEntry> {
        self.repos
            .iter_mut()
            .flat_map(|repo| repo.hooks.iter_mut())
            .find(|hook| hook.id == hook_id)
    }

    /// Replaces `additional_dependencies` of the first hook with `hook_id`.
    ///
    /// Later hooks with the same id are left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::HookNotFound`] if no hook has that id.
    pub fn set_additional_dependencies(
        &mut self,
        hook_id: &str,
        deps: &[String],
    ) -> Result<&HookEntry> {
        let matches = self.hooks().filter(|hook| hook.id == hook_id).count();
        if matches > 1 {
            tracing::warn!(
                "Found {} '{}' hooks, only the first one is updated",
                matches,
                hook_id
            );
        }

        let hook = self
            .find_hook_mut(hook_id)
            .ok_or_else(|| ConfigError::hook_not_found(hook_id))?;
        hook.additional_dependencies = Some(deps.to_vec());

        Ok(hook)
    }
}

impl RepoEntry {
    fn from_yaml(node: &Yaml, path: &str) -> Result<Self> {
        let Yaml::Hash(fields) = node else {
            return Err(ConfigError::invalid_structure(format!(
                "{path} must be a mapping"
            )));
        };

        let hooks = match fields.get(&key(HOOKS_KEY)) {
            Some(Yaml::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(idx, item)| HookEntry::from_yaml(item, &format!("{path}.{HOOKS_KEY}[{idx}]")))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(ConfigError::invalid_structure(format!(
                    "{path}.{HOOKS_KEY} must be a sequence"
                )));
            }
            None => Vec::new(),
        };

        Ok(Self {
            hooks,
            fields: fields.clone(),
        })
    }

    fn to_yaml(&self) -> Yaml {
        let mut out = Hash::new();
        for (k, v) in &self.fields {
            if is_key(k, HOOKS_KEY) {
                let hooks = self.hooks.iter().map(HookEntry::to_yaml).collect();
                out.insert(k.clone(), Yaml::Array(hooks));
            } else {
                out.insert(k.clone(), v.clone());
            }
        }
        Yaml::Hash(out)
    }
}

impl HookEntry {
    fn from_yaml(node: &Yaml, path: &str) -> Result<Self> {
        let Yaml::Hash(fields) = node else {
            return Err(ConfigError::invalid_structure(format!(
                "{path} must be a mapping"
            )));
        };

        let id = match fields.get(&key(ID_KEY)) {
            Some(Yaml::String(id)) => id.clone(),
            Some(_) => {
                return Err(ConfigError::invalid_structure(format!(
                    "{path}.{ID_KEY} must be a string"
                )));
            }
            None => {
                return Err(ConfigError::invalid_structure(format!(
                    "{path} is missing '{ID_KEY}'"
                )));
            }
        };

        let additional_dependencies = match fields.get(&key(ADDITIONAL_DEPENDENCIES_KEY)) {
            Some(Yaml::Array(items)) => Some(string_list(
                items,
                &format!("{path}.{ADDITIONAL_DEPENDENCIES_KEY}"),
            )?),
            Some(_) => {
                return Err(ConfigError::invalid_structure(format!(
                    "{path}.{ADDITIONAL_DEPENDENCIES_KEY} must be a sequence"
                )));
            }
            None => None,
        };

        Ok(Self {
            id,
            additional_dependencies,
            fields: fields.clone(),
        })
    }

    fn to_yaml(&self) -> Yaml {
        let mut out = Hash::new();
        let mut has_deps_key = false;

        for (k, v) in &self.fields {
            if is_key(k, ID_KEY) {
                out.insert(k.clone(), Yaml::String(self.id.clone()));
            } else if is_key(k, ADDITIONAL_DEPENDENCIES_KEY) {
                has_deps_key = true;
                if let Some(deps) = &self.additional_dependencies {
                    out.insert(k.clone(), string_array(deps));
                }
            } else {
                out.insert(k.clone(), v.clone());
            }
        }

        // New field goes after the hook's existing keys
        if !has_deps_key && let Some(deps) = &self.additional_dependencies {
            out.insert(key(ADDITIONAL_DEPENDENCIES_KEY), string_array(deps));
        }

        Yaml::Hash(out)
    }
}

/// Replaces the dependencies of the [`TARGET_HOOK_ID`] hook and returns the config.
///
/// # Errors
///
/// Returns [`ConfigError::HookNotFound`] if the config has no mypy hook.
pub fn update_additional_dependencies(
    mut config: PreCommitConfig,
    deps: &[String],
) -> Result<PreCommitConfig> {
    config.set_additional_dependencies(TARGET_HOOK_ID, deps)?;
    Ok(config)
}

fn key(name: &str) -> Yaml {
    Yaml::String(name.to_string())
}

fn is_key(node: &Yaml, name: &str) -> bool {
    node.as_str() == Some(name)
}

fn string_list(items: &Array, path: &str) -> Result<Vec<String>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Yaml::String(s) => Ok(s.clone()),
            _ => Err(ConfigError::invalid_structure(format!(
                "{path}[{idx}] must be a string"
            ))),
        })
        .collect()
}

fn string_array(items: &[String]) -> Yaml {
    Yaml::Array(items.iter().cloned().map(Yaml::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r"
default_language_version:
  python: python3.12
repos:
  - repo: https://github.com/psf/black
    rev: 24.1.1
    hooks:
      - id: black
  - repo: https://github.com/pre-commit/mirrors-mypy
    rev: v1.8.0
    hooks:
      - id: mypy
        args: [--strict]
        additional_dependencies: [old==1.0]
      - id: mypy
        name: mypy (tests)
";

    fn settings() -> EmitSettings {
        EmitSettings {
            width: 120,
            indent: 2,
            flow_style: false,
            sort_keys: false,
        }
    }

    fn deps(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_parse_typed_fields() {
        let config = PreCommitConfig::parse(CONFIG).unwrap();
        assert_eq!(config.repos.len(), 2);
        let ids: Vec<_> = config.hooks().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["black", "mypy", "mypy"]);
        assert_eq!(
            config.find_hook("mypy").unwrap().additional_dependencies,
            Some(deps(&["old==1.0"]))
        );
        assert!(config.find_hook("black").unwrap().additional_dependencies.is_none());
    }

    #[test]
    fn test_update_first_match_only() {
        let config = PreCommitConfig::parse(CONFIG).unwrap();
        let updated = update_additional_dependencies(config, &deps(&["a", "b"])).unwrap();

        let hooks: Vec<_> = updated.hooks().collect();
        assert!(hooks[0].additional_dependencies.is_none());
        assert_eq!(hooks[1].additional_dependencies, Some(deps(&["a", "b"])));
        assert!(hooks[2].additional_dependencies.is_none());
    }

    #[test]
    fn test_update_missing_hook() {
        let config = PreCommitConfig::parse(
            "repos:\n  - repo: local\n    hooks:\n      - id: black\n",
        )
        .unwrap();
        let err = update_additional_dependencies(config, &deps(&["a"])).unwrap_err();
        assert!(matches!(err, ConfigError::HookNotFound { .. }));
        assert_eq!(err.to_string(), "mypy hook not found in pre-commit config");
    }

    #[test]
    fn test_update_creates_field_after_existing_keys() {
        let config = PreCommitConfig::parse(
            "repos:\n- repo: local\n  hooks:\n  - id: mypy\n    name: mypy\n",
        )
        .unwrap();
        let updated = update_additional_dependencies(config, &deps(&["attrs==23.2.0"])).unwrap();

        let yaml = updated.to_yaml();
        let hook = &yaml["repos"][0]["hooks"][0];
        let keys: Vec<_> = hook
            .as_hash()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["id", "name", "additional_dependencies"]);
    }

    #[test]
    fn test_to_yaml_preserves_unrelated_keys() {
        let config = PreCommitConfig::parse(CONFIG).unwrap();
        let yaml = config.to_yaml();

        assert_eq!(
            yaml["default_language_version"]["python"].as_str(),
            Some("python3.12")
        );
        assert_eq!(yaml["repos"][0]["rev"].as_str(), Some("24.1.1"));
        assert_eq!(yaml["repos"][1]["hooks"][0]["args"][0].as_str(), Some("--strict"));
        let top_keys: Vec<_> = yaml
            .as_hash()
            .unwrap()
            .keys()
            .map(|k| k.as_str().unwrap())
            .collect();
        assert_eq!(top_keys, vec!["default_language_version", "repos"]);
    }

    #[test]
    fn test_render_round_trip() {
        let config = PreCommitConfig::parse(CONFIG).unwrap();
        let resolved = deps(&["zope.interface==6.1", "attrs==23.2.0", "attrs==23.2.0"]);
        let updated = update_additional_dependencies(config, &resolved).unwrap();

        let text = updated.render(&settings()).unwrap();
        let reparsed = PreCommitConfig::parse(&text).unwrap();

        assert_eq!(
            reparsed.find_hook(TARGET_HOOK_ID).unwrap().additional_dependencies,
            Some(resolved)
        );
        assert_eq!(reparsed.to_yaml(), updated.to_yaml());
    }

    #[test]
    fn test_render_keeps_yaml11_scalar_types() {
        let config = PreCommitConfig::parse(
            r"
repos:
  - repo: local
    hooks:
      - id: mypy
        pass_filenames: no
        always_run: True
        verbose: yes
        require_serial: 'no'
        minimum_pre_commit_version: Null
        stages: [pre-commit]
        limit: 1_000
",
        )
        .unwrap();
        let updated = update_additional_dependencies(config, &deps(&["attrs==23.2.0"])).unwrap();

        let text = updated.render(&settings()).unwrap();

        let expected = "\
repos:
- repo: local
  hooks:
  - id: mypy
    pass_filenames: false
    always_run: true
    verbose: true
    require_serial: 'no'
    minimum_pre_commit_version: null
    stages:
    - pre-commit
    limit: 1000
    additional_dependencies:
    - attrs==23.2.0
";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_repo_without_hooks() {
        let config = PreCommitConfig::parse("repos:\n  - repo: meta\n").unwrap();
        assert!(config.repos[0].hooks.is_empty());
        assert!(config.to_yaml()["repos"][0]["hooks"].is_badvalue());
    }

    #[test]
    fn test_invalid_yaml() {
        let err = PreCommitConfig::parse("repos: [unclosed").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_empty_document() {
        let err = PreCommitConfig::parse("").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidStructure { .. }));
    }

    #[test]
    fn test_multiple_documents() {
        let err = PreCommitConfig::parse("repos: []\n---\nrepos: []\n").unwrap_err();
        assert!(err.to_string().contains("single YAML document"));
    }

    #[test]
    fn test_missing_repos() {
        let err = PreCommitConfig::parse("minimum_pre_commit_version: '3.0'\n").unwrap_err();
        assert!(err.to_string().contains("missing 'repos'"));
    }

    #[test]
    fn test_top_level_not_mapping() {
        let err = PreCommitConfig::parse("- repo: local\n").unwrap_err();
        assert!(err.to_string().contains("top level must be a mapping"));
    }

    #[test]
    fn test_hooks_not_sequence() {
        let err = PreCommitConfig::parse("repos:\n  - repo: local\n    hooks: mypy\n").unwrap_err();
        assert!(err.to_string().contains("repos[0].hooks must be a sequence"));
    }

    #[test]
    fn test_hook_missing_id() {
        let err = PreCommitConfig::parse("repos:\n  - repo: local\n    hooks:\n      - name: x\n")
            .unwrap_err();
        assert!(err.to_string().contains("repos[0].hooks[0] is missing 'id'"));
    }

    #[test]
    fn test_non_string_dependency() {
        let err = PreCommitConfig::parse(
            "repos:\n  - repo: local\n    hooks:\n      - id: mypy\n        additional_dependencies: [a, 1]\n",
        )
        .unwrap_err();
        assert!(
            err.to_string()
                .contains("repos[0].hooks[0].additional_dependencies[1] must be a string")
        );
    }
}
