//! YAML loading with YAML 1.1 scalar resolution.
//!
//! pre-commit reads its config with a YAML 1.1 reader, where plain `yes`,
//! `off`, `Null` or `1_000` are booleans, nulls and integers. `yaml-rust2`
//! resolves plain scalars with the 1.2 core schema and would turn them into
//! strings, which the emitter then has to quote. The loader here drives the
//! `yaml-rust2` parser itself and types plain scalars the way pre-commit
//! will read them. Quoted and block scalars always stay strings.

use crate::error::{ConfigError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use yaml_rust2::Yaml;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser, Tag};
use yaml_rust2::scanner::{Marker, TScalarStyle};
use yaml_rust2::yaml::{Array, Hash};

static INT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?0b[0-1_]+|[-+]?0[0-7_]+|[-+]?(?:0|[1-9][0-9_]*)|[-+]?0x[0-9a-fA-F_]+",
        r"|[-+]?[1-9][0-9_]*(?::[0-5]?[0-9])+)$"
    ))
    .expect("YAML 1.1 int pattern is valid")
});

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:[-+]?[0-9][0-9_]*\.[0-9_]*(?:[eE][-+][0-9]+)?",
        r"|\.[0-9][0-9_]*(?:[eE][-+][0-9]+)?",
        r"|[-+]?[0-9][0-9_]*(?::[0-5]?[0-9])+\.[0-9_]*",
        r"|[-+]?\.(?:inf|Inf|INF)|\.(?:nan|NaN|NAN))$"
    ))
    .expect("YAML 1.1 float pattern is valid")
});

/// Dates and timestamps have no [`Yaml`] variant; they load as strings.
static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}").expect("YAML 1.1 timestamp pattern is valid")
});

/// Loads every document of `source`.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on a syntax error or a duplicated mapping key.
pub fn load_documents(source: &str) -> Result<Vec<Yaml>> {
    let mut builder = TreeBuilder::default();
    Parser::new_from_str(source)
        .load(&mut builder, true)
        .map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })?;

    match builder.error {
        Some(e) => Err(e),
        None => Ok(builder.docs),
    }
}

/// Types an untagged plain scalar the way a YAML 1.1 reader does.
pub fn resolve_plain(text: &str) -> Yaml {
    match text {
        "yes" | "Yes" | "YES" | "true" | "True" | "TRUE" | "on" | "On" | "ON" => Yaml::Boolean(true),
        "no" | "No" | "NO" | "false" | "False" | "FALSE" | "off" | "Off" | "OFF" => {
            Yaml::Boolean(false)
        }
        "" | "~" | "null" | "Null" | "NULL" => Yaml::Null,
        _ if INT.is_match(text) => {
            parse_int(text).map_or_else(|| Yaml::Real(text.to_string()), Yaml::Integer)
        }
        _ if FLOAT.is_match(text) => Yaml::Real(text.to_string()),
        _ => Yaml::String(text.to_string()),
    }
}

/// Whether a YAML 1.1 reader would read `text`, written plain, as anything
/// but this string.
pub(crate) fn is_implicit_non_string(text: &str) -> bool {
    !matches!(resolve_plain(text), Yaml::String(_)) || TIMESTAMP.is_match(text)
}

/// Value of a string already matched by [`INT`]; `None` on overflow.
fn parse_int(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, digits) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let magnitude = if let Some(bin) = digits.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else if let Some(hex) = digits.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if digits.contains(':') {
        digits.split(':').try_fold(0_i64, |acc, part| {
            acc.checked_mul(60)?.checked_add(part.parse::<i64>().ok()?)
        })?
    } else if let Some(octal) = digits.strip_prefix('0').filter(|rest| !rest.is_empty()) {
        i64::from_str_radix(octal, 8).ok()?
    } else {
        digits.parse::<i64>().ok()?
    };

    Some(if negative { -magnitude } else { magnitude })
}

fn resolve_scalar(value: String, style: TScalarStyle, tag: Option<&Tag>) -> Yaml {
    if style != TScalarStyle::Plain {
        return Yaml::String(value);
    }
    match tag {
        None => resolve_plain(&value),
        Some(tag) if tag.handle == "tag:yaml.org,2002:" && tag.suffix == "str" => {
            Yaml::String(value)
        }
        Some(tag) if tag.handle == "tag:yaml.org,2002:" => match resolve_plain(&value) {
            Yaml::String(_) => Yaml::BadValue,
            resolved => resolved,
        },
        Some(_) => Yaml::String(value),
    }
}

/// Builds [`Yaml`] trees from parser events.
#[derive(Default)]
struct TreeBuilder {
    docs: Vec<Yaml>,
    /// Open nodes with their anchor ids.
    stack: Vec<(Yaml, usize)>,
    /// Pending key of each open mapping.
    keys: Vec<Option<Yaml>>,
    anchors: HashMap<usize, Yaml>,
    error: Option<ConfigError>,
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, ev: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.handle(ev, mark) {
            self.error = Some(e);
        }
    }
}

impl TreeBuilder {
    fn handle(&mut self, ev: Event, mark: Marker) -> Result<()> {
        match ev {
            Event::DocumentEnd => {
                let root = self.stack.pop().map_or(Yaml::Null, |(node, _)| node);
                self.docs.push(root);
                self.anchors.clear();
            }
            Event::SequenceStart(anchor, _) => self.stack.push((Yaml::Array(Array::new()), anchor)),
            Event::MappingStart(anchor, _) => {
                self.stack.push((Yaml::Hash(Hash::new()), anchor));
                self.keys.push(None);
            }
            Event::SequenceEnd => self.close(mark)?,
            Event::MappingEnd => {
                self.keys.pop();
                self.close(mark)?;
            }
            Event::Scalar(value, style, anchor, tag) => {
                let node = resolve_scalar(value, style, tag.as_ref());
                self.insert(node, anchor, mark)?;
            }
            Event::Alias(id) => {
                let node = self.anchors.get(&id).cloned().ok_or_else(|| ConfigError::Parse {
                    message: format!("unknown anchor at line {}", mark.line()),
                })?;
                self.insert(node, 0, mark)?;
            }
            Event::Nothing | Event::StreamStart | Event::StreamEnd | Event::DocumentStart => {}
        }
        Ok(())
    }

    fn close(&mut self, mark: Marker) -> Result<()> {
        let (node, anchor) = self.stack.pop().ok_or_else(|| ConfigError::Parse {
            message: format!("unbalanced collection end at line {}", mark.line()),
        })?;
        self.insert(node, anchor, mark)
    }

    fn insert(&mut self, node: Yaml, anchor: usize, mark: Marker) -> Result<()> {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }

        if self.stack.is_empty() {
            self.stack.push((node, 0));
            return Ok(());
        }

        match self.stack.last_mut() {
            Some((Yaml::Array(items), _)) => items.push(node),
            Some((Yaml::Hash(map), _)) => {
                if let Some(slot) = self.keys.last_mut() {
                    match slot.take() {
                        None => *slot = Some(node),
                        Some(key) => {
                            if map.insert(key.clone(), node).is_some() {
                                return Err(ConfigError::Parse {
                                    message: format!(
                                        "{key:?}: duplicated key in mapping at line {}",
                                        mark.line()
                                    ),
                                });
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}
