//! YAML serialization with configurable layout.
//!
//! `yaml_rust2::YamlEmitter` has a fixed layout, so this module writes the
//! tree itself. Block output follows the common PyYAML shape that
//! pre-commit users are used to:
//!
//! ```yaml
//! repos:
//! - repo: https://github.com/pre-commit/mirrors-mypy
//!   hooks:
//!   - id: mypy
//!     additional_dependencies:
//!     - attrs==23.2.0
//! ```
//!
//! Sequences nested in a mapping are not indented, nested mappings are
//! indented by [`EmitSettings::indent`]. Strings are written plain whenever
//! a YAML 1.1 or 1.2 reader would read them back as the same string.

use crate::error::{ConfigError, Result};
use crate::loader::is_implicit_non_string;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::{Array, Hash};

/// Output layout for [`emit_yaml`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitSettings {
    /// Preferred line width. Flow collections break at item boundaries
    /// once it is exceeded; scalars are never folded.
    pub width: usize,
    /// Spaces per nesting level (values below 2 are treated as 2).
    pub indent: usize,
    /// Write every collection in flow style (`{id: mypy}`, `[a, b]`).
    pub flow_style: bool,
    /// Order mapping keys by their rendered text.
    pub sort_keys: bool,
}

impl EmitSettings {
    fn step(&self) -> usize {
        self.indent.max(2)
    }
}

/// Serializes `doc` as a single YAML document terminated by a newline.
///
/// # Errors
///
/// Returns [`ConfigError::Emit`] for alias or invalid nodes and for
/// mapping keys that are collections.
pub fn emit_yaml(doc: &Yaml, settings: &EmitSettings) -> Result<String> {
    let mut emitter = Emitter {
        out: String::new(),
        column: 0,
        settings,
    };
    emitter.document(doc)?;
    Ok(emitter.out)
}

struct Emitter<'a> {
    out: String,
    column: usize,
    settings: &'a EmitSettings,
}

impl Emitter<'_> {
    fn document(&mut self, doc: &Yaml) -> Result<()> {
        if !self.settings.flow_style {
            match doc {
                Yaml::Hash(map) if !map.is_empty() => return self.block_mapping(map, 0, false),
                Yaml::Array(items) if !items.is_empty() => {
                    return self.block_sequence(items, 0, false);
                }
                _ => {}
            }
        }

        self.flow_node(doc, 0)?;
        self.newline();
        Ok(())
    }

    fn block_mapping(&mut self, map: &Hash, indent: usize, inline_first: bool) -> Result<()> {
        for (idx, (key, value)) in self.entries(map, false)?.into_iter().enumerate() {
            if idx > 0 || !inline_first {
                self.write_indent(indent);
            }
            self.write(&key);
            self.write(":");

            match value {
                Yaml::Hash(inner) if !inner.is_empty() => {
                    self.newline();
                    self.block_mapping(inner, indent + self.settings.step(), false)?;
                }
                Yaml::Array(items) if !items.is_empty() => {
                    self.newline();
                    self.block_sequence(items, indent, false)?;
                }
                _ => {
                    self.write(" ");
                    self.write(&scalar(value, false)?);
                    self.newline();
                }
            }
        }
        Ok(())
    }

    fn block_sequence(&mut self, items: &Array, indent: usize, inline_first: bool) -> Result<()> {
        let step = self.settings.step();

        for (idx, item) in items.iter().enumerate() {
            if idx > 0 || !inline_first {
                self.write_indent(indent);
            }
            self.write(&format!("{:<step$}", "-"));

            match item {
                Yaml::Hash(inner) if !inner.is_empty() => {
                    self.block_mapping(inner, indent + step, true)?;
                }
                Yaml::Array(inner) if !inner.is_empty() => {
                    self.block_sequence(inner, indent + step, true)?;
                }
                _ => {
                    self.write(&scalar(item, false)?);
                    self.newline();
                }
            }
        }
        Ok(())
    }

    fn flow_node(&mut self, node: &Yaml, depth: usize) -> Result<()> {
        match node {
            Yaml::Hash(map) if !map.is_empty() => {
                self.write("{");
                for (idx, (key, value)) in self.entries(map, true)?.into_iter().enumerate() {
                    if idx > 0 {
                        self.separator(key.chars().count() + 1, depth);
                    }
                    self.write(&key);
                    self.write(": ");
                    self.flow_node(value, depth + 1)?;
                }
                self.write("}");
            }
            Yaml::Array(items) if !items.is_empty() => {
                self.write("[");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        self.separator(flow_len_hint(item), depth);
                    }
                    self.flow_node(item, depth + 1)?;
                }
                self.write("]");
            }
            _ => self.write(&scalar(node, true)?),
        }
        Ok(())
    }

    /// Writes `,` and either a space or a line break, depending on whether
    /// the next `next_len` characters still fit.
    fn separator(&mut self, next_len: usize, depth: usize) {
        self.write(",");
        if self.column + 1 + next_len > self.settings.width {
            self.newline();
            self.write_indent((depth + 1) * self.settings.step());
        } else {
            self.write(" ");
        }
    }

    fn entries<'m>(&self, map: &'m Hash, in_flow: bool) -> Result<Vec<(String, &'m Yaml)>> {
        let mut entries = map
            .iter()
            .map(|(key, value)| match key {
                Yaml::Hash(_) | Yaml::Array(_) => Err(ConfigError::emit(
                    "collections as mapping keys are not supported",
                )),
                _ => Ok((scalar(key, in_flow)?, value)),
            })
            .collect::<Result<Vec<_>>>()?;

        if self.settings.sort_keys {
            entries.sort_by(|a, b| a.0.cmp(&b.0));
        }
        Ok(entries)
    }

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
        self.column += text.chars().count();
    }

    fn write_indent(&mut self, width: usize) {
        self.write(&" ".repeat(width));
    }

    fn newline(&mut self) {
        self.out.push('\n');
        self.column = 0;
    }
}

fn flow_len_hint(node: &Yaml) -> usize {
    match node {
        Yaml::Hash(map) if !map.is_empty() => 1,
        Yaml::Array(items) if !items.is_empty() => 1,
        _ => scalar(node, true).map_or(0, |text| text.chars().count()),
    }
}

fn scalar(node: &Yaml, in_flow: bool) -> Result<String> {
    match node {
        Yaml::String(s) => Ok(string_scalar(s, in_flow)),
        Yaml::Integer(i) => Ok(i.to_string()),
        Yaml::Real(r) => Ok(r.clone()),
        Yaml::Boolean(b) => Ok(b.to_string()),
        Yaml::Null => Ok("null".to_string()),
        Yaml::Hash(map) if map.is_empty() => Ok("{}".to_string()),
        Yaml::Array(items) if items.is_empty() => Ok("[]".to_string()),
        Yaml::Alias(_) => Err(ConfigError::emit("alias nodes are not supported")),
        other => Err(ConfigError::emit(format!("cannot write {other:?} as a scalar"))),
    }
}

fn string_scalar(s: &str, in_flow: bool) -> String {
    if s.chars().any(needs_escape) {
        double_quoted(s)
    } else if is_plain_safe(s, in_flow) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "''"))
    }
}

fn needs_escape(c: char) -> bool {
    (c.is_control() && c != '\t') || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}')
}

fn is_plain_safe(s: &str, in_flow: bool) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let second = chars.next();

    if first.is_whitespace() || s.ends_with(char::is_whitespace) || s.contains('\t') {
        return false;
    }
    if "#&*!|>'\"%@`,[]{}".contains(first) {
        return false;
    }
    if "-?:".contains(first) && second.is_none_or(char::is_whitespace) {
        return false;
    }
    if s.starts_with("---") || s.starts_with("...") {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    if in_flow && s.contains([',', '[', ']', '{', '}']) {
        return false;
    }

    matches!(Yaml::from_str(s), Yaml::String(_)) && !is_implicit_non_string(s)
}

fn double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c if needs_escape(c) => {
                let code = u32::from(c);
                if code <= 0xff {
                    out.push_str(&format!("\\x{code:02X}"));
                } else {
                    out.push_str(&format!("\\u{code:04X}"));
                }
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
