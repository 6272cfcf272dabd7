//! Stylesheet descriptions: the compiler's input.
//!
//! A [`Description`] is an ordered mapping from class name to class block.
//! Blocks are kept as [`serde_yaml::Value`] so that property values stay
//! opaque and authoring order survives loading, which matters because
//! `@variants` must be the last key of its block.
//!
//! Descriptions come from three places:
//!
//! - YAML text or files ([`Description::from_yaml_str`])
//! - JSON text or files ([`Description::from_json_str`])
//! - Rust code, through the [`Block`] and [`Variants`] builders
//!
//! Only the outer shape is checked here. Block contents are validated when
//! the description is compiled.

mod builder;
mod error;

pub use builder::{Block, Variants};
pub use error::LoadError;

use std::path::Path;

use serde_yaml::Value;

/// Serialization format of a stylesheet file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Picks the format from a file extension, if it is one we read.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// A stylesheet description: class names mapped to their blocks, in authoring order.
///
/// # Example
///
/// ```rust
/// use stylemap::{Block, Description, Variants};
///
/// let description = Description::new()
///     .class("title", Block::new().prop("font-weight", "bold"))
///     .class(
///         "badge",
///         Block::new()
///             .prop("padding", "2px 4px")
///             .variants(Variants::new().variant("alert", Block::new().prop("color", "red"))),
///     );
///
/// assert_eq!(description.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Description {
    classes: Vec<(String, Value)>,
}

impl Description {
    /// Creates an empty description.
    ///
    /// An empty description does not compile; add at least one class.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a class block, returning the description for chaining.
    ///
    /// Adding a class name twice replaces the earlier block in place.
    pub fn class(mut self, name: &str, block: impl Into<Value>) -> Self {
        let block = block.into();
        match self.classes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, slot)) => *slot = block,
            None => self.classes.push((name.to_string(), block)),
        }
        self
    }

    /// Builds a description from an already parsed value.
    ///
    /// The root must be a mapping whose keys are non-empty strings. A null
    /// root (an empty document) yields an empty description.
    pub fn from_value(value: Value) -> Result<Self, LoadError> {
        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return Ok(Self::new()),
            other => {
                return Err(LoadError::NotAMapping {
                    found: value_kind(&other),
                })
            }
        };

        let mut classes = Vec::with_capacity(mapping.len());
        for (key, block) in mapping {
            match key {
                Value::String(name) if !name.is_empty() => classes.push((name, block)),
                other => {
                    return Err(LoadError::InvalidClassName {
                        found: render_key(&other),
                    })
                }
            }
        }
        Ok(Self { classes })
    }

    /// Parses a description from YAML text.
    ///
    /// Keys starting with `@` must be quoted, as YAML reserves that character.
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_yaml::from_str(text)?;
        Self::from_value(value)
    }

    /// Parses a description from JSON text, keeping key order.
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    /// Parses a description in the given format.
    pub fn parse(text: &str, format: Format) -> Result<Self, LoadError> {
        match format {
            Format::Yaml => Self::from_yaml_str(text),
            Format::Json => Self::from_json_str(text),
        }
    }

    /// Reads and parses a stylesheet file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let format = Format::from_path(path).ok_or_else(|| LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, format)
    }

    /// Iterates class names and blocks in authoring order.
    pub fn classes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.classes
            .iter()
            .map(|(name, block)| (name.as_str(), block))
    }

    /// Returns the block for a class name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.classes
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, block)| block)
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no classes are described.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Short human name for the shape of a value, used in error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Renders a mapping key for error messages.
pub(crate) fn render_key(key: &Value) -> String {
    match key {
        Value::String(s) => format!("'{}'", s),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => value_kind(other).to_string(),
    }
}
