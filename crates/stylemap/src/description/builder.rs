//! Fluent builders for writing descriptions in Rust.

use serde_yaml::{Mapping, Value};

/// A class or sub-block under construction.
///
/// Keys are inserted verbatim and in call order; nothing is validated until
/// the description is compiled.
///
/// # Example
///
/// ```rust
/// use stylemap::{Block, Variants};
///
/// let block = Block::new()
///     .prop("color", "black")
///     .pseudo(":hover", Block::new().prop("color", "blue"))
///     .media("@media (max-width: 600px)", Block::new().prop("font-size", "12px"))
///     .variants(Variants::new().plain("compact"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    entries: Mapping,
}

impl Block {
    /// Creates an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a CSS declaration.
    pub fn prop(self, name: &str, value: impl Into<Value>) -> Self {
        self.entry(name, value.into())
    }

    /// Adds a pseudo-selector block. The selector includes its colon(s).
    pub fn pseudo(self, selector: &str, block: Block) -> Self {
        self.entry(selector, block.into())
    }

    /// Adds a media query block. The query is the full `@media ...` key.
    pub fn media(self, query: &str, block: Block) -> Self {
        self.entry(query, block.into())
    }

    /// Adds the `@variants` block.
    pub fn variants(self, variants: Variants) -> Self {
        self.entry("@variants", variants.into())
    }

    /// Adds an arbitrary key.
    pub fn entry(mut self, key: &str, value: Value) -> Self {
        self.entries.insert(Value::String(key.to_string()), value);
        self
    }

    /// Returns `true` if no keys were added.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Block> for Value {
    fn from(block: Block) -> Self {
        Value::Mapping(block.entries)
    }
}

/// The named variants of a class, under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Variants {
    entries: Mapping,
}

impl Variants {
    /// Creates an empty variant set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a variant with its own CSS.
    pub fn variant(mut self, name: &str, block: Block) -> Self {
        self.entries
            .insert(Value::String(name.to_string()), block.into());
        self
    }

    /// Adds a variant that only gets a class name, with no extra CSS.
    pub fn plain(mut self, name: &str) -> Self {
        self.entries.insert(Value::String(name.to_string()), Value::Null);
        self
    }
}

impl From<Variants> for Value {
    fn from(variants: Variants) -> Self {
        Value::Mapping(variants.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_keeps_insertion_order() {
        let value: Value = Block::new()
            .prop("z", "1")
            .prop("a", "2")
            .pseudo(":hover", Block::new().prop("m", "3"))
            .into();

        let keys: Vec<&str> = value
            .as_mapping()
            .unwrap()
            .keys()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(keys, vec!["z", "a", ":hover"]);
    }

    #[test]
    fn test_block_prop_accepts_numbers() {
        let value: Value = Block::new().prop("z-index", 3).into();
        assert_eq!(value.get("z-index").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn test_variants_plain_is_null() {
        let value: Value = Variants::new().plain("quiet").into();
        assert!(value.get("quiet").unwrap().is_null());
    }

    #[test]
    fn test_block_variants_key() {
        let value: Value = Block::new()
            .variants(Variants::new().variant("big", Block::new().prop("size", "2em")))
            .into();
        let variants = value.get("@variants").unwrap();
        assert_eq!(
            variants.get("big").and_then(|b| b.get("size")).and_then(Value::as_str),
            Some("2em")
        );
    }

    #[test]
    fn test_empty_block() {
        assert!(Block::new().is_empty());
        assert!(!Block::new().prop("a", "b").is_empty());
    }
}
