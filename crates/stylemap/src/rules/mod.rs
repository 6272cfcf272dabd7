//! Compiler outputs: the normalized rule tree and the variant name table.
//!
//! - [`RuleTree`]: class name to [`RuleNode`], in the order classes were compiled
//! - [`RuleNode`]: declarations plus nested `&:pseudo` and `@media` nodes
//! - [`VariantNameTable`]: per-class variant name to generated class name
//!
//! Both serialize (via serde) to the nested-object shape a CSS engine expects:
//!
//! ```json
//! {
//!   "button": { "color": "black", "&:hover": { "color": "blue" } },
//!   "button-primary": { "background": "navy" }
//! }
//! ```

mod variants;

pub use variants::{ClassVariants, VariantNameTable};

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::Value;

/// One entry of a rule node.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleEntry {
    /// A CSS declaration. The value is whatever the description held.
    Declaration(Value),
    /// A nested rule, keyed by `&<pseudo>` or `@media ...`.
    Nested(RuleNode),
}

impl RuleEntry {
    /// Returns the declaration value, if this is a declaration.
    pub fn as_declaration(&self) -> Option<&Value> {
        match self {
            RuleEntry::Declaration(value) => Some(value),
            RuleEntry::Nested(_) => None,
        }
    }

    /// Returns the nested node, if this is a nested rule.
    pub fn as_nested(&self) -> Option<&RuleNode> {
        match self {
            RuleEntry::Declaration(_) => None,
            RuleEntry::Nested(node) => Some(node),
        }
    }
}

/// A rule object: ordered declarations and nested rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleNode {
    entries: Vec<(String, RuleEntry)>,
}

impl RuleNode {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn declare(&mut self, property: impl Into<String>, value: Value) {
        self.set(property.into(), RuleEntry::Declaration(value));
    }

    pub(crate) fn nest(&mut self, selector: impl Into<String>, node: RuleNode) {
        self.set(selector.into(), RuleEntry::Nested(node));
    }

    fn set(&mut self, key: String, entry: RuleEntry) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key, entry)),
        }
    }

    /// Looks up an entry by key.
    pub fn get(&self, key: &str) -> Option<&RuleEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, entry)| entry)
    }

    /// Looks up a declaration value by property name.
    pub fn declaration(&self, property: &str) -> Option<&Value> {
        self.get(property).and_then(RuleEntry::as_declaration)
    }

    /// Looks up a nested node by its output key (`&:hover`, `@media ...`).
    pub fn nested(&self, key: &str) -> Option<&RuleNode> {
        self.get(key).and_then(RuleEntry::as_nested)
    }

    /// Iterates entries in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the node has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The normalized rule tree handed to a CSS engine.
///
/// Top-level keys are class names: every described class, plus one
/// `<class>-<variant>` entry for each variant that carried CSS. Variant
/// entries follow the class that declared them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleTree {
    rules: Vec<(String, RuleNode)>,
}

impl RuleTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rule. A name that is already present keeps its position and
    /// takes the new node.
    pub(crate) fn insert(&mut self, name: impl Into<String>, node: RuleNode) {
        let name = name.into();
        match self.rules.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = node,
            None => self.rules.push((name, node)),
        }
    }

    /// Returns the rule for a class name.
    pub fn get(&self, name: &str) -> Option<&RuleNode> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, node)| node)
    }

    /// Returns `true` if the tree has a rule for the class name.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates rules in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RuleNode)> {
        self.rules.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Iterates rule names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the tree has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Serialize for RuleEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleEntry::Declaration(value) => value.serialize(serializer),
            RuleEntry::Nested(node) => node.serialize(serializer),
        }
    }
}

impl Serialize for RuleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

impl Serialize for RuleTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.rules.len()))?;
        for (name, node) in &self.rules {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}
