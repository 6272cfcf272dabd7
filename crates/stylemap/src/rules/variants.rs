//! Variant name table and per-class variant resolution.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// The variants declared by one class.
///
/// Maps each variant name to its generated class name, `<class>-<variant>`.
/// Only classes that declared `@variants` have one, and it is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassVariants {
    class: String,
    names: Vec<(String, String)>,
}

impl ClassVariants {
    pub(crate) fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            names: Vec::new(),
        }
    }

    /// Registers a variant and returns its generated class name.
    pub(crate) fn register(&mut self, variant: &str) -> String {
        let class_name = format!("{}-{}", self.class, variant);
        match self.names.iter_mut().find(|(name, _)| name == variant) {
            Some((_, slot)) => *slot = class_name.clone(),
            None => self.names.push((variant.to_string(), class_name.clone())),
        }
        class_name
    }

    /// The class that declared these variants.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the class name for a variant.
    ///
    /// An unknown variant is not an error: a warning is logged and `None`
    /// is returned, leaving the caller to decide how to degrade.
    pub fn resolve_variant(&self, variant: &str) -> Option<&str> {
        let found = self.get(variant);
        if found.is_none() {
            tracing::warn!(class = %self.class, variant, "invalid variant");
        }
        found
    }

    /// Returns the class name for a variant without logging a miss.
    pub fn get(&self, variant: &str) -> Option<&str> {
        self.names
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, class_name)| class_name.as_str())
    }

    /// Iterates `(variant, class name)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(name, class_name)| (name.as_str(), class_name.as_str()))
    }

    /// Number of variants.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no variants were registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Variant class names for every class that declared `@variants`.
///
/// A class without variants is absent, which is distinct from a class with
/// an empty variant set (that cannot be produced).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantNameTable {
    classes: Vec<ClassVariants>,
}

impl VariantNameTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, variants: ClassVariants) {
        match self
            .classes
            .iter_mut()
            .find(|existing| existing.class == variants.class)
        {
            Some(slot) => *slot = variants,
            None => self.classes.push(variants),
        }
    }

    /// Returns the variants of a class, if it declared any.
    pub fn get(&self, class: &str) -> Option<&ClassVariants> {
        self.classes.iter().find(|variants| variants.class == class)
    }

    /// Iterates classes with variants in compile order.
    pub fn iter(&self) -> impl Iterator<Item = &ClassVariants> {
        self.classes.iter()
    }

    /// Number of classes with variants.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// Returns `true` if no class declared variants.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Serialize for ClassVariants {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (name, class_name) in &self.names {
            map.serialize_entry(name, class_name)?;
        }
        map.end()
    }
}

impl Serialize for VariantNameTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.classes.len()))?;
        for variants in &self.classes {
            map.serialize_entry(&variants.class, variants)?;
        }
        map.end()
    }
}
