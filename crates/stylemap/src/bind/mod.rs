//! Binding compiled classes to engine-generated class names.
//!
//! After a sheet is created, view code needs the class names the engine
//! generated rather than the authored ones. [`ClassBindings`] provides them:
//!
//! - a class without variants binds to its generated class name
//! - a class with variants binds to [`VariantClasses`], which maps each
//!   variant to `"<class> <variant class>"`, or just `"<class>"` for a
//!   variant without CSS
//!
//! [`Styled`] ties compilation, sheet creation and binding together, with a
//! shared static sheet or one linked sheet per instance.

mod styled;

pub use styled::{BindOptions, Styled, StyledInstance};

use crate::compile::Compiled;
use crate::engine::Sheet;

/// Generated class names for the variants of one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantClasses {
    class: String,
    names: Vec<(String, String)>,
}

impl VariantClasses {
    /// The authored class these variants belong to.
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the full class string for a variant.
    ///
    /// An unknown variant logs a warning and returns `None`.
    pub fn resolve(&self, variant: &str) -> Option<&str> {
        let found = self
            .names
            .iter()
            .find(|(name, _)| name == variant)
            .map(|(_, class_names)| class_names.as_str());
        if found.is_none() {
            tracing::warn!(class = %self.class, variant, "invalid variant");
        }
        found
    }

    /// Iterates `(variant, class string)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names
            .iter()
            .map(|(name, class_names)| (name.as_str(), class_names.as_str()))
    }
}

/// What an authored class binds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassBinding {
    /// A class without variants: its generated class name.
    Plain(String),
    /// A class with variants: a lookup from variant name to class string.
    Variants(VariantClasses),
}

/// Generated class names for every class of a compiled stylesheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassBindings {
    entries: Vec<(String, ClassBinding)>,
}

impl ClassBindings {
    /// Binds the classes of `compiled` to the class names `sheet` generated.
    ///
    /// `sheet` must have been created from `compiled.rules()`. A class the
    /// sheet has no name for is skipped with a warning.
    pub fn bind<S: Sheet + ?Sized>(sheet: &S, compiled: &Compiled) -> Self {
        let mut entries = Vec::new();
        for class in compiled.classes() {
            let Some(class_name) = sheet.class_name(class) else {
                tracing::warn!(class, "sheet has no class name for rule");
                continue;
            };

            let binding = match compiled.variants_of(class) {
                None => ClassBinding::Plain(class_name.to_string()),
                Some(variants) => {
                    let names = variants
                        .iter()
                        .map(|(variant, variant_rule)| {
                            let full = match sheet.class_name(variant_rule) {
                                Some(variant_name) => format!("{} {}", class_name, variant_name),
                                None => class_name.to_string(),
                            };
                            (variant.to_string(), full)
                        })
                        .collect();
                    ClassBinding::Variants(VariantClasses {
                        class: class.to_string(),
                        names,
                    })
                }
            };
            entries.push((class.to_string(), binding));
        }
        Self { entries }
    }

    /// Returns the binding for an authored class.
    pub fn get(&self, class: &str) -> Option<&ClassBinding> {
        self.entries
            .iter()
            .find(|(name, _)| name == class)
            .map(|(_, binding)| binding)
    }

    /// Returns the generated class name of a class without variants.
    pub fn class(&self, class: &str) -> Option<&str> {
        match self.get(class)? {
            ClassBinding::Plain(name) => Some(name),
            ClassBinding::Variants(_) => None,
        }
    }

    /// Returns the variant lookup of a class with variants.
    pub fn variants(&self, class: &str) -> Option<&VariantClasses> {
        match self.get(class)? {
            ClassBinding::Plain(_) => None,
            ClassBinding::Variants(variants) => Some(variants),
        }
    }

    /// Resolves a class and variant to the full class string.
    pub fn variant(&self, class: &str, variant: &str) -> Option<&str> {
        self.variants(class)?.resolve(variant)
    }

    /// Iterates bindings in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClassBinding)> {
        self.entries
            .iter()
            .map(|(name, binding)| (name.as_str(), binding))
    }

    /// Number of bound classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
