//! The interface to CSS styling engines.
//!
//! A [`StyleEngine`] turns a [`RuleTree`] into a live [`Sheet`]: it assigns a
//! generated class name to every rule, attaches the sheet to whatever
//! presentation layer it serves, and, for linked sheets, recomputes dynamic
//! values from instance [`Props`] on [`Sheet::update`].
//!
//! Engines are always passed explicitly. The compiler never refers to one.
//!
//! [`CssEngine`] is the reference implementation: it renders sheets to CSS
//! text and evaluates dynamic values as MiniJinja expressions.

mod css;

pub use css::{CssEngine, CssSheet};

use crate::rules::RuleTree;

/// Instance properties pushed into linked sheets.
pub type Props = serde_json::Value;

/// Options for creating a sheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SheetOptions {
    /// Link the sheet to instance props so dynamic values follow updates.
    pub link: bool,
}

impl SheetOptions {
    /// Options for a static sheet.
    pub fn unlinked() -> Self {
        Self { link: false }
    }

    /// Options for a sheet that follows instance props.
    pub fn linked() -> Self {
        Self { link: true }
    }
}

/// Error returned by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A dynamic value failed to evaluate against the props.
    #[error("dynamic value for '{property}' in rule '{rule}' failed: {source}")]
    DynamicValue {
        rule: String,
        property: String,
        source: minijinja::Error,
    },

    /// Props must be an object (or null for none).
    #[error("sheet props must be an object, found {found}")]
    InvalidProps { found: &'static str },
}

/// A style sheet created by an engine.
pub trait Sheet {
    /// The generated class name for a rule of the tree the sheet was created from.
    fn class_name(&self, rule: &str) -> Option<&str>;

    /// Attaches the sheet to the presentation layer.
    fn attach(&mut self);

    /// Detaches the sheet.
    fn detach(&mut self);

    /// Whether the sheet is currently attached.
    fn is_attached(&self) -> bool;

    /// Recomputes dynamic values from new props.
    ///
    /// Unlinked sheets ignore updates.
    fn update(&mut self, props: &Props) -> Result<(), EngineError>;
}

/// Creates sheets from rule trees.
pub trait StyleEngine {
    type Sheet: Sheet;

    /// Creates a detached sheet for `rules`.
    fn create_sheet(&self, rules: &RuleTree, options: SheetOptions) -> Self::Sheet;
}

impl<E: StyleEngine + ?Sized> StyleEngine for &E {
    type Sheet = E::Sheet;

    fn create_sheet(&self, rules: &RuleTree, options: SheetOptions) -> Self::Sheet {
        (**self).create_sheet(rules, options)
    }
}
