//! # stylemap - nested stylesheet descriptions compiled for CSS engines
//!
//! `stylemap` takes an author-facing description of classes, written as nested
//! mappings, and compiles it into two outputs:
//!
//! - a [`RuleTree`]: one rule object per class, with pseudo-selectors rewritten
//!   to `&:hover` form and media queries kept as nested blocks, ready for a CSS
//!   styling engine
//! - a [`VariantNameTable`]: for every class that declared `@variants`, the
//!   class name generated for each variant
//!
//! ## Quick Start
//!
//! ```rust
//! use stylemap::{compile, Description};
//!
//! let description = Description::from_yaml_str(r#"
//! button:
//!   color: black
//!   ":hover":
//!     color: blue
//!   "@variants":
//!     primary:
//!       background: navy
//!     ghost: {}
//! "#).unwrap();
//!
//! let compiled = compile(&description).unwrap();
//!
//! assert!(compiled.rules().contains("button"));
//! assert!(compiled.rules().contains("button-primary"));
//! assert!(!compiled.rules().contains("button-ghost"));
//! assert_eq!(compiled.resolve_variant("button", "ghost"), Some("button-ghost"));
//! ```
//!
//! ## Block syntax
//!
//! Inside a class block every key is classified by its shape:
//!
//! | Key | Meaning | Allowed in |
//! |-----|---------|------------|
//! | `color`, `-webkit-x` | CSS declaration, value passed through | anywhere |
//! | `:hover`, `::before` | pseudo-selector block | class, variant, media |
//! | `@media ...` | media query block | class, variant |
//! | `@variants` | named variants, must come last | class |
//!
//! Everything else is rejected, as are empty blocks. See [`CompileError`].
//!
//! ## Engines and bindings
//!
//! The compiler knows nothing about how sheets are attached. The [`engine`]
//! module defines the [`StyleEngine`] interface and ships [`CssEngine`], a
//! reference engine that renders CSS text. The [`bind`] module maps compiled
//! classes to the class names an engine generated, including variant lookups.

pub mod bind;
pub mod compile;
pub mod description;
pub mod engine;
pub mod rules;

#[cfg(test)]
mod testing;

pub use bind::{BindOptions, ClassBinding, ClassBindings, Styled, StyledInstance, VariantClasses};
pub use compile::{compile, CompileError, Compiled, ErrorKind, KeyKind, NestingState};
pub use description::{Block, Description, Format, LoadError, Variants};
pub use engine::{CssEngine, CssSheet, EngineError, Props, Sheet, SheetOptions, StyleEngine};
pub use rules::{ClassVariants, RuleEntry, RuleNode, RuleTree, VariantNameTable};
