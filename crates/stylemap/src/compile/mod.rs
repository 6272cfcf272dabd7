//! The style rule compiler.
//!
//! [`compile`] turns a [`Description`] into a [`Compiled`] stylesheet: a
//! [`RuleTree`] for the CSS engine and a [`VariantNameTable`] for view code.
//!
//! Compilation is a pure function of its input. It walks every class block
//! recursively, classifying each key with [`KeyKind::classify`] and checking
//! it against the current [`NestingState`]. The first violation aborts the
//! whole compilation with a [`CompileError`]; there are no partial results.

mod error;
mod key;
mod walk;

pub use error::{CompileError, ErrorKind};
pub use key::{KeyKind, NestingState, VARIANTS_KEY};

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::description::Description;
use crate::rules::{ClassVariants, RuleTree, VariantNameTable};

/// Path used in errors about the description as a whole.
const STYLESHEET_PATH: &str = "stylesheet";

/// A compiled stylesheet.
///
/// Owns both compiler outputs plus the list of described class names, which
/// is what bindings iterate (the rule tree also holds variant classes).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    classes: Vec<String>,
    rules: RuleTree,
    variants: VariantNameTable,
}

impl Compiled {
    /// The normalized rule tree.
    pub fn rules(&self) -> &RuleTree {
        &self.rules
    }

    /// The variant name table.
    pub fn variants(&self) -> &VariantNameTable {
        &self.variants
    }

    /// Described class names, in authoring order. Variant classes are not included.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// The variants of a class, if it declared any.
    pub fn variants_of(&self, class: &str) -> Option<&ClassVariants> {
        self.variants.get(class)
    }

    /// Resolves a variant of a class to its class name.
    ///
    /// Logs a warning and returns `None` when the class has no such variant.
    pub fn resolve_variant(&self, class: &str, variant: &str) -> Option<&str> {
        match self.variants.get(class) {
            Some(variants) => variants.resolve_variant(variant),
            None => {
                tracing::warn!(class, variant, "class has no variants");
                None
            }
        }
    }

    /// Splits into the rule tree and the variant table.
    pub fn into_parts(self) -> (RuleTree, VariantNameTable) {
        (self.rules, self.variants)
    }
}

/// Serializes as `{"ruleTree": ..., "classes": ...}`, where `classes` maps
/// every described class to its variants, or to null when it has none.
impl Serialize for Compiled {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Classes<'a>(&'a Compiled);

        impl Serialize for Classes<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let compiled = self.0;
                let mut map = serializer.serialize_map(Some(compiled.classes.len()))?;
                for class in &compiled.classes {
                    map.serialize_entry(class, &compiled.variants.get(class))?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("ruleTree", &self.rules)?;
        map.serialize_entry("classes", &Classes(self))?;
        map.end()
    }
}

/// Compiles a stylesheet description.
///
/// # Errors
///
/// Returns the first [`CompileError`] found, walking classes and keys in
/// authoring order.
///
/// # Example
///
/// ```rust
/// use stylemap::{compile, Description, ErrorKind};
///
/// let ok = Description::from_yaml_str(r#"
/// link:
///   color: teal
///   "@media print":
///     color: black
/// "#).unwrap();
/// let compiled = compile(&ok).unwrap();
/// assert!(compiled.rules().get("link").unwrap().nested("@media print").is_some());
///
/// let nested = Description::from_yaml_str(r#"
/// link:
///   ":hover":
///     ":focus":
///       color: red
/// "#).unwrap();
/// let err = compile(&nested).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Scope);
/// assert_eq!(err.code(), "pseudo-nested");
/// ```
pub fn compile(description: &Description) -> Result<Compiled, CompileError> {
    if description.is_empty() {
        return Err(CompileError::EmptyBlock {
            path: STYLESHEET_PATH.to_string(),
        });
    }

    let mut compiled = Compiled::default();
    for (class_name, block) in description.classes() {
        let walked = walk::walk(block, NestingState::TopLevel, class_name, class_name)?;

        compiled.rules.insert(class_name, walked.node);
        for (variant_class, node) in walked.variant_rules {
            compiled.rules.insert(variant_class, node);
        }
        if let Some(variants) = walked.variants {
            compiled.variants.insert(variants);
        }
        compiled.classes.push(class_name.to_string());
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        match serde_json::to_string(&compiled) {
            Ok(trace) => tracing::debug!(%trace, "compiled stylesheet"),
            Err(e) => tracing::debug!(error = %e, "compiled stylesheet (trace unavailable)"),
        }
    }

    Ok(compiled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::capture_logs;
    use serde_yaml::Value;

    fn compile_yaml(text: &str) -> Result<Compiled, CompileError> {
        compile(&Description::from_yaml_str(text).unwrap())
    }

    fn str_decl<'a>(compiled: &'a Compiled, rule: &str, property: &str) -> Option<&'a str> {
        compiled
            .rules()
            .get(rule)?
            .declaration(property)
            .and_then(Value::as_str)
    }

    // =========================================================================
    // Declarations, pseudo-selectors and media queries
    // =========================================================================

    #[test]
    fn test_no_variants_keeps_class_names() {
        let compiled = compile_yaml(
            r#"
title:
  font-weight: bold
body:
  margin: 0
  ":hover":
    color: red
"#,
        )
        .unwrap();

        let names: Vec<&str> = compiled.rules().names().collect();
        assert_eq!(names, vec!["title", "body"]);
        assert!(compiled.variants().is_empty());
        assert!(compiled.variants_of("title").is_none());
        assert!(compiled.variants_of("body").is_none());
    }

    #[test]
    fn test_pseudo_selector_gets_self_reference() {
        let compiled = compile_yaml(
            r#"
link:
  color: teal
  ":hover":
    color: navy
  "::after":
    content: "''"
"#,
        )
        .unwrap();

        let link = compiled.rules().get("link").unwrap();
        let keys: Vec<&str> = link.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["color", "&:hover", "&::after"]);
        assert_eq!(
            link.nested("&:hover")
                .and_then(|n| n.declaration("color"))
                .and_then(Value::as_str),
            Some("navy")
        );
    }

    #[test]
    fn test_media_query_kept_verbatim() {
        let compiled = compile_yaml(
            r#"
box:
  "@media (min-width: 100px)":
    color: blue
"#,
        )
        .unwrap();

        let media = compiled
            .rules()
            .get("box")
            .and_then(|n| n.nested("@media (min-width: 100px)"))
            .unwrap();
        assert_eq!(media.len(), 1);
        assert_eq!(media.declaration("color").and_then(Value::as_str), Some("blue"));
    }

    #[test]
    fn test_pseudo_inside_media_allowed() {
        let compiled = compile_yaml(
            r#"
box:
  "@media print":
    ":hover":
      color: black
"#,
        )
        .unwrap();

        let hover = compiled
            .rules()
            .get("box")
            .and_then(|n| n.nested("@media print"))
            .and_then(|n| n.nested("&:hover"));
        assert!(hover.is_some());
    }

    #[test]
    fn test_property_values_are_opaque() {
        let compiled = compile_yaml(
            r#"
box:
  z-index: 3
  font-family: [Inter, sans-serif]
  fallbacks:
    display: box
"#,
        )
        .unwrap();

        let node = compiled.rules().get("box").unwrap();
        assert_eq!(node.declaration("z-index").and_then(Value::as_i64), Some(3));
        assert!(node.declaration("font-family").unwrap().is_sequence());
        // Mapping values are copied, not walked as blocks.
        assert!(node.declaration("fallbacks").unwrap().is_mapping());
        assert!(node.nested("fallbacks").is_none());
    }

    // =========================================================================
    // Variants
    // =========================================================================

    #[test]
    fn test_variants_with_and_without_css() {
        let compiled = compile_yaml(
            r#"
button:
  color: black
  "@variants":
    a:
      color: red
    b: {}
"#,
        )
        .unwrap();

        let variants = compiled.variants_of("button").unwrap();
        let pairs: Vec<(&str, &str)> = variants.iter().collect();
        assert_eq!(pairs, vec![("a", "button-a"), ("b", "button-b")]);

        assert_eq!(str_decl(&compiled, "button-a", "color"), Some("red"));
        assert!(!compiled.rules().contains("button-b"));
    }

    #[test]
    fn test_falsy_variant_blocks_register_names_only() {
        let compiled = compile_yaml(
            r#"
chip:
  padding: 2px
  "@variants":
    none: ~
    off: false
    blank: ""
"#,
        )
        .unwrap();

        assert_eq!(compiled.variants_of("chip").unwrap().len(), 3);
        let names: Vec<&str> = compiled.rules().names().collect();
        assert_eq!(names, vec!["chip"]);
    }

    #[test]
    fn test_variant_rules_follow_their_class() {
        let compiled = compile_yaml(
            r#"
first:
  color: red
  "@variants":
    big:
      font-size: 2em
second:
  color: blue
"#,
        )
        .unwrap();

        let names: Vec<&str> = compiled.rules().names().collect();
        assert_eq!(names, vec!["first", "first-big", "second"]);
        let classes: Vec<&str> = compiled.classes().collect();
        assert_eq!(classes, vec!["first", "second"]);
    }

    #[test]
    fn test_variant_rules_are_not_nested_under_class() {
        let compiled = compile_yaml(
            r#"
tag:
  color: red
  "@variants":
    loud:
      font-weight: bold
"#,
        )
        .unwrap();

        let tag = compiled.rules().get("tag").unwrap();
        assert_eq!(tag.len(), 1);
        assert!(tag.get("@variants").is_none());
    }

    #[test]
    fn test_variant_may_hold_pseudo_and_media() {
        let compiled = compile_yaml(
            r#"
btn:
  color: black
  "@variants":
    primary:
      background: navy
      ":hover":
        background: blue
      "@media print":
        background: white
        ":focus":
          outline: none
"#,
        )
        .unwrap();

        let primary = compiled.rules().get("btn-primary").unwrap();
        assert!(primary.nested("&:hover").is_some());
        let print = primary.nested("@media print").unwrap();
        assert!(print.nested("&:focus").is_some());
    }

    #[test]
    fn test_variant_class_replaces_existing_rule_in_place() {
        let compiled = compile_yaml(
            r#"
btn-big:
  color: red
btn:
  color: black
  "@variants":
    big:
      font-size: 2em
"#,
        )
        .unwrap();

        let names: Vec<&str> = compiled.rules().names().collect();
        assert_eq!(names, vec!["btn-big", "btn"]);
        assert_eq!(str_decl(&compiled, "btn-big", "font-size"), Some("2em"));
        assert_eq!(str_decl(&compiled, "btn-big", "color"), None);
    }

    #[test]
    fn test_resolve_variant_through_compiled() {
        let compiled = compile_yaml(
            r#"
btn:
  color: black
  "@variants":
    a:
      color: red
    b: ~
plain:
  color: grey
"#,
        )
        .unwrap();

        assert_eq!(compiled.resolve_variant("btn", "a"), Some("btn-a"));
        assert_eq!(compiled.resolve_variant("btn", "b"), Some("btn-b"));
        assert_eq!(compiled.resolve_variant("btn", "missing"), None);
        assert_eq!(compiled.resolve_variant("plain", "a"), None);
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_empty_description() {
        let err = compile(&Description::new()).unwrap_err();
        assert_eq!(
            err,
            CompileError::EmptyBlock {
                path: "stylesheet".to_string()
            }
        );
    }

    #[test]
    fn test_empty_class_block() {
        let err = compile_yaml("myClass: {}\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::EmptyBlock {
                path: "myClass".to_string()
            }
        );
    }

    #[test]
    fn test_null_class_block_is_empty() {
        let err = compile_yaml("myClass:\n").unwrap_err();
        assert_eq!(err.code(), "empty-block");
    }

    #[test]
    fn test_empty_nested_blocks() {
        let err = compile_yaml("a:\n  \":hover\": {}\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::EmptyBlock {
                path: "a > :hover".to_string()
            }
        );

        let err = compile_yaml("a:\n  color: red\n  \"@variants\": {}\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::EmptyBlock {
                path: "a > @variants".to_string()
            }
        );
    }

    #[test]
    fn test_scalar_where_block_expected() {
        let err = compile_yaml("a:\n  \":hover\": red\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::NotABlock {
                path: "a > :hover".to_string(),
                found: "a string",
            }
        );
        assert_eq!(err.kind(), ErrorKind::Structure);

        let err = compile_yaml("a:\n  \"@variants\":\n    big: [1, 2]\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::NotABlock {
                path: "a > @variants > big".to_string(),
                found: "a sequence",
            }
        );
    }

    #[test]
    fn test_key_after_variants() {
        let err = compile_yaml(
            r#"
a:
  "@variants":
    big:
      color: red
  color: blue
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::VariantsNotLast {
                path: "a".to_string(),
                key: "'color'".to_string(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Order);
    }

    #[test]
    fn test_variants_not_top_level() {
        let err = compile_yaml(
            r#"
a:
  ":hover":
    "@variants":
      big: ~
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::VariantsNotTopLevel {
                path: "a > :hover".to_string(),
                state: NestingState::PseudoSelector,
            }
        );

        let err = compile_yaml(
            r#"
a:
  "@variants":
    big:
      "@variants":
        huge: ~
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::VariantsNotTopLevel {
                path: "a > @variants > big".to_string(),
                state: NestingState::Variant,
            }
        );
    }

    #[test]
    fn test_nested_pseudo_selector() {
        let err = compile_yaml(
            r#"
box:
  ":hover":
    ":focus":
      color: green
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::PseudoNested {
                path: "box > :hover".to_string(),
                key: "':focus'".to_string(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Scope);
    }

    #[test]
    fn test_media_invalid_scope() {
        let err = compile_yaml(
            r#"
box:
  "@media print":
    "@media (color)":
      color: black
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::MediaInvalidScope {
                path: "box > @media print".to_string(),
                key: "'@media (color)'".to_string(),
                state: NestingState::MediaQuery,
            }
        );

        let err = compile_yaml(
            r#"
box:
  ":hover":
    "@media print":
      color: black
"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "media-invalid-scope");
    }

    #[test]
    fn test_invalid_keys() {
        let err = compile_yaml("a:\n  123invalid: red\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidKey {
                path: "a".to_string(),
                key: "'123invalid'".to_string(),
            }
        );
        assert_eq!(err.kind(), ErrorKind::Syntax);

        let err = compile_yaml("a:\n  \"@supports (display: grid)\":\n    color: red\n")
            .unwrap_err();
        assert_eq!(err.code(), "invalid-key");

        let err = compile_yaml("a:\n  12: red\n").unwrap_err();
        assert_eq!(
            err,
            CompileError::InvalidKey {
                path: "a".to_string(),
                key: "'12'".to_string(),
            }
        );
    }

    #[test]
    fn test_first_error_wins() {
        let err = compile_yaml(
            r#"
first:
  color: red
  9bad: x
second: {}
"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "invalid-key");
        assert_eq!(err.path(), "first");
    }

    #[test]
    fn test_keys_up_to_variants_checked_before_order() {
        // @variants is dispatched before the key after it is rejected, so
        // its own scope error wins.
        let err = compile_yaml(
            r#"
a:
  ":hover":
    "@variants":
      big: ~
    color: red
"#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            CompileError::VariantsNotTopLevel {
                path: "a > :hover".to_string(),
                state: NestingState::PseudoSelector,
            }
        );
    }

    #[test]
    fn test_invalid_key_before_misplaced_variants() {
        let err = compile_yaml(
            r#"
a:
  9bad: x
  "@variants":
    b: ~
  color: red
"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "invalid-key");
        assert_eq!(err.path(), "a");
    }

    // =========================================================================
    // Serialization and determinism
    // =========================================================================

    #[test]
    fn test_compiled_serializes_trace_shape() {
        let compiled = compile_yaml(
            r#"
btn:
  color: black
  "@variants":
    a: ~
plain:
  color: grey
"#,
        )
        .unwrap();

        let json = serde_json::to_string(&compiled).unwrap();
        assert_eq!(
            json,
            r#"{"ruleTree":{"btn":{"color":"black"},"plain":{"color":"grey"}},"classes":{"btn":{"a":"btn-a"},"plain":null}}"#
        );
    }

    #[test]
    fn test_compile_logs_debug_trace() {
        let description = Description::from_yaml_str("btn:\n  color: black\n").unwrap();
        let (compiled, logs) = capture_logs(|| compile(&description));

        assert!(compiled.is_ok());
        assert!(logs.contains("DEBUG"), "logs: {}", logs);
        assert!(logs.contains("compiled stylesheet"), "logs: {}", logs);
        assert!(
            logs.contains(r#"trace={"ruleTree":{"btn":{"color":"black"}},"classes":{"btn":null}}"#),
            "logs: {}",
            logs
        );
    }

    #[test]
    fn test_failed_compile_logs_no_trace() {
        let description = Description::from_yaml_str("btn: {}\n").unwrap();
        let (compiled, logs) = capture_logs(|| compile(&description));

        assert!(compiled.is_err());
        assert!(!logs.contains("compiled stylesheet"), "logs: {}", logs);
    }

    #[test]
    fn test_compile_twice_is_equal() {
        let description = Description::from_yaml_str(
            r#"
btn:
  color: black
  ":hover":
    color: blue
  "@variants":
    a:
      color: red
    b: ~
"#,
        )
        .unwrap();

        assert_eq!(compile(&description), compile(&description));
    }

    #[test]
    fn test_into_parts() {
        let compiled = compile_yaml("a:\n  color: red\n").unwrap();
        let (rules, variants) = compiled.into_parts();
        assert_eq!(rules.len(), 1);
        assert!(variants.is_empty());
    }
}
